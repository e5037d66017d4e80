//! Shared helpers for integration tests

#![allow(dead_code)]

use osd_release::pipeline::{CommandOutcome, CommandRunner, Invocation};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Copy of `tests/fixtures/workspace` in a temporary directory.
pub struct TestWorkspace {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().to_path_buf();
        let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/workspace");
        copy_tree(&fixture, &path);
        Self { _dir: dir, path }
    }

    pub fn file(&self, rel: &str) -> PathBuf {
        self.path.join(rel)
    }

    pub fn write(&self, rel: &str, contents: &[u8]) {
        let path = self.file(rel);
        std::fs::create_dir_all(path.parent().expect("file has a parent"))
            .expect("Failed to create parent");
        std::fs::write(path, contents).expect("Failed to write file");
    }

    /// Create the extracted ffmpeg directory the windows profile expects.
    pub fn extract_ffmpeg(&self) {
        self.write("ext/ffmpeg/windows64/ffmpeg/bin/ffmpeg.exe", b"ffmpeg");
    }

    pub fn deploy_entries(&self) -> Vec<String> {
        match std::fs::read_dir(self.file("_deploy")) {
            Ok(entries) => {
                let mut names: Vec<_> = entries
                    .map(|e| e.expect("entry").file_name().to_string_lossy().into_owned())
                    .collect();
                names.sort();
                names
            }
            Err(_) => Vec::new(),
        }
    }
}

fn copy_tree(from: &Path, to: &Path) {
    std::fs::create_dir_all(to).expect("Failed to create dir");
    for entry in std::fs::read_dir(from).expect("Failed to read fixture") {
        let entry = entry.expect("entry");
        let dest = to.join(entry.file_name());
        if entry.file_type().expect("file type").is_dir() {
            copy_tree(&entry.path(), &dest);
        } else {
            std::fs::copy(entry.path(), dest).expect("Failed to copy fixture file");
        }
    }
}

/// Stands in for cargo, cargo-wix and 7-Zip.
///
/// `cargo build` writes the release binary, `cargo wix` writes the given
/// installers into `target/wix`. Exit codes can be forced per subcommand.
pub struct StubToolchain {
    root: PathBuf,
    installers: Vec<String>,
    build_exit: i32,
    package_exit: i32,
    calls: Mutex<Vec<Invocation>>,
}

impl StubToolchain {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            installers: vec!["walksnail-osd-tool-1.2.3-x86_64.msi".to_string()],
            build_exit: 0,
            package_exit: 0,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn installers(mut self, names: &[&str]) -> Self {
        self.installers = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn build_exit(mut self, code: i32) -> Self {
        self.build_exit = code;
        self
    }

    pub fn package_exit(mut self, code: i32) -> Self {
        self.package_exit = code;
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().expect("lock").clone()
    }

    fn build(&self) -> CommandOutcome {
        if self.build_exit != 0 {
            return CommandOutcome::exited(self.build_exit);
        }
        let binary = self.root.join("target/release").join(format!(
            "walksnail-osd-tool{}",
            std::env::consts::EXE_SUFFIX
        ));
        std::fs::create_dir_all(binary.parent().expect("parent")).expect("mkdir");
        std::fs::write(binary, b"binary").expect("write binary");
        CommandOutcome::success()
    }

    fn package(&self) -> CommandOutcome {
        if self.package_exit != 0 {
            return CommandOutcome::exited(self.package_exit);
        }
        let out = self.root.join("target/wix");
        std::fs::create_dir_all(&out).expect("mkdir");
        for name in &self.installers {
            std::fs::write(out.join(name), format!("installer {name}")).expect("write installer");
        }
        CommandOutcome::success()
    }
}

impl CommandRunner for StubToolchain {
    fn locate(&self, _program: &str) -> Option<PathBuf> {
        None
    }

    async fn run(&self, invocation: &Invocation) -> osd_release::pipeline::Result<CommandOutcome> {
        self.calls.lock().expect("lock").push(invocation.clone());
        let outcome = match invocation.args.first().map(String::as_str) {
            Some("build") => self.build(),
            Some("wix") => self.package(),
            _ => CommandOutcome::exited(127),
        };
        Ok(outcome)
    }
}
