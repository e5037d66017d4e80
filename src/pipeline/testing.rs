//! Test doubles shared by the stage unit tests.

use super::{
    error::Result,
    runner::{CommandOutcome, CommandRunner, Invocation},
    settings::{ReleaseProfile, Settings, SettingsBuilder},
};
use crate::metadata::PackageMetadata;
use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};
use tempfile::TempDir;

type Handler = Box<dyn Fn(&Invocation) -> CommandOutcome>;

/// Records invocations and answers them with a handler instead of spawning.
pub struct FakeRunner {
    calls: Mutex<Vec<Invocation>>,
    tools: Vec<(String, PathBuf)>,
    handler: Handler,
}

impl FakeRunner {
    pub fn succeeding() -> Self {
        Self::with_handler(|_| CommandOutcome::success())
    }

    pub fn with_handler(handler: impl Fn(&Invocation) -> CommandOutcome + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            tools: Vec::new(),
            handler: Box::new(handler),
        }
    }

    pub fn with_tool(mut self, name: &str, path: &str) -> Self {
        self.tools.push((name.to_string(), PathBuf::from(path)));
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.tools
            .iter()
            .find(|(name, _)| name == program)
            .map(|(_, path)| path.clone())
    }

    async fn run(&self, invocation: &Invocation) -> Result<CommandOutcome> {
        self.calls.lock().unwrap().push(invocation.clone());
        Ok((self.handler)(invocation))
    }
}

/// Temporary workspace root.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn write(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let path = self.path(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn mkdir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn settings(&self, profile: ReleaseProfile) -> Settings {
        SettingsBuilder::new()
            .root(self.root())
            .profile(profile)
            .package(PackageMetadata::new("walksnail-osd-tool", Some("1.2.3".into())))
            .build()
            .unwrap()
    }
}
