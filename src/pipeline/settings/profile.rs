//! Per-platform release profiles.

use serde::Deserialize;
use std::path::PathBuf;

/// How the archiver reacts to more than one installer candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactSelection {
    /// Several candidates is an error.
    #[default]
    Strict,
    /// Take the first candidate by file name.
    First,
}

/// Location of the bundled third-party dependency.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DependencySpec {
    /// Compressed archive, relative to the workspace root
    pub archive: PathBuf,
    /// Directory the archive is expected to be extracted to
    pub extracted_dir: PathBuf,
}

/// Invocation contract of the installer-generation tool.
///
/// Rendered as
/// `<program> <subcommand> <package_flag> <id> [<manifest_flag>] <manifest> <no_build_flag> <extra_args...>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerTool {
    /// Executable, e.g. `cargo`
    pub program: String,
    /// Subcommand, e.g. `wix`
    pub subcommand: Option<String>,
    /// Flag preceding the package id
    pub package_flag: String,
    /// Flag preceding the manifest path; `None` passes it positionally
    pub manifest_flag: Option<String>,
    /// Installer definition file, relative to the workspace root
    pub manifest: PathBuf,
    /// Flag that stops the tool from rebuilding the binary
    pub no_build_flag: String,
    /// Trailing arguments
    pub extra_args: Vec<String>,
}

/// Everything the pipeline needs to know about one target platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseProfile {
    /// Profile name used on the command line
    pub name: String,
    /// Cargo features enabled for the release build
    pub features: Vec<String>,
    /// Binary produced by the build; defaults to the package name
    pub binary_name: Option<String>,
    /// Package id passed to the installer tool; defaults to the package name
    pub package: Option<String>,
    /// Bundled dependency that must be extracted before building
    pub dependency: Option<DependencySpec>,
    /// Try extracting the dependency with 7-Zip when it is missing
    pub extract: bool,
    /// Installer tool invocation
    pub installer: InstallerTool,
    /// Installer tool output directory; wiped at the start of a run
    pub output_dir: PathBuf,
    /// Extension of the generated installer, without the dot
    pub installer_extension: String,
    /// Directory receiving the final archive
    pub deploy_dir: PathBuf,
    /// File stem of the final archive
    pub archive_name: String,
    /// Policy when several installers are found
    pub selection: ArtifactSelection,
}

impl ReleaseProfile {
    /// Windows MSI built with `cargo wix`, shipping the bundled ffmpeg.
    pub fn windows() -> Self {
        Self {
            name: "windows".into(),
            features: vec!["windows-installer".into()],
            binary_name: None,
            package: None,
            dependency: Some(DependencySpec {
                archive: PathBuf::from("ext/ffmpeg/windows64/ffmpeg.7z"),
                extracted_dir: PathBuf::from("ext/ffmpeg/windows64/ffmpeg"),
            }),
            extract: false,
            installer: InstallerTool {
                program: "cargo".into(),
                subcommand: Some("wix".into()),
                package_flag: "--package".into(),
                manifest_flag: Some("--include".into()),
                manifest: PathBuf::from("wix/main.wxs"),
                no_build_flag: "--no-build".into(),
                extra_args: vec!["--nocapture".into()],
            },
            output_dir: PathBuf::from("target/wix"),
            installer_extension: "msi".into(),
            deploy_dir: PathBuf::from("_deploy"),
            archive_name: "walksnail-osd-tool-windows".into(),
            selection: ArtifactSelection::Strict,
        }
    }

    /// Debian package built with `cargo deb`; ffmpeg comes from the system.
    pub fn linux() -> Self {
        Self {
            name: "linux".into(),
            features: Vec::new(),
            binary_name: None,
            package: None,
            dependency: None,
            extract: false,
            installer: InstallerTool {
                program: "cargo".into(),
                subcommand: Some("deb".into()),
                package_flag: "--package".into(),
                manifest_flag: Some("--manifest-path".into()),
                manifest: PathBuf::from("Cargo.toml"),
                no_build_flag: "--no-build".into(),
                extra_args: Vec::new(),
            },
            output_dir: PathBuf::from("target/debian"),
            installer_extension: "deb".into(),
            deploy_dir: PathBuf::from("_deploy"),
            archive_name: "walksnail-osd-tool-linux".into(),
            selection: ArtifactSelection::Strict,
        }
    }

    /// Built-in profiles, in display order.
    pub fn builtins() -> Vec<Self> {
        vec![Self::windows(), Self::linux()]
    }

    /// Name of the profile matching the host OS.
    pub fn host_default_name() -> &'static str {
        if cfg!(target_os = "windows") {
            "windows"
        } else {
            "linux"
        }
    }
}
