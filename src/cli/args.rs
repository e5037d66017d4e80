//! Command line argument parsing and validation.

use crate::pipeline::{ArtifactSelection, ReleaseProfile};
use clap::Parser;
use std::path::PathBuf;

/// Build, package and archive the OSD tool installer
#[derive(Parser, Debug)]
#[command(
    name = "osd_release",
    version,
    about = "Build, package and archive the OSD tool installer",
    long_about = "Runs the release pipeline in five stages:

  1. remove the installer output directory (target/wix on Windows)
  2. check the bundled ffmpeg dependency is extracted
  3. cargo build --release --features <platform feature>
  4. run the installer tool (cargo wix / cargo deb) without rebuilding
  5. zip the generated installer into _deploy/<name>.zip

Without arguments the profile for the host OS is used.

Usage:
  osd_release
  osd_release --platform windows --extract
  osd_release --root ../walksnail-osd-tool --config release.toml

Exit code 0 = archive guaranteed to exist at the reported path."
)]
pub struct Args {
    /// Release profile to run (built-in: windows, linux)
    #[arg(short, long, value_name = "NAME", env = "OSD_RELEASE_PLATFORM")]
    pub platform: Option<String>,

    /// Workspace root containing Cargo.toml
    #[arg(short, long, value_name = "DIR", default_value = ".", env = "OSD_RELEASE_ROOT")]
    pub root: PathBuf,

    /// Profile override file (default: <ROOT>/release.toml when present)
    #[arg(short, long, value_name = "FILE", env = "OSD_RELEASE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Try extracting a missing dependency with 7-Zip from PATH
    #[arg(long)]
    pub extract: bool,

    /// Take the first installer by name when several are found
    #[arg(long)]
    pub allow_multiple: bool,

    /// Print the available profiles and exit
    #[arg(long)]
    pub list_profiles: bool,

    /// Show extra detail
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if !self.root.is_dir() {
            return Err(format!(
                "Workspace root {} is not a directory",
                self.root.display()
            ));
        }

        if self.platform.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err("Platform cannot be empty".to_string());
        }

        Ok(())
    }

    /// Profile name to run: `--platform`, or the host default.
    pub fn profile_name(&self) -> &str {
        self.platform
            .as_deref()
            .unwrap_or(ReleaseProfile::host_default_name())
    }

    /// Apply command-line switches on top of a resolved profile.
    pub fn apply_to(&self, mut profile: ReleaseProfile) -> ReleaseProfile {
        if self.extract {
            profile.extract = true;
        }
        if self.allow_multiple {
            profile.selection = ArtifactSelection::First;
        }
        profile
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.verbose, args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}
