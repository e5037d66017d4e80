//! Release pipeline orchestration.
//!
//! [`Pipeline`] runs five stages strictly in order, each observing the
//! filesystem effects of the previous one:
//!
//! 1. Reset - remove stale installer output
//! 2. Materialize - make sure the bundled dependency is extracted
//! 3. Build - release build with the platform feature
//! 4. Package - installer tool, reusing the built binary
//! 5. Archive - zip the installer to a fixed path
//!
//! The first failing stage ends the run; there is no retry and no partial
//! success.
//!
//! # Example
//!
//! ```no_run
//! use osd_release::metadata::PackageMetadata;
//! use osd_release::pipeline::{Pipeline, ReleaseProfile, SettingsBuilder, SystemRunner};
//!
//! # async fn example() -> osd_release::pipeline::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .root(".")
//!     .profile(ReleaseProfile::windows())
//!     .package(PackageMetadata::new("walksnail-osd-tool", None))
//!     .build()?;
//!
//! let report = Pipeline::new(settings, SystemRunner).run().await?;
//! println!("Created {} ({})", report.archive.path.display(), report.archive.checksum);
//! # Ok(())
//! # }
//! ```

mod checksum;
pub mod error;
mod runner;
pub mod settings;
pub mod stages;
mod tool_detection;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Error, Result};
pub use runner::{CommandOutcome, CommandRunner, Invocation, SystemRunner};
pub use settings::{
    ArtifactSelection, DependencySpec, InstallerTool, ReleaseProfile, Settings, SettingsBuilder,
};
pub use stages::DependencyState;
pub use types::{
    ArtifactReference, BuildTarget, DependencyBundle, DistributableArchive, PackageManifest,
};

use std::fmt;

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Remove the installer output directory
    Reset,
    /// Check the dependency bundle
    Materialize,
    /// Release build
    Build,
    /// Installer generation
    Package,
    /// Distributable archive
    Archive,
}

impl Stage {
    /// Every stage, in order.
    pub const ALL: [Stage; 5] = [
        Stage::Reset,
        Stage::Materialize,
        Stage::Build,
        Stage::Package,
        Stage::Archive,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Reset => "Workspace reset",
            Stage::Materialize => "Dependency check",
            Stage::Build => "Release build",
            Stage::Package => "Installer packaging",
            Stage::Archive => "Archive",
        };
        f.write_str(label)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Whether the reset stage removed a previous output directory
    pub cleaned: bool,
    /// What the dependency stage found
    pub dependency: DependencyState,
    /// The build that was produced
    pub build: BuildTarget,
    /// The final archive
    pub archive: DistributableArchive,
}

/// Sequential release pipeline.
pub struct Pipeline<R> {
    settings: Settings,
    runner: R,
}

impl<R: CommandRunner> Pipeline<R> {
    /// Creates a pipeline over `settings` that spawns processes through `runner`.
    pub fn new(settings: Settings, runner: R) -> Self {
        Self { settings, runner }
    }

    /// Returns the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the command runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs all stages.
    pub async fn run(&self) -> Result<PipelineReport> {
        self.run_with(|_| {}).await
    }

    /// Runs all stages, calling `on_stage` as each one starts.
    pub async fn run_with<F: FnMut(Stage)>(&self, mut on_stage: F) -> Result<PipelineReport> {
        let settings = &self.settings;

        on_stage(Stage::Reset);
        let cleaned = stages::reset_workspace(settings).await?;

        on_stage(Stage::Materialize);
        let dependency = stages::materialize(settings, &self.runner).await?;

        on_stage(Stage::Build);
        let build = stages::invoke_build(settings, &self.runner).await?;

        on_stage(Stage::Package);
        stages::package_installer(settings, &self.runner).await?;

        on_stage(Stage::Archive);
        let archive = stages::archive_installer(settings).await?;

        Ok(PipelineReport {
            cleaned,
            dependency,
            build,
            archive,
        })
    }
}
