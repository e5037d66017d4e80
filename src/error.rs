//! Top-level error type for the release command.
//!
//! Wraps pipeline failures together with CLI and configuration errors, and
//! maps each to a process exit code and recovery suggestions.

use crate::pipeline;
use thiserror::Error;

/// Result type alias for release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for the release command
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Config file or Cargo.toml could not be loaded
    #[error("Configuration error: {0:#}")]
    Config(anyhow::Error),

    /// A pipeline stage failed
    #[error("{0}")]
    Pipeline(#[from] pipeline::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Requested profile does not exist
    #[error("Unknown platform '{name}'. Available: {}", .available.join(", "))]
    UnknownProfile {
        /// Requested name
        name: String,
        /// Names that do exist
        available: Vec<String>,
    },
}

impl ReleaseError {
    /// Process exit code for this error.
    ///
    /// | code | meaning |
    /// |------|---------|
    /// | 1 | IO or unexpected failure |
    /// | 2 | usage or configuration |
    /// | 3 | missing dependency |
    /// | 4 | build failure |
    /// | 5 | packaging failure |
    /// | 6 | installer not found or ambiguous |
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseError::Cli(_) | ReleaseError::Config(_) => 2,
            ReleaseError::Pipeline(e) => match e {
                pipeline::Error::MissingDependency { .. } => 3,
                pipeline::Error::BuildFailure { .. } => 4,
                pipeline::Error::PackagingFailure { .. } => 5,
                pipeline::Error::ArtifactNotFound { .. }
                | pipeline::Error::AmbiguousArtifact { .. } => 6,
                pipeline::Error::InvalidLayout(_) => 2,
                _ => 1,
            },
            ReleaseError::Io(_) => 1,
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            ReleaseError::Cli(CliError::UnknownProfile { .. }) => vec![
                "Run with --list-profiles to see the configured platforms".to_string(),
            ],
            ReleaseError::Cli(_) => vec!["Run with --help for usage".to_string()],
            ReleaseError::Config(_) => vec![
                "Check release.toml and the workspace Cargo.toml for syntax errors".to_string(),
            ],
            ReleaseError::Pipeline(e) => match e {
                pipeline::Error::MissingDependency { .. } => vec![
                    "Extract the archive manually as described above".to_string(),
                    "Or re-run with --extract to try 7-Zip from PATH".to_string(),
                ],
                pipeline::Error::BuildFailure { .. } => vec![
                    "Fix the compiler errors shown above and re-run the pipeline".to_string(),
                ],
                pipeline::Error::PackagingFailure { .. } => vec![
                    "Make sure the installer tool is installed (e.g. `cargo install cargo-wix`)"
                        .to_string(),
                    "Check the installer manifest and the tool output above".to_string(),
                ],
                pipeline::Error::ArtifactNotFound { .. } => vec![
                    "Check that the installer tool writes to the configured output_dir".to_string(),
                ],
                pipeline::Error::AmbiguousArtifact { .. } => vec![
                    "Remove the extra installers, or re-run with --allow-multiple to take the first"
                        .to_string(),
                ],
                pipeline::Error::ToolNotFound { .. } => {
                    vec!["Install the missing tool and re-run the pipeline".to_string()]
                }
                _ => vec!["Check the error message above for specific details".to_string()],
            },
            ReleaseError::Io(_) => {
                vec!["Check file permissions in the workspace".to_string()]
            }
        }
    }
}
