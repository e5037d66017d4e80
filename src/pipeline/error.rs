//! Error types for pipeline stages.
//!
//! Every stage failure is fatal to the run. Variants carry enough context
//! (paths, commands, exit codes) for the operator to act on them directly.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the release pipeline stages.
#[derive(Error, Debug)]
pub enum Error {
    /// The extracted dependency directory is absent.
    #[error("{}", missing_dependency_message(.archive, .extracted_dir, .reason.as_deref()))]
    MissingDependency {
        /// Archive the directory should be extracted from
        archive: PathBuf,
        /// Directory the pipeline expects to find
        extracted_dir: PathBuf,
        /// Why automatic extraction did not help, if it was attempted
        reason: Option<String>,
    },

    /// The build toolchain failed.
    #[error("build failed: `{command}` {reason}")]
    BuildFailure {
        /// Rendered command line
        command: String,
        /// Exit status or post-build check that failed
        reason: String,
    },

    /// The installer tool failed.
    #[error("packaging failed: `{command}` {reason}")]
    PackagingFailure {
        /// Rendered command line
        command: String,
        /// Exit status or precondition that failed
        reason: String,
    },

    /// No installer matched the expected extension.
    #[error(
        "failed to find the generated installer file: no *.{extension} file in {}",
        .dir.display()
    )]
    ArtifactNotFound {
        /// Directory that was scanned
        dir: PathBuf,
        /// Installer extension searched for
        extension: String,
    },

    /// More than one installer matched under the strict selection policy.
    #[error("{}", ambiguous_artifact_message(.dir, .matches))]
    AmbiguousArtifact {
        /// Directory that was scanned
        dir: PathBuf,
        /// Every matching file, in sort order
        matches: Vec<PathBuf>,
    },

    /// A required executable is not on PATH.
    #[error("`{tool}` not found in PATH. {hint}")]
    ToolNotFound {
        /// Executable name
        tool: String,
        /// Installation hint
        hint: String,
    },

    /// Profile paths would escape the workspace or are malformed.
    #[error("invalid workspace layout: {0}")]
    InvalidLayout(String),

    /// A process could not be spawned or awaited.
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Underlying IO error
        #[source]
        error: io::Error,
    },

    /// Filesystem operation failed on a known path.
    #[error("{context} ({}): {error}", .path.display())]
    Fs {
        /// What was being done
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying IO error
        #[source]
        error: io::Error,
    },

    /// Zip writer failure.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Background task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// IO error without path context.
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

fn missing_dependency_message(archive: &Path, extracted_dir: &Path, reason: Option<&str>) -> String {
    let mut message = format!(
        "missing dependency: {} does not exist.\n\
         Extract {} so that its contents end up in {} (for example: 7z x \"{}\" -o\"{}\"), \
         then re-run the pipeline.",
        extracted_dir.display(),
        archive.display(),
        extracted_dir.display(),
        archive.display(),
        extracted_dir
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .display(),
    );
    if let Some(reason) = reason {
        message.push_str(&format!("\nAutomatic extraction failed: {reason}"));
    }
    message
}

fn ambiguous_artifact_message(dir: &Path, matches: &[PathBuf]) -> String {
    let listing = matches
        .iter()
        .map(|m| format!("  • {}", m.display()))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "found {} installer files in {}, expected exactly one:\n{}",
        matches.len(),
        dir.display(),
        listing
    )
}

/// Attaches a path and a description to IO errors.
pub trait ErrorExt<T> {
    /// Wraps the error as [`Error::Fs`].
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Converts options and foreign errors into [`Error::GenericError`] with a message.
pub trait Context<T> {
    /// Adds a static context message.
    fn context<C: Display>(self, context: C) -> Result<T>;

    /// Adds a lazily built context message.
    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

impl<T, E: Display> Context<T> for std::result::Result<T, E> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }

    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{}: {e}", f())))
    }
}

/// Returns early with [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::pipeline::Error::GenericError(format!($($arg)*)))
    };
}
