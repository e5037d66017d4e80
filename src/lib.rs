//! Release pipeline for the OSD tool installer
//!
//! This library provides the pipeline that turns a workspace into a
//! distributable installer archive:
//! - workspace reset of the installer output directory
//! - dependency check (bundled ffmpeg) with optional 7-Zip extraction
//! - `cargo build --release` with the platform feature
//! - installer generation (`cargo wix`, `cargo deb`) without rebuilding
//! - zipping the installer to a fixed, predictable path
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod pipeline;

// Re-export commonly used types
pub use error::{CliError, ReleaseError, Result};
