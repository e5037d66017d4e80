//! Workspace reset: removes the installer tool's output directory.
//!
//! The archiver discovers the installer by scanning this directory, so stale
//! installers from an earlier run must be gone before packaging starts.

use crate::pipeline::{
    error::{ErrorExt, Result},
    settings::Settings,
};
use std::io;

/// Delete the build output directory if present.
///
/// Idempotent: an absent directory is not an error. Only the profile's
/// `output_dir` (validated to lie inside the root) is touched.
///
/// # Returns
///
/// `true` if a directory was removed, `false` if there was nothing to do.
pub async fn reset_workspace(settings: &Settings) -> Result<bool> {
    let output_dir = settings.output_dir();

    match tokio::fs::remove_dir_all(&output_dir).await {
        Ok(()) => {
            log::info!("✓ Removed stale build output: {}", output_dir.display());
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("Nothing to clean at {}", output_dir.display());
            Ok(false)
        }
        Err(e) => Err(e).fs_context("removing build output directory", &output_dir),
    }
}
