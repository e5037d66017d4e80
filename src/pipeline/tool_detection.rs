//! External tool detection.
//!
//! Resolves executables on PATH before the pipeline spawns them, so a missing
//! toolchain is reported as such instead of as an opaque spawn error.

use std::path::PathBuf;

/// 7-Zip executables tried, in order, for dependency extraction.
pub const SEVEN_ZIP_CANDIDATES: [&str; 3] = ["7z", "7za", "7zr"];

/// Locate an executable on PATH.
pub fn locate(program: &str) -> Option<PathBuf> {
    match which::which(program) {
        Ok(path) => {
            log::debug!("Found {} at: {}", program, path.display());
            Some(path)
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", program, e);
            None
        }
    }
}

/// Installation hint shown when `program` is missing.
pub fn install_hint(program: &str) -> String {
    match program {
        "cargo" => "Install the Rust toolchain from https://rustup.rs".to_string(),
        p if SEVEN_ZIP_CANDIDATES.contains(&p) => {
            "Install 7-Zip (https://www.7-zip.org) and make sure it is on PATH".to_string()
        }
        p => format!("Install {p} and make sure it is on PATH"),
    }
}
