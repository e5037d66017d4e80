//! Values handed between pipeline stages.

use std::path::{Path, PathBuf};

/// Platform/feature combination being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    /// Cargo features enabled for the build
    pub features: Vec<String>,
    /// Where the toolchain leaves the release binary
    pub binary_path: PathBuf,
}

/// Third-party dependency that ships next to the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyBundle {
    /// Compressed archive checked into the repository
    pub archive: PathBuf,
    /// Directory the build expects to exist
    pub extracted_dir: PathBuf,
}

impl DependencyBundle {
    /// Whether the extracted directory exists.
    pub async fn is_materialized(&self) -> bool {
        tokio::fs::metadata(&self.extracted_dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }
}

/// Installer definition consumed by the installer tool. Never written by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManifest(pub PathBuf);

impl PackageManifest {
    /// Path of the manifest.
    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Installer file discovered in the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReference {
    /// Full path of the installer
    pub path: PathBuf,
}

impl ArtifactReference {
    /// File name used as the entry name inside the archive.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Final zip handed to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributableArchive {
    /// Fixed destination path
    pub path: PathBuf,
    /// Installer stored in the archive
    pub source: ArtifactReference,
    /// Archive size in bytes
    pub size: u64,
    /// Hex-encoded SHA-256 of the archive
    pub checksum: String,
}
