//! Core Settings struct and implementations.

use super::{ArtifactSelection, ReleaseProfile};
use crate::{
    metadata::PackageMetadata,
    pipeline::types::{BuildTarget, DependencyBundle, PackageManifest},
};
use std::path::{Path, PathBuf};

/// A release profile resolved against a workspace root.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder), which validates
/// that every directory the pipeline writes to stays inside the root.
/// All path accessors return paths joined onto the root.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Workspace root; every relative profile path is resolved against it.
    root: PathBuf,

    /// Validated profile.
    profile: ReleaseProfile,

    /// Package identity from the root Cargo.toml.
    package: PackageMetadata,
}

impl Settings {
    /// Returns the workspace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the profile in effect.
    pub fn profile(&self) -> &ReleaseProfile {
        &self.profile
    }

    /// Returns the package version, if the manifest states one.
    pub fn version(&self) -> Option<&str> {
        self.package.version.as_deref()
    }

    /// Package id passed to the installer tool.
    pub fn package_id(&self) -> &str {
        self.profile.package.as_deref().unwrap_or(&self.package.name)
    }

    /// Installer tool output directory (wiped by the reset stage, scanned by the archiver).
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.profile.output_dir)
    }

    /// Directory receiving the distributable archive.
    pub fn deploy_dir(&self) -> PathBuf {
        self.root.join(&self.profile.deploy_dir)
    }

    /// Fixed path of the distributable archive.
    pub fn archive_path(&self) -> PathBuf {
        self.deploy_dir()
            .join(format!("{}.zip", self.profile.archive_name))
    }

    /// Installer extension without the leading dot.
    pub fn installer_extension(&self) -> &str {
        &self.profile.installer_extension
    }

    /// Multiple-candidate policy for the archiver.
    pub fn selection(&self) -> ArtifactSelection {
        self.profile.selection
    }

    /// Whether a missing dependency may be auto-extracted.
    pub fn extract(&self) -> bool {
        self.profile.extract
    }

    /// Build target with the expected release binary location.
    ///
    /// Appends the host executable suffix (`.exe` on Windows).
    pub fn build_target(&self) -> BuildTarget {
        let binary_name = self
            .profile
            .binary_name
            .as_deref()
            .unwrap_or(&self.package.name);
        let binary_path = self
            .root
            .join("target")
            .join("release")
            .join(format!("{binary_name}{}", std::env::consts::EXE_SUFFIX));

        BuildTarget {
            features: self.profile.features.clone(),
            binary_path,
        }
    }

    /// Dependency bundle with root-resolved paths, if the profile has one.
    pub fn dependency(&self) -> Option<DependencyBundle> {
        self.profile.dependency.as_ref().map(|d| DependencyBundle {
            archive: self.root.join(&d.archive),
            extracted_dir: self.root.join(&d.extracted_dir),
        })
    }

    /// Installer definition file.
    pub fn manifest(&self) -> PackageManifest {
        PackageManifest(self.root.join(&self.profile.installer.manifest))
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(root: PathBuf, profile: ReleaseProfile, package: PackageMetadata) -> Self {
        Self {
            root,
            profile,
            package,
        }
    }
}
