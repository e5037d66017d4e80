//! Package metadata from the workspace root Cargo.toml

use anyhow::{Context, Result, bail};
use std::path::Path;

/// Package identity read from `[package]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    /// Package name, also the default installer package id and binary name
    pub name: String,

    /// Package version, absent when inherited from a workspace
    pub version: Option<String>,
}

impl PackageMetadata {
    /// Creates metadata without reading a manifest.
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

/// Load package metadata from a Cargo.toml file.
///
/// Only `package.name` is required. A `version` that is not a plain string
/// (e.g. `version.workspace = true`) is reported as `None`.
pub fn load_manifest(cargo_toml_path: &Path) -> Result<PackageMetadata> {
    let manifest = std::fs::read_to_string(cargo_toml_path)
        .with_context(|| format!("Failed to read {}", cargo_toml_path.display()))?;

    parse_manifest(&manifest)
        .with_context(|| format!("Failed to parse {}", cargo_toml_path.display()))
}

fn parse_manifest(manifest: &str) -> Result<PackageMetadata> {
    let toml_value: toml::Value = toml::from_str(manifest)?;

    let Some(package) = toml_value.get("package") else {
        bail!("No [package] section in Cargo.toml");
    };

    let name = package
        .get("name")
        .and_then(|v| v.as_str())
        .context("Missing package.name")?
        .to_string();

    let version = package
        .get("version")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    Ok(PackageMetadata { name, version })
}
