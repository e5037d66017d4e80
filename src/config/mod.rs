//! Profile overrides from `release.toml`.
//!
//! The file holds a `[profiles.<name>]` table per platform. Every field is
//! optional: for a built-in profile name the given fields replace the built-in
//! values, for any other name they define a new profile from scratch.
//!
//! ```toml
//! [profiles.windows]
//! archive_name = "osd-tool-win"
//! selection = "first"
//!
//! [profiles.windows.installer]
//! extra_args = ["--nocapture", "--target", "x86_64-pc-windows-msvc"]
//! ```

use crate::pipeline::{ArtifactSelection, DependencySpec, InstallerTool, ReleaseProfile};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Default config file name looked up in the workspace root.
pub const DEFAULT_CONFIG_FILE: &str = "release.toml";

/// Parsed `release.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Overrides keyed by profile name
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileOverride>,
}

/// Optional replacement for each [`ReleaseProfile`] field.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileOverride {
    pub features: Option<Vec<String>>,
    pub binary_name: Option<String>,
    pub package: Option<String>,
    pub dependency: Option<DependencySpec>,
    /// Set to `true` to drop a built-in dependency bundle
    #[serde(default)]
    pub no_dependency: bool,
    pub extract: Option<bool>,
    pub installer: Option<InstallerOverride>,
    pub output_dir: Option<PathBuf>,
    pub installer_extension: Option<String>,
    pub deploy_dir: Option<PathBuf>,
    pub archive_name: Option<String>,
    pub selection: Option<ArtifactSelection>,
}

/// Optional replacement for each [`InstallerTool`] field.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallerOverride {
    pub program: Option<String>,
    pub subcommand: Option<String>,
    pub package_flag: Option<String>,
    pub manifest_flag: Option<String>,
    pub manifest: Option<PathBuf>,
    pub no_build_flag: Option<String>,
    pub extra_args: Option<Vec<String>>,
}

impl InstallerOverride {
    fn apply(self, mut base: InstallerTool) -> InstallerTool {
        if let Some(program) = self.program {
            base.program = program;
        }
        if let Some(subcommand) = self.subcommand {
            base.subcommand = (!subcommand.is_empty()).then_some(subcommand);
        }
        if let Some(flag) = self.package_flag {
            base.package_flag = flag;
        }
        if let Some(flag) = self.manifest_flag {
            base.manifest_flag = (!flag.is_empty()).then_some(flag);
        }
        if let Some(manifest) = self.manifest {
            base.manifest = manifest;
        }
        if let Some(flag) = self.no_build_flag {
            base.no_build_flag = flag;
        }
        if let Some(args) = self.extra_args {
            base.extra_args = args;
        }
        base
    }
}

impl ProfileOverride {
    /// Applies the override on top of `base`.
    pub fn apply(self, mut base: ReleaseProfile) -> ReleaseProfile {
        if let Some(features) = self.features {
            base.features = features;
        }
        if self.binary_name.is_some() {
            base.binary_name = self.binary_name;
        }
        if self.package.is_some() {
            base.package = self.package;
        }
        if self.no_dependency {
            base.dependency = None;
        } else if self.dependency.is_some() {
            base.dependency = self.dependency;
        }
        if let Some(extract) = self.extract {
            base.extract = extract;
        }
        if let Some(installer) = self.installer {
            base.installer = installer.apply(base.installer);
        }
        if let Some(dir) = self.output_dir {
            base.output_dir = dir;
        }
        if let Some(extension) = self.installer_extension {
            base.installer_extension = extension;
        }
        if let Some(dir) = self.deploy_dir {
            base.deploy_dir = dir;
        }
        if let Some(name) = self.archive_name {
            base.archive_name = name;
        }
        if let Some(selection) = self.selection {
            base.selection = selection;
        }
        base
    }

    /// Builds a profile that has no built-in counterpart.
    ///
    /// `installer.program`, `output_dir`, `installer_extension` and
    /// `archive_name` are required; everything else falls back to the
    /// conventions of the built-in profiles.
    pub fn into_profile(self, name: &str) -> Result<ReleaseProfile> {
        let installer = self
            .installer
            .as_ref()
            .with_context(|| format!("profile '{name}' needs an [installer] table"))?;
        if installer.program.is_none() {
            bail!("profile '{name}' needs installer.program");
        }
        if self.output_dir.is_none() {
            bail!("profile '{name}' needs output_dir");
        }
        if self.installer_extension.is_none() {
            bail!("profile '{name}' needs installer_extension");
        }
        if self.archive_name.is_none() {
            bail!("profile '{name}' needs archive_name");
        }

        let base = ReleaseProfile {
            name: name.to_string(),
            features: Vec::new(),
            binary_name: None,
            package: None,
            dependency: None,
            extract: false,
            installer: InstallerTool {
                program: String::new(),
                subcommand: None,
                package_flag: "--package".into(),
                manifest_flag: None,
                manifest: PathBuf::from("Cargo.toml"),
                no_build_flag: "--no-build".into(),
                extra_args: Vec::new(),
            },
            output_dir: PathBuf::new(),
            installer_extension: String::new(),
            deploy_dir: PathBuf::from("_deploy"),
            archive_name: String::new(),
            selection: ArtifactSelection::Strict,
        };

        Ok(self.apply(base))
    }
}

impl ConfigFile {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Merge the overrides into `profiles`, appending new profiles at the end.
    pub fn merge_into(self, profiles: &mut Vec<ReleaseProfile>) -> Result<()> {
        for (name, overrides) in self.profiles {
            match profiles.iter_mut().find(|p| p.name == name) {
                Some(existing) => {
                    log::debug!("Applying overrides to profile '{name}'");
                    *existing = overrides.apply(existing.clone());
                }
                None => {
                    log::debug!("Defining profile '{name}' from config");
                    profiles.push(overrides.into_profile(&name)?);
                }
            }
        }
        Ok(())
    }
}

/// Built-in profiles with the config file applied.
///
/// `explicit` must exist when given. Otherwise `<root>/release.toml` is used
/// if present, and the built-ins are returned unchanged if it is not.
pub fn resolve_profiles(root: &Path, explicit: Option<&Path>) -> Result<Vec<ReleaseProfile>> {
    let mut profiles = ReleaseProfile::builtins();

    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let candidate = root.join(DEFAULT_CONFIG_FILE);
            candidate.is_file().then_some(candidate)
        }
    };

    if let Some(path) = path {
        log::info!("Loading release profiles from {}", path.display());
        ConfigFile::load(&path)?.merge_into(&mut profiles)?;
    }

    Ok(profiles)
}
