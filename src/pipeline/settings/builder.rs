//! Builder for constructing Settings.

use super::{ReleaseProfile, Settings};
use crate::{
    metadata::PackageMetadata,
    pipeline::error::{Context, Error, ErrorExt, Result},
};
use path_absolutize::Absolutize;
use std::path::{Component, Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use osd_release::metadata::PackageMetadata;
/// use osd_release::pipeline::{ReleaseProfile, SettingsBuilder};
///
/// # fn example() -> osd_release::pipeline::Result<()> {
/// let settings = SettingsBuilder::new()
///     .root(".")
///     .profile(ReleaseProfile::windows())
///     .package(PackageMetadata::new("walksnail-osd-tool", Some("1.0.0".into())))
///     .build()?;
/// assert!(settings.archive_path().ends_with("_deploy/walksnail-osd-tool-windows.zip"));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    root: Option<PathBuf>,
    profile: Option<ReleaseProfile>,
    package: Option<PackageMetadata>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the workspace root.
    ///
    /// Default: current directory. A relative root is made absolute against
    /// the process working directory, since tools are spawned inside the root.
    pub fn root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the release profile.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn profile(mut self, profile: ReleaseProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Sets package metadata.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn package(mut self, package: PackageMetadata) -> Self {
        self.package = Some(package);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// - `GenericError` if `profile` or `package` is missing
    /// - `InvalidLayout` if an output path is absolute, empty or contains `..`,
    ///   or if the extension, archive name or installer program is unusable
    pub fn build(self) -> Result<Settings> {
        let mut profile = self.profile.context("profile is required")?;
        let package = self.package.context("package metadata is required")?;
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        let root = root
            .absolutize()
            .fs_context("resolving workspace root", &root)?
            .into_owned();

        validate_contained("output_dir", &profile.output_dir)?;
        validate_contained("deploy_dir", &profile.deploy_dir)?;

        profile.installer_extension = profile
            .installer_extension
            .trim_start_matches('.')
            .to_string();
        if profile.installer_extension.is_empty() {
            return Err(Error::InvalidLayout(format!(
                "profile '{}' has an empty installer_extension",
                profile.name
            )));
        }

        if profile.archive_name.is_empty()
            || profile.archive_name.contains(['/', '\\'])
            || profile.archive_name == ".."
        {
            return Err(Error::InvalidLayout(format!(
                "archive_name '{}' must be a plain file stem",
                profile.archive_name
            )));
        }

        if profile.installer.program.trim().is_empty() {
            return Err(Error::InvalidLayout(format!(
                "profile '{}' has no installer program",
                profile.name
            )));
        }

        Ok(Settings::new(root, profile, package))
    }
}

/// Rejects paths that would let the pipeline write or delete outside the root.
fn validate_contained(field: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidLayout(format!("{field} must not be empty")));
    }

    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::InvalidLayout(format!(
                    "{field} '{}' must be a relative path inside the workspace",
                    path.display()
                )));
            }
        }
    }

    if depth == 0 {
        return Err(Error::InvalidLayout(format!(
            "{field} '{}' resolves to the workspace root itself",
            path.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package() -> PackageMetadata {
        PackageMetadata::new("walksnail-osd-tool", Some("1.2.3".into()))
    }

    fn build_with(profile: ReleaseProfile) -> Result<Settings> {
        SettingsBuilder::new()
            .root("/work")
            .profile(profile)
            .package(package())
            .build()
    }

    #[test]
    fn resolves_paths_against_root() {
        let settings = build_with(ReleaseProfile::windows()).unwrap();
        assert_eq!(settings.output_dir(), PathBuf::from("/work/target/wix"));
        assert_eq!(
            settings.archive_path(),
            PathBuf::from("/work/_deploy/walksnail-osd-tool-windows.zip")
        );
        assert_eq!(settings.package_id(), "walksnail-osd-tool");
        assert_eq!(
            settings.manifest().path(),
            Path::new("/work/wix/main.wxs")
        );
    }

    #[test]
    fn relative_root_is_made_absolute() {
        let settings = SettingsBuilder::new()
            .root("sub/ws")
            .profile(ReleaseProfile::windows())
            .package(package())
            .build()
            .unwrap();

        let expected = std::env::current_dir().unwrap().join("sub/ws");
        assert!(settings.root().is_absolute());
        assert_eq!(settings.root(), expected);
        assert_eq!(settings.manifest().path(), expected.join("wix/main.wxs"));
        assert_eq!(settings.output_dir(), expected.join("target/wix"));
    }

    #[test]
    fn parent_components_in_root_are_normalized() {
        let settings = SettingsBuilder::new()
            .root("/work/tools/../osd")
            .profile(ReleaseProfile::windows())
            .package(package())
            .build()
            .unwrap();
        assert_eq!(settings.root(), Path::new("/work/osd"));
    }

    #[test]
    fn profile_package_overrides_manifest_name() {
        let mut profile = ReleaseProfile::windows();
        profile.package = Some("osd-tool".into());
        let settings = build_with(profile).unwrap();
        assert_eq!(settings.package_id(), "osd-tool");
    }

    #[test]
    fn rejects_output_dir_escaping_root() {
        let mut profile = ReleaseProfile::windows();
        profile.output_dir = PathBuf::from("../elsewhere");
        assert!(matches!(build_with(profile), Err(Error::InvalidLayout(_))));
    }

    #[test]
    fn rejects_absolute_deploy_dir() {
        let mut profile = ReleaseProfile::windows();
        profile.deploy_dir = PathBuf::from("/tmp/deploy");
        assert!(matches!(build_with(profile), Err(Error::InvalidLayout(_))));
    }

    #[test]
    fn rejects_output_dir_equal_to_root() {
        let mut profile = ReleaseProfile::windows();
        profile.output_dir = PathBuf::from("./.");
        assert!(matches!(build_with(profile), Err(Error::InvalidLayout(_))));
    }

    #[test]
    fn strips_leading_dot_from_extension() {
        let mut profile = ReleaseProfile::windows();
        profile.installer_extension = ".msi".into();
        let settings = build_with(profile).unwrap();
        assert_eq!(settings.installer_extension(), "msi");
    }

    #[test]
    fn rejects_archive_name_with_separator() {
        let mut profile = ReleaseProfile::windows();
        profile.archive_name = "nested/name".into();
        assert!(matches!(build_with(profile), Err(Error::InvalidLayout(_))));
    }

    #[test]
    fn missing_profile_is_an_error() {
        let err = SettingsBuilder::new().package(package()).build().unwrap_err();
        assert!(err.to_string().contains("profile is required"));
    }
}
