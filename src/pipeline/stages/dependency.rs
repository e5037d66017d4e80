//! Dependency materializer.
//!
//! Checks that the bundled ffmpeg toolchain has been extracted. The default is
//! to stop with extraction instructions; extraction through a 7-Zip binary on
//! PATH is only attempted when the profile (or `--extract`) opts in.

use crate::pipeline::{
    error::{Error, Result},
    runner::{CommandRunner, Invocation},
    settings::Settings,
    tool_detection::SEVEN_ZIP_CANDIDATES,
    types::DependencyBundle,
};
use std::path::Path;

/// What the materializer found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyState {
    /// The profile has no dependency bundle.
    NotRequired,
    /// The extracted directory already existed and was left untouched.
    Present,
    /// The directory was produced by automatic extraction.
    Extracted,
}

/// Ensure the dependency directory exists before the build starts.
///
/// # Errors
///
/// [`Error::MissingDependency`] when the directory is absent and either
/// extraction is disabled or the extraction attempt failed. A failed attempt
/// leaves the workspace as it was: extraction happens in a staging directory
/// that is removed on every path, and only a complete directory is moved into
/// place.
pub async fn materialize<R: CommandRunner>(
    settings: &Settings,
    runner: &R,
) -> Result<DependencyState> {
    let Some(bundle) = settings.dependency() else {
        log::debug!("Profile '{}' has no dependency bundle", settings.profile().name);
        return Ok(DependencyState::NotRequired);
    };

    if bundle.is_materialized().await {
        log::info!("✓ Dependency present: {}", bundle.extracted_dir.display());
        return Ok(DependencyState::Present);
    }

    if !settings.extract() {
        return Err(missing(&bundle, None));
    }

    match extract(settings.root(), &bundle, runner).await {
        Ok(()) => {
            log::info!("✓ Extracted dependency to {}", bundle.extracted_dir.display());
            Ok(DependencyState::Extracted)
        }
        Err(reason) => Err(missing(&bundle, Some(reason))),
    }
}

fn missing(bundle: &DependencyBundle, reason: Option<String>) -> Error {
    Error::MissingDependency {
        archive: bundle.archive.clone(),
        extracted_dir: bundle.extracted_dir.clone(),
        reason,
    }
}

/// Run `7z x <archive> -o<staging> -y` and move the expected directory into
/// place. Errors are returned as a reason string so they can be folded into
/// the missing-dependency diagnostic.
async fn extract<R: CommandRunner>(
    root: &Path,
    bundle: &DependencyBundle,
    runner: &R,
) -> std::result::Result<(), String> {
    if !tokio::fs::try_exists(&bundle.archive).await.unwrap_or(false) {
        return Err(format!("archive {} not found", bundle.archive.display()));
    }

    if tokio::fs::symlink_metadata(&bundle.extracted_dir).await.is_ok() {
        return Err(format!(
            "{} exists but is not a directory",
            bundle.extracted_dir.display()
        ));
    }

    let Some(dir_name) = bundle.extracted_dir.file_name() else {
        return Err(format!(
            "{} has no directory name",
            bundle.extracted_dir.display()
        ));
    };

    let Some(seven_zip) = SEVEN_ZIP_CANDIDATES
        .iter()
        .find_map(|candidate| runner.locate(candidate))
    else {
        return Err(format!(
            "no 7-Zip executable ({}) found on PATH",
            SEVEN_ZIP_CANDIDATES.join(", ")
        ));
    };

    let destination = bundle.extracted_dir.parent().unwrap_or(root);
    tokio::fs::create_dir_all(destination)
        .await
        .map_err(|e| format!("creating {}: {e}", destination.display()))?;

    // Removed when dropped, whichever way this function returns
    let staging = tempfile::Builder::new()
        .prefix(".osd-extract-")
        .tempdir_in(destination)
        .map_err(|e| format!("creating staging directory in {}: {e}", destination.display()))?;

    let invocation = Invocation::new(seven_zip.to_string_lossy(), root)
        .arg("x")
        .arg(bundle.archive.to_string_lossy())
        .arg(format!("-o{}", staging.path().display()))
        .arg("-y");

    log::info!("Extracting {} with {}", bundle.archive.display(), seven_zip.display());

    let outcome = runner
        .run(&invocation)
        .await
        .map_err(|e| e.to_string())?;
    if !outcome.is_success() {
        return Err(format!("`{invocation}` {outcome}"));
    }

    let unpacked = staging.path().join(dir_name);
    let unpacked_is_dir = tokio::fs::metadata(&unpacked)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !unpacked_is_dir {
        return Err(format!(
            "the archive has no top-level '{}' directory",
            dir_name.to_string_lossy()
        ));
    }

    tokio::fs::rename(&unpacked, &bundle.extracted_dir)
        .await
        .map_err(|e| format!("moving {} into place: {e}", unpacked.display()))?;

    log::debug!("Removing staging directory {}", staging.path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{
        runner::CommandOutcome,
        settings::ReleaseProfile,
        testing::{FakeRunner, Workspace},
    };
    use std::path::PathBuf;

    const EXTRACTED: &str = "ext/ffmpeg/windows64/ffmpeg";
    const ARCHIVE: &str = "ext/ffmpeg/windows64/ffmpeg.7z";

    fn extracting_profile() -> ReleaseProfile {
        let mut profile = ReleaseProfile::windows();
        profile.extract = true;
        profile
    }

    /// Output directory passed to 7-Zip as `-o<dir>`.
    fn output_dir(invocation: &Invocation) -> PathBuf {
        let arg = invocation
            .args
            .iter()
            .find(|a| a.starts_with("-o"))
            .unwrap();
        PathBuf::from(&arg[2..])
    }

    /// Fake 7-Zip that unpacks `files` under its `-o` directory, then exits with `code`.
    fn unpacking(files: &'static [&'static str], code: i32) -> FakeRunner {
        FakeRunner::with_handler(move |invocation| {
            let out = output_dir(invocation);
            for file in files {
                let path = out.join(file);
                std::fs::create_dir_all(path.parent().unwrap()).unwrap();
                std::fs::write(path, b"unpacked").unwrap();
            }
            CommandOutcome::exited(code)
        })
        .with_tool("7z", "/usr/bin/7z")
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn present_directory_is_left_untouched() {
        let ws = Workspace::new();
        let marker = ws.write(&format!("{EXTRACTED}/bin/ffmpeg.exe"), b"ffmpeg");
        let before = std::fs::metadata(&marker).unwrap().modified().unwrap();
        let runner = FakeRunner::succeeding();

        let state = materialize(&ws.settings(ReleaseProfile::windows()), &runner)
            .await
            .unwrap();

        assert_eq!(state, DependencyState::Present);
        assert_eq!(std::fs::read(&marker).unwrap(), b"ffmpeg");
        assert_eq!(std::fs::metadata(&marker).unwrap().modified().unwrap(), before);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_directory_halts_without_extracting() {
        let ws = Workspace::new();
        ws.write(ARCHIVE, b"7z");
        let runner = FakeRunner::succeeding().with_tool("7z", "/usr/bin/7z");

        let err = materialize(&ws.settings(ReleaseProfile::windows()), &runner)
            .await
            .unwrap_err();

        match err {
            Error::MissingDependency { archive, extracted_dir, reason } => {
                assert_eq!(archive, ws.path(ARCHIVE));
                assert_eq!(extracted_dir, ws.path(EXTRACTED));
                assert!(reason.is_none());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(runner.calls().is_empty());
        assert!(!ws.path(EXTRACTED).exists());
    }

    #[tokio::test]
    async fn profile_without_dependency_is_a_no_op() {
        let ws = Workspace::new();
        let runner = FakeRunner::succeeding();
        let state = materialize(&ws.settings(ReleaseProfile::linux()), &runner)
            .await
            .unwrap();
        assert_eq!(state, DependencyState::NotRequired);
    }

    #[tokio::test]
    async fn extraction_moves_unpacked_directory_into_place() {
        let ws = Workspace::new();
        ws.write(ARCHIVE, b"7z");
        let runner = unpacking(&["ffmpeg/bin/ffmpeg.exe"], 0);

        let state = materialize(&ws.settings(extracting_profile()), &runner)
            .await
            .unwrap();

        assert_eq!(state, DependencyState::Extracted);
        assert_eq!(
            std::fs::read(ws.path(&format!("{EXTRACTED}/bin/ffmpeg.exe"))).unwrap(),
            b"unpacked"
        );

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "/usr/bin/7z");
        assert_eq!(calls[0].args[0], "x");
        assert_eq!(calls[0].args[1], ws.path(ARCHIVE).to_string_lossy());
        assert_eq!(calls[0].args[3], "-y");
        assert_eq!(
            output_dir(&calls[0]).parent().unwrap(),
            ws.path("ext/ffmpeg/windows64")
        );
        assert_eq!(
            entries(&ws.path("ext/ffmpeg/windows64")),
            vec!["ffmpeg", "ffmpeg.7z"]
        );
    }

    #[tokio::test]
    async fn extraction_without_seven_zip_reports_reason() {
        let ws = Workspace::new();
        ws.write(ARCHIVE, b"7z");
        let runner = FakeRunner::succeeding();

        let err = materialize(&ws.settings(extracting_profile()), &runner)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::MissingDependency { reason: Some(ref r), .. } if r.contains("no 7-Zip executable")
        ));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_extraction_leaves_nothing_behind() {
        let ws = Workspace::new();
        ws.write(ARCHIVE, b"7z");
        let runner = unpacking(&["ffmpeg/half.bin"], 2);

        let err = materialize(&ws.settings(extracting_profile()), &runner)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::MissingDependency { reason: Some(ref r), .. } if r.contains("exited with code 2")
        ));
        assert!(!ws.path(EXTRACTED).exists());
        assert_eq!(entries(&ws.path("ext/ffmpeg/windows64")), vec!["ffmpeg.7z"]);
    }

    #[tokio::test]
    async fn unexpected_archive_layout_leaves_nothing_behind() {
        let ws = Workspace::new();
        ws.write(ARCHIVE, b"7z");
        let runner = unpacking(&["ffmpeg-6.0-essentials_build/bin/ffmpeg.exe"], 0);

        let err = materialize(&ws.settings(extracting_profile()), &runner)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::MissingDependency { reason: Some(ref r), .. } if r.contains("no top-level 'ffmpeg' directory")
        ));
        assert!(!ws.path(EXTRACTED).exists());
        assert_eq!(entries(&ws.path("ext/ffmpeg/windows64")), vec!["ffmpeg.7z"]);
    }

    #[tokio::test]
    async fn existing_file_at_target_is_never_removed() {
        let ws = Workspace::new();
        ws.write(ARCHIVE, b"7z");
        let file = ws.write(EXTRACTED, b"not a directory");
        let runner = unpacking(&["ffmpeg/bin/ffmpeg.exe"], 2);

        let err = materialize(&ws.settings(extracting_profile()), &runner)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::MissingDependency { reason: Some(ref r), .. } if r.contains("is not a directory")
        ));
        assert_eq!(std::fs::read(file).unwrap(), b"not a directory");
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn extraction_requires_the_archive() {
        let ws = Workspace::new();
        let runner = FakeRunner::succeeding().with_tool("7z", "/usr/bin/7z");

        let err = materialize(&ws.settings(extracting_profile()), &runner)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::MissingDependency { reason: Some(ref r), .. } if r.contains("not found")
        ));
        assert!(runner.calls().is_empty());
    }
}
