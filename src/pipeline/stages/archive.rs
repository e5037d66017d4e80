//! Installer discovery and distributable archive creation.
//!
//! The installer tool picks its own versioned file name, so the installer is
//! found by extension in the output directory. The reset stage guarantees the
//! directory held no stale installers before packaging.

use crate::pipeline::{
    checksum::calculate_sha256,
    error::{Error, ErrorExt, Result},
    settings::{ArtifactSelection, Settings},
    types::{ArtifactReference, DistributableArchive},
};
use std::{
    fs::File,
    io::{self, BufReader},
    path::{Path, PathBuf},
};

/// Installer files directly inside `dir` with the given extension.
///
/// Matching is case-insensitive and non-recursive; directories are skipped.
/// Results are sorted by path. A missing directory yields an empty list.
pub async fn discover_installers(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.to_path_buf();
    let extension = extension.to_string();
    tokio::task::spawn_blocking(move || scan_installers(&dir, &extension)).await?
}

fn scan_installers(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        glob::Pattern::escape(extension)
    );
    let options = glob::MatchOptions {
        case_sensitive: false,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };

    let entries = glob::glob_with(&pattern, options)
        .map_err(|e| Error::GenericError(format!("invalid installer pattern {pattern}: {e}")))?;

    let mut matches = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::Fs {
            context: "scanning for installers".to_string(),
            path: e.path().to_path_buf(),
            error: e.into_error(),
        })?;
        if path.is_file() {
            log::debug!("  ✓ Installer candidate: {}", path.display());
            matches.push(path);
        }
    }
    matches.sort();

    Ok(matches)
}

/// Apply the selection policy to the discovered candidates.
///
/// # Errors
///
/// - [`Error::ArtifactNotFound`] for zero candidates
/// - [`Error::AmbiguousArtifact`] for several candidates under [`ArtifactSelection::Strict`]
pub fn select_installer(
    mut matches: Vec<PathBuf>,
    selection: ArtifactSelection,
    dir: &Path,
    extension: &str,
) -> Result<ArtifactReference> {
    match (matches.len(), selection) {
        (0, _) => Err(Error::ArtifactNotFound {
            dir: dir.to_path_buf(),
            extension: extension.to_string(),
        }),
        (1, _) => Ok(ArtifactReference {
            path: matches.remove(0),
        }),
        (_, ArtifactSelection::Strict) => Err(Error::AmbiguousArtifact {
            dir: dir.to_path_buf(),
            matches,
        }),
        (count, ArtifactSelection::First) => {
            let path = matches.remove(0);
            log::warn!(
                "Found {} installers in {}, using {}",
                count,
                dir.display(),
                path.display()
            );
            Ok(ArtifactReference { path })
        }
    }
}

/// Find the generated installer and zip it to the fixed destination.
///
/// Nothing under the deploy directory is created or modified unless exactly
/// one installer was selected. The zip is written next to the destination and
/// renamed over it, so an interrupted run never leaves a truncated archive at
/// the published path.
pub async fn archive_installer(settings: &Settings) -> Result<DistributableArchive> {
    let output_dir = settings.output_dir();
    let extension = settings.installer_extension();

    log::debug!("Scanning for *.{} in {}", extension, output_dir.display());
    let matches = discover_installers(&output_dir, extension).await?;
    let source = select_installer(matches, settings.selection(), &output_dir, extension)?;

    let deploy_dir = settings.deploy_dir();
    tokio::fs::create_dir_all(&deploy_dir)
        .await
        .fs_context("creating deploy directory", &deploy_dir)?;

    let archive_path = settings.archive_path();
    let partial_path = archive_path.with_extension("zip.partial");

    let written = {
        let installer = source.path.clone();
        let entry_name = source.file_name();
        let partial = partial_path.clone();
        tokio::task::spawn_blocking(move || write_zip(&installer, &entry_name, &partial)).await?
    };
    if let Err(e) = written {
        if let Err(cleanup) = tokio::fs::remove_file(&partial_path).await {
            log::debug!("No partial archive to clean up: {cleanup}");
        }
        return Err(e);
    }

    tokio::fs::rename(&partial_path, &archive_path)
        .await
        .fs_context("replacing distributable archive", &archive_path)?;

    let size = tokio::fs::metadata(&archive_path)
        .await
        .fs_context("reading archive metadata", &archive_path)?
        .len();
    let checksum = calculate_sha256(&archive_path).await?;

    log::info!(
        "✓ Archived {} into {} ({} bytes)",
        source.file_name(),
        archive_path.display(),
        size
    );

    Ok(DistributableArchive {
        path: archive_path,
        source,
        size,
        checksum,
    })
}

/// Write a zip with a single deflated entry holding `installer`.
fn write_zip(installer: &Path, entry_name: &str, destination: &Path) -> Result<()> {
    let input = File::open(installer).fs_context("opening installer", installer)?;
    let output = File::create(destination).fs_context("creating archive", destination)?;

    let mut zip = zip::ZipWriter::new(output);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    zip.start_file(entry_name, options)?;
    io::copy(&mut BufReader::new(input), &mut zip)
        .fs_context("compressing installer", installer)?;
    zip.finish()?;

    Ok(())
}
