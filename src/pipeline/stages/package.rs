//! Installer packaging through the external installer tool.

use crate::pipeline::{
    error::{Error, Result},
    runner::{CommandRunner, Invocation},
    settings::Settings,
};

/// Render the installer tool command line for `settings`.
///
/// `<program> [<subcommand>] <package_flag> <id> [<manifest_flag>] <manifest> <no_build_flag> <extra...>`
pub fn packaging_invocation(settings: &Settings) -> Invocation {
    let installer = &settings.profile().installer;
    let manifest = settings.manifest();

    let mut invocation = Invocation::new(&installer.program, settings.root());
    if let Some(subcommand) = &installer.subcommand {
        invocation = invocation.arg(subcommand);
    }
    invocation = invocation
        .arg(&installer.package_flag)
        .arg(settings.package_id());
    if let Some(flag) = &installer.manifest_flag {
        invocation = invocation.arg(flag);
    }
    invocation
        .arg(manifest.path().to_string_lossy())
        .arg(&installer.no_build_flag)
        .args(installer.extra_args.iter().cloned())
}

/// Run the installer tool against the already-built binary.
///
/// The tool writes a versioned installer into the profile's output directory;
/// its exact file name is discovered later by the archiver.
///
/// # Errors
///
/// [`Error::PackagingFailure`] if the manifest is missing or the tool exits non-zero.
pub async fn package_installer<R: CommandRunner>(settings: &Settings, runner: &R) -> Result<()> {
    let invocation = packaging_invocation(settings);
    let manifest = settings.manifest();

    if !tokio::fs::try_exists(manifest.path()).await.unwrap_or(false) {
        return Err(Error::PackagingFailure {
            command: invocation.to_string(),
            reason: format!(
                "was not run: installer manifest {} does not exist",
                manifest.path().display()
            ),
        });
    }

    log::info!("Packaging installer: {invocation}");

    let outcome = runner.run(&invocation).await?;
    if !outcome.is_success() {
        return Err(Error::PackagingFailure {
            command: invocation.to_string(),
            reason: outcome.to_string(),
        });
    }

    log::info!("✓ Installer tool finished, output in {}", settings.output_dir().display());
    Ok(())
}
