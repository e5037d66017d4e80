//! Command line interface for the release pipeline.
//!
//! Resolves the profile (built-ins + `release.toml` + flags), reads the
//! package metadata, runs the [`Pipeline`] and reports the archive.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use crate::{
    config,
    error::{CliError, ReleaseError, Result},
    metadata,
    pipeline::{CommandRunner, Pipeline, ReleaseProfile, SettingsBuilder, SystemRunner},
};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute(&args, SystemRunner).await
}

/// Run the command described by `args` with the given process runner.
pub async fn execute<R: CommandRunner>(args: &Args, runner: R) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let runtime_config = RuntimeConfig::from(args);
    let output = runtime_config.output();

    let profiles = config::resolve_profiles(&args.root, args.config.as_deref())
        .map_err(ReleaseError::Config)?;

    if args.list_profiles {
        print_profiles(&profiles);
        return Ok(0);
    }

    let name = args.profile_name();
    let profile = profiles
        .iter()
        .find(|p| p.name == name)
        .cloned()
        .ok_or_else(|| CliError::UnknownProfile {
            name: name.to_string(),
            available: profiles.iter().map(|p| p.name.clone()).collect(),
        })?;
    let profile = args.apply_to(profile);
    if args.extract && profile.dependency.is_none() {
        output.warn(&format!(
            "--extract has no effect: profile '{}' has no dependency bundle",
            profile.name
        ));
    }

    let package =
        metadata::load_manifest(&args.root.join("Cargo.toml")).map_err(ReleaseError::Config)?;

    let settings = SettingsBuilder::new()
        .root(&args.root)
        .profile(profile)
        .package(package)
        .build()?;

    let pipeline = Pipeline::new(settings, runner);
    let settings = pipeline.settings();

    output.progress(&format!(
        "Releasing {} {} with profile '{}'",
        settings.package_id(),
        settings.version().unwrap_or("(unversioned)"),
        settings.profile().name
    ));
    output.verbose(&format!("Workspace root: {}", settings.root().display()));
    output.verbose(&format!("Installer output: {}", settings.output_dir().display()));

    let report = pipeline
        .run_with(|stage| output.section(&stage.to_string()))
        .await?;

    output.verbose(&format!("Installer: {}", report.archive.source.path.display()));
    output.success(&format!("Created {}", report.archive.path.display()));
    output.indent(&format!("Size:   {} bytes", report.archive.size));
    output.indent(&format!("SHA256: {}", report.archive.checksum));

    Ok(0)
}

fn print_profiles(profiles: &[ReleaseProfile]) {
    for profile in profiles {
        let installer = &profile.installer;
        let tool = match &installer.subcommand {
            Some(sub) => format!("{} {}", installer.program, sub),
            None => installer.program.clone(),
        };
        println!(
            "{:<10} {} -> {}/*.{} -> {}/{}.zip",
            profile.name,
            tool,
            profile.output_dir.display(),
            profile.installer_extension,
            profile.deploy_dir.display(),
            profile.archive_name
        );
    }
}
