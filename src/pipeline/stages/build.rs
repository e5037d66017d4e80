//! Release build invocation.

use crate::pipeline::{
    error::{Error, Result},
    runner::{CommandRunner, Invocation},
    settings::Settings,
    types::BuildTarget,
};

/// `cargo build --release [--features a,b]` in the workspace root.
pub fn build_invocation(settings: &Settings) -> Invocation {
    let target = settings.build_target();
    let invocation = Invocation::new("cargo", settings.root()).args(["build", "--release"]);

    if target.features.is_empty() {
        invocation
    } else {
        invocation.arg("--features").arg(target.features.join(","))
    }
}

/// Run the release build and confirm the binary exists.
///
/// No retry: a build failure is surfaced immediately. The toolchain's own
/// output has already reached the terminal through inherited stdio.
///
/// # Errors
///
/// - [`Error::ToolNotFound`] if `cargo` is not on PATH
/// - [`Error::BuildFailure`] on a non-zero exit, or if the expected binary is absent afterwards
pub async fn invoke_build<R: CommandRunner>(settings: &Settings, runner: &R) -> Result<BuildTarget> {
    let target = settings.build_target();
    let invocation = build_invocation(settings);

    log::info!("Building release binary: {invocation}");

    let outcome = runner.run(&invocation).await?;
    if !outcome.is_success() {
        return Err(Error::BuildFailure {
            command: invocation.to_string(),
            reason: outcome.to_string(),
        });
    }

    if !tokio::fs::try_exists(&target.binary_path).await.unwrap_or(false) {
        return Err(Error::BuildFailure {
            command: invocation.to_string(),
            reason: format!(
                "succeeded but the binary {} was not produced",
                target.binary_path.display()
            ),
        });
    }

    log::info!("✓ Built {}", target.binary_path.display());
    Ok(target)
}
