//! OSD Release - builds, packages and archives the OSD tool installer.
//!
//! Runs the five-stage release pipeline (reset, dependency check, build,
//! package, archive) and exits non-zero on the first failing stage.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let exit_code = match osd_release::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            let output = osd_release::cli::OutputManager::new(false, false);
            output.error(&format!("Error: {e}"));
            for suggestion in e.recovery_suggestions() {
                eprintln!("  • {suggestion}");
            }
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
