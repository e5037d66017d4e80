//! The five pipeline stages, in execution order.
//!
//! - [`reset`] - remove the installer tool's output directory
//! - [`dependency`] - check (or optionally extract) the bundled dependency
//! - [`build`] - `cargo build --release` with the profile's features
//! - [`package`] - run the installer tool without rebuilding
//! - [`archive`] - locate the installer and zip it for distribution

pub mod archive;
pub mod build;
pub mod dependency;
pub mod package;
pub mod reset;

pub use archive::archive_installer;
pub use build::invoke_build;
pub use dependency::{DependencyState, materialize};
pub use package::package_installer;
pub use reset::reset_workspace;
