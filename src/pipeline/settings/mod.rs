//! Configuration structures for the release pipeline.
//!
//! A [`ReleaseProfile`] describes one target platform (features, dependency
//! bundle, installer tool contract, directory layout, archive name). The
//! [`SettingsBuilder`] resolves a profile against a workspace root into
//! [`Settings`], which every stage reads from.

mod builder;
mod core;
mod profile;

pub use builder::SettingsBuilder;
pub use core::Settings;
pub use profile::{ArtifactSelection, DependencySpec, InstallerTool, ReleaseProfile};
