//! Configuration migrations for projects that use the legacy versioning plugin
//!
//! - **detect**: find legacy plugin targets in a project document
//! - **rules**: pure document rewrites
//! - **runner**: the driver that enumerates projects and performs writes

pub mod detect;
pub mod rules;
pub mod runner;

pub use runner::{MigrationOutcome, MigrationReport, MigrationStep, run_migration};
