//! Core building blocks shared by every command
//!
//! - **config**: `semver.toml` parsing and validation
//! - **context**: workspace root + config, loaded once in `main`
//! - **error**: error types with exit codes and help text
//! - **logger**: injected logging capability
//! - **tree**: workspace file tree and project registry
//! - **vcs**: system git backend

pub mod config;
pub mod context;
pub mod error;
pub mod logger;
pub mod tree;
pub mod vcs;
