//! CLI commands for workspace-semver
//!
//! - **migrate**: rewrite project and workspace documents for a plugin schema change
//! - **github_release**: create a hosted release from a tag
//! - **version**: bump, push and release a single project
//!
//! All commands accept `&WorkspaceContext`; `main` builds it once.

pub mod github_release;
pub mod migrate;
pub mod version;

pub use github_release::run_github_release;
pub use migrate::run_migrate;
pub use version::run_version;
