//! Release publishing
//!
//! - **github**: `gh release create` invoker
//! - **version**: bump -> push -> release orchestration for one project
//!
//! Both report `ReleaseResult`; subprocess failures are logged, not raised.

pub mod github;
pub mod version;

pub use github::{GithubRelease, ReleaseOptions};
pub use version::{VersionOptions, run_version};
