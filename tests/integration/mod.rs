//! Integration tests for the workspace-semver binary

mod helpers;
mod test_migrate;
mod test_version;
