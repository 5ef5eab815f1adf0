//! Unified workspace context - build once, pass everywhere
//!
//! `main` resolves the workspace root and loads `semver.toml` once, then every
//! command receives `&WorkspaceContext`.

use crate::core::config::SemverConfig;
use crate::core::error::SemverResult;
use crate::core::tree::FsTree;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct WorkspaceContext {
  /// Workspace root directory
  pub root: PathBuf,

  /// Loaded configuration (defaults when no file exists)
  pub config: SemverConfig,
}

impl WorkspaceContext {
  /// Build workspace context from a root directory
  pub fn build(workspace_root: &Path) -> SemverResult<Self> {
    let config = SemverConfig::load_or_default(workspace_root)?;
    Ok(Self {
      root: workspace_root.to_path_buf(),
      config,
    })
  }

  /// Filesystem tree rooted at the workspace
  pub fn tree(&self) -> FsTree {
    FsTree::new(&self.root)
  }
}
