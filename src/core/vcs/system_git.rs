//! System git backend
//!
//! Runs the `git` binary for the handful of operations a release needs:
//! locating the repository, checking remotes and pushing.

use super::PushRequest;
use crate::core::error::{GitError, ResultExt, SemverError, SemverResult};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Environment variables passed through to local git plumbing (everything else is cleared)
const PASSTHROUGH_ENV: &[&str] = &["PATH", "HOME", "SSH_AUTH_SOCK", "GIT_SSH_COMMAND", "GIT_ASKPASS"];

/// Git backend using system git
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  pub fn open(path: &Path) -> SemverResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(SemverError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(SemverError::Git(GitError::CommandFailed {
        command: "git rev-parse --show-toplevel".to_string(),
        stderr: stderr.trim().to_string(),
      }));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Working tree root as reported by git
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// List all remotes as (name, fetch url)
  pub fn list_remotes(&self) -> SemverResult<Vec<(String, String)>> {
    let output = self
      .git_cmd()
      .args(["remote", "-v"])
      .output()
      .context("Failed to list remotes")?;

    if !output.status.success() {
      return Ok(vec![]);
    }

    Ok(parse_remotes(&String::from_utf8_lossy(&output.stdout)))
  }

  /// Check if remote exists
  pub fn has_remote(&self, name: &str) -> SemverResult<bool> {
    let remotes = self.list_remotes()?;
    Ok(remotes.iter().any(|(n, _)| n == name))
  }

  /// Push the release branch and its tags
  pub fn push(&self, request: &PushRequest) -> SemverResult<()> {
    tracing::debug!("git {}", request.args().join(" "));

    let output = self
      .network_cmd()
      .args(request.args())
      .output()
      .context("Failed to push")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(SemverError::Git(GitError::PushFailed {
        remote: request.remote.clone(),
        branch: request.branch.clone(),
        reason: stderr.trim().to_string(),
      }));
    }

    Ok(())
  }

  /// Create a git command with an isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables except [`PASSTHROUGH_ENV`]
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    cmd.env_clear();
    for key in PASSTHROUGH_ENV {
      if let Ok(value) = std::env::var(key) {
        cmd.env(key, value);
      }
    }

    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("core.quotePath=false");

    cmd
  }

  /// Create a git command for talking to a remote
  ///
  /// Inherits the caller's environment: credential helpers, proxies and
  /// hooks read tokens and settings from it.
  pub(crate) fn network_cmd(&self) -> Command {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(&self.repo_path);
    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("core.quotePath=false");
    cmd
  }
}

/// Parse `git remote -v` output, keeping the fetch urls
fn parse_remotes(stdout: &str) -> Vec<(String, String)> {
  let mut remotes = Vec::new();

  for line in stdout.lines() {
    // Format: "origin  git@github.com:user/repo.git (fetch)"
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() >= 2 && line.contains("(fetch)") {
      remotes.push((parts[0].to_string(), parts[1].to_string()));
    }
  }

  remotes
}
