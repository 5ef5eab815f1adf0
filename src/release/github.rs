//! GitHub release creation via the gh CLI
//!
//! One call runs `gh release create` exactly once. Whatever goes wrong
//! (missing binary, non-zero exit) is logged and reported as
//! `ReleaseResult { success: false }`; nothing is returned as an error.

use crate::core::logger::Logger;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Input of one `release create` call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReleaseOptions {
  /// Git tag to release (required)
  pub tag: String,
  /// Assets to upload
  pub files: Vec<String>,
  pub notes: Option<String>,
  pub notes_file: Option<String>,
  /// Branch or SHA the tag is created from when it does not exist yet
  pub target: Option<String>,
  pub draft: bool,
  pub title: Option<String>,
  pub prerelease: bool,
  pub discussion_category: Option<String>,
  /// `owner/repo`, when not the repository in the working directory
  pub repo: Option<String>,
  pub generate_notes: bool,
  pub notes_start_tag: Option<String>,
}

impl ReleaseOptions {
  pub fn new(tag: impl Into<String>) -> Self {
    Self {
      tag: tag.into(),
      ..Default::default()
    }
  }
}

/// Uniform outcome of a subprocess-backed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReleaseResult {
  pub success: bool,
}

impl ReleaseResult {
  pub fn success() -> Self {
    Self { success: true }
  }

  pub fn failure() -> Self {
    Self { success: false }
  }
}

/// Release publisher backed by a `gh`-compatible binary
#[derive(Debug, Clone)]
pub struct GithubRelease {
  program: String,
  cwd: Option<PathBuf>,
}

impl GithubRelease {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      cwd: None,
    }
  }

  /// Run the tool from `dir` (so `gh` picks up that repository)
  pub fn in_dir(mut self, dir: &Path) -> Self {
    self.cwd = Some(dir.to_path_buf());
    self
  }

  /// Arguments after the program name, in the documented order
  pub fn build_args(options: &ReleaseOptions) -> Vec<String> {
    let mut args = vec!["release".to_string(), "create".to_string(), options.tag.clone()];
    args.extend(options.files.iter().cloned());

    push_value(&mut args, "--notes", &options.notes);
    push_value(&mut args, "--notes-file", &options.notes_file);
    push_value(&mut args, "--target", &options.target);
    push_flag(&mut args, "--draft", options.draft);
    push_value(&mut args, "--title", &options.title);
    push_flag(&mut args, "--prerelease", options.prerelease);
    push_value(&mut args, "--discussion-category", &options.discussion_category);
    push_value(&mut args, "--repo", &options.repo);
    push_flag(&mut args, "--generate-notes", options.generate_notes);
    push_value(&mut args, "--notes-start-tag", &options.notes_start_tag);

    args
  }

  /// Create the release; never fails past this boundary
  pub fn create(&self, options: &ReleaseOptions, logger: &dyn Logger) -> ReleaseResult {
    if options.tag.trim().is_empty() {
      logger.error("Cannot create a release without a tag");
      return ReleaseResult::failure();
    }

    let args = Self::build_args(options);
    tracing::debug!("{} {}", self.program, args.join(" "));

    let mut cmd = Command::new(&self.program);
    cmd.args(&args);
    if let Some(dir) = &self.cwd {
      cmd.current_dir(dir);
    }

    match cmd.output() {
      Ok(output) if output.status.success() => {
        logger.info(&format!("Created release {}", options.tag));
        ReleaseResult::success()
      }
      Ok(output) => {
        let stderr = String::from_utf8_lossy(&output.stderr);
        logger.error(&format!(
          "{} release create {} failed ({}): {}",
          self.program,
          options.tag,
          output.status,
          stderr.trim()
        ));
        ReleaseResult::failure()
      }
      Err(e) => {
        logger.error(&format!("Failed to run {}: {}", self.program, e));
        ReleaseResult::failure()
      }
    }
  }
}

fn push_value(args: &mut Vec<String>, flag: &str, value: &Option<String>) {
  if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
    args.push(flag.to_string());
    args.push(value.to_string());
  }
}

fn push_flag(args: &mut Vec<String>, flag: &str, enabled: bool) {
  if enabled {
    args.push(flag.to_string());
  }
}
