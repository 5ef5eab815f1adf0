//! Project version orchestration
//!
//! bump (external tool) -> push (optional) -> GitHub release (optional).
//! Each stage short-circuits into `ReleaseResult { success: false }` after
//! logging why; configuration problems are caught before anything runs.

use super::github::{GithubRelease, ReleaseOptions, ReleaseResult};
use crate::core::config::validate_tag_pattern;
use crate::core::context::WorkspaceContext;
use crate::core::error::{ConfigError, ResultExt, SemverError, SemverResult};
use crate::core::logger::Logger;
use crate::core::tree::{ProjectEntry, discover_projects};
use crate::core::vcs::{PushRequest, SystemGit};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// Placeholders understood in tag patterns
const PROJECT_NAME: &str = "{projectName}";
const VERSION: &str = "{version}";

/// Input of one `version` run; `None` fields fall back to semver.toml
#[derive(Debug, Clone, Default)]
pub struct VersionOptions {
  pub project: String,
  /// Explicit bump (`major`, `minor`, `patch` or an exact version)
  pub release_as: Option<String>,
  pub tag_prefix: Option<String>,
  pub dry_run: bool,
  pub no_verify: bool,
  pub push: bool,
  pub remote: Option<String>,
  pub base_branch: Option<String>,
  pub github_release: bool,
  pub generate_notes: bool,
  pub notes: Option<String>,
}

/// Expand `{projectName}` and `{version}` in a tag pattern
pub fn render_tag(pattern: &str, project: &str, version: &str) -> String {
  pattern.replace(PROJECT_NAME, project).replace(VERSION, version)
}

/// Everything before `{version}`, with the project name filled in
pub fn tag_prefix(pattern: &str, project: &str) -> String {
  let head = pattern.split(VERSION).next().unwrap_or_default();
  head.replace(PROJECT_NAME, project)
}

/// Arguments appended to the configured bump command
pub fn bump_args(options: &VersionOptions, prefix: &str) -> Vec<String> {
  let mut args = vec!["--tag-prefix".to_string(), prefix.to_string()];
  if let Some(release_as) = options.release_as.as_deref().filter(|r| !r.is_empty()) {
    args.push("--release-as".to_string());
    args.push(release_as.to_string());
  }
  if options.dry_run {
    args.push("--dry-run".to_string());
  }
  if options.no_verify {
    args.push("--no-verify".to_string());
  }
  args
}

/// Bump, push and publish one project
pub fn run_version(ctx: &WorkspaceContext, options: &VersionOptions, logger: &dyn Logger) -> ReleaseResult {
  match try_run_version(ctx, options, logger) {
    Ok(result) => result,
    Err(e) => {
      logger.error(&e.to_string());
      if let Some(help) = e.help_message() {
        logger.info(&help);
      }
      ReleaseResult::failure()
    }
  }
}

fn try_run_version(ctx: &WorkspaceContext, options: &VersionOptions, logger: &dyn Logger) -> SemverResult<ReleaseResult> {
  let config = &ctx.config.version;
  if let Some(pattern) = &options.tag_prefix {
    validate_tag_pattern("--tag-prefix", pattern)?;
  }

  // Preflight: refuse to start a release that cannot be pushed
  let push = if options.push {
    Some(resolve_push(ctx, options)?)
  } else {
    None
  };

  let project = find_project(ctx, &options.project)?;
  let project_dir = ctx.root.join(&project.root);
  let pattern = options.tag_prefix.as_deref().unwrap_or(&config.tag_prefix);
  let prefix = tag_prefix(pattern, &project.name);

  let (program, leading) = config
    .bump_command
    .split_first()
    .ok_or_else(|| SemverError::Config(ConfigError::MissingField {
      field: "version.bump_command".to_string(),
    }))?;
  let args = bump_args(options, &prefix);

  logger.info(&format!("Bumping {} with {} {}", project.name, program, leading.join(" ")));
  let output = Command::new(program)
    .args(leading)
    .args(&args)
    .current_dir(&project_dir)
    .output();

  match output {
    Ok(output) if output.status.success() => {}
    Ok(output) => {
      logger.error(&format!(
        "Version bump for {} failed ({}): {}",
        project.name,
        output.status,
        String::from_utf8_lossy(&output.stderr).trim()
      ));
      return Ok(ReleaseResult::failure());
    }
    Err(e) => {
      logger.error(&format!("Failed to run {}: {}", program, e));
      return Ok(ReleaseResult::failure());
    }
  }

  if options.dry_run {
    logger.info(&format!("Dry run for {} finished, nothing pushed or released", project.name));
    return Ok(ReleaseResult::success());
  }

  let version = read_manifest_version(&project_dir)?;
  let tag = render_tag(pattern, &project.name, &version.to_string());
  logger.info(&format!("{} is now {} (tag {})", project.name, version, tag));

  if let Some((git, request)) = push {
    tracing::debug!("pushing from {}", git.work_tree().display());
    git.push(&request)?;
    logger.info(&format!("Pushed {} to {}/{}", tag, request.remote, request.branch));
  }

  if options.github_release {
    let release = ReleaseOptions {
      notes: options.notes.clone(),
      generate_notes: options.generate_notes,
      prerelease: !version.pre.is_empty(),
      ..ReleaseOptions::new(&tag)
    };
    return Ok(GithubRelease::new(&ctx.config.release.tool).in_dir(&ctx.root).create(&release, logger));
  }

  Ok(ReleaseResult::success())
}

/// Check remote and branch are known before anything runs
fn resolve_push(ctx: &WorkspaceContext, options: &VersionOptions) -> SemverResult<(SystemGit, PushRequest)> {
  let remote = options
    .remote
    .clone()
    .or_else(|| ctx.config.version.remote.clone())
    .filter(|r| !r.is_empty())
    .ok_or_else(|| SemverError::Config(ConfigError::MissingField {
      field: "version.remote".to_string(),
    }))?;

  let branch = options
    .base_branch
    .clone()
    .or_else(|| ctx.config.version.base_branch.clone())
    .filter(|b| !b.is_empty())
    .ok_or_else(|| SemverError::Config(ConfigError::MissingField {
      field: "version.base_branch".to_string(),
    }))?;

  let git = SystemGit::open(&ctx.root)?;
  if !git.has_remote(&remote)? {
    return Err(SemverError::with_help(
      format!("Remote '{}' is not configured in this repository", remote),
      format!("Add it with `git remote add {} <url>` or pass --remote", remote),
    ));
  }

  Ok((
    git,
    PushRequest {
      remote,
      branch,
      no_verify: options.no_verify,
    },
  ))
}

fn find_project(ctx: &WorkspaceContext, name: &str) -> SemverResult<ProjectEntry> {
  discover_projects(&ctx.tree(), &ctx.config.workspace)?
    .into_iter()
    .find(|p| p.name == name)
    .ok_or_else(|| SemverError::Config(ConfigError::ProjectNotFound { name: name.to_string() }))
}

#[derive(Deserialize)]
struct PackageManifest {
  version: String,
}

/// Version written by the bump tool into the project's package.json
fn read_manifest_version(project_dir: &Path) -> SemverResult<semver::Version> {
  let path = project_dir.join("package.json");
  let content = std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
  let manifest: PackageManifest =
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
  let version =
    semver::Version::parse(&manifest.version).with_context(|| format!("Bad version in {}", path.display()))?;
  Ok(version)
}
