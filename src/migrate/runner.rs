//! Migration driver
//!
//! Reads every project document once, runs the pure rules from
//! [`super::rules`], then performs all writes. Nothing is written until every
//! project has been inspected, so an aborted run leaves the workspace as it
//! was.

use super::detect::{LegacyDetection, detect_legacy_targets};
use super::rules::{WorkspaceReleaseConfig, apply_root_changelog_rule, merge_release_config, remove_targets};
use crate::core::config::SemverConfig;
use crate::core::error::SemverResult;
use crate::core::logger::Logger;
use crate::core::tree::{Tree, discover_projects, read_json, write_json};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which schema change to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MigrationStep {
  /// `rootChangelog` -> `skipRootChangelog`
  #[serde(rename = "2.0.0")]
  RootChangelog,
  /// Drop the legacy plugin in favour of a workspace `release` block
  #[serde(rename = "native-release")]
  NativeRelease,
}

impl fmt::Display for MigrationStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MigrationStep::RootChangelog => write!(f, "2.0.0"),
      MigrationStep::NativeRelease => write!(f, "native-release"),
    }
  }
}

impl FromStr for MigrationStep {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "2.0.0" => Ok(MigrationStep::RootChangelog),
      "native-release" => Ok(MigrationStep::NativeRelease),
      other => Err(format!("unknown migration '{}' (expected 2.0.0 or native-release)", other)),
    }
  }
}

/// How a migration run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MigrationOutcome {
  Migrated,
  NothingToDo,
  SyncModeSkipped,
}

/// What a migration run did (or would do, in dry-run mode)
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
  pub step: MigrationStep,
  pub outcome: MigrationOutcome,
  pub dry_run: bool,
  /// Project names whose documents changed
  pub projects: Vec<String>,
  /// Documents written, relative to the workspace root
  pub files: Vec<PathBuf>,
}

struct PendingWrite {
  path: PathBuf,
  doc: Value,
}

/// Run one migration step over the whole workspace
pub fn run_migration(
  tree: &mut dyn Tree,
  config: &SemverConfig,
  step: MigrationStep,
  dry_run: bool,
  logger: &dyn Logger,
) -> SemverResult<MigrationReport> {
  let (outcome, projects, pending) = match step {
    MigrationStep::RootChangelog => plan_root_changelog(tree, config, logger)?,
    MigrationStep::NativeRelease => plan_native_release(tree, config, logger)?,
  };

  let files: Vec<PathBuf> = pending.iter().map(|w| w.path.clone()).collect();

  if !dry_run {
    for write in &pending {
      write_json(tree, &write.path, &write.doc)?;
    }
  }

  Ok(MigrationReport {
    step,
    outcome,
    dry_run,
    projects,
    files,
  })
}

type Plan = (MigrationOutcome, Vec<String>, Vec<PendingWrite>);

fn plan_root_changelog(tree: &dyn Tree, config: &SemverConfig, logger: &dyn Logger) -> SemverResult<Plan> {
  let plugin = &config.plugin.legacy;
  let mut projects = Vec::new();
  let mut pending = Vec::new();

  for project in discover_projects(tree, &config.workspace)? {
    let Some(doc) = read_json(tree, &project.config_path)? else {
      continue;
    };

    if let Some(next) = apply_root_changelog_rule(&doc, plugin) {
      logger.info(&format!("Renaming rootChangelog to skipRootChangelog in {}", project.name));
      projects.push(project.name);
      pending.push(PendingWrite {
        path: project.config_path,
        doc: next,
      });
    }
  }

  if pending.is_empty() {
    logger.info(&format!("No {} config needs rootChangelog migration.", plugin));
    return Ok((MigrationOutcome::NothingToDo, projects, pending));
  }

  Ok((MigrationOutcome::Migrated, projects, pending))
}

fn plan_native_release(tree: &dyn Tree, config: &SemverConfig, logger: &dyn Logger) -> SemverResult<Plan> {
  let plugin = &config.plugin.legacy;
  let mut detected: Vec<(PathBuf, Value, LegacyDetection)> = Vec::new();

  for project in discover_projects(tree, &config.workspace)? {
    let Some(doc) = read_json(tree, &project.config_path)? else {
      continue;
    };
    if let Some(detection) = detect_legacy_targets(&project.name, &doc, plugin) {
      detected.push((project.config_path, doc, detection));
    }
  }

  if detected.is_empty() {
    logger.info(&format!("No {} config detected, skipping migration.", plugin));
    return Ok((MigrationOutcome::NothingToDo, Vec::new(), Vec::new()));
  }

  if let Some((_, _, synced)) = detected.iter().find(|(_, _, d)| d.sync_mode()) {
    logger.info(&format!(
      "Sync mode detected, skipping migration, please migrate manually. (syncVersions is set in {})",
      synced.project
    ));
    return Ok((MigrationOutcome::SyncModeSkipped, Vec::new(), Vec::new()));
  }

  let mut projects = Vec::new();
  let mut pending = Vec::new();

  for (path, doc, detection) in detected {
    for target in &detection.targets {
      for foreign in &target.foreign_post_targets {
        logger.warn(&format!(
          "{}:{} lists post target '{}' from another project, leaving it in place",
          detection.project, target.name, foreign
        ));
      }
    }

    let to_delete = detection.targets_to_delete();
    if let Some(next) = remove_targets(&doc, &to_delete) {
      logger.info(&format!("Removing targets [{}] from {}", to_delete.join(", "), detection.project));
      projects.push(detection.project);
      pending.push(PendingWrite { path, doc: next });
    }
  }

  // Single write of the workspace document, after every project
  let workspace_path = config.workspace.config_file.clone();
  let workspace_doc = read_json(tree, &workspace_path)?;
  let merged = merge_release_config(workspace_doc.as_ref(), &WorkspaceReleaseConfig::default());
  if workspace_doc.as_ref() != Some(&merged) {
    pending.push(PendingWrite {
      path: workspace_path,
      doc: merged,
    });
  }

  logger.info(&format!(
    "Migrated {} project(s) from {} to the workspace release configuration",
    projects.len(),
    plugin
  ));

  Ok((MigrationOutcome::Migrated, projects, pending))
}
