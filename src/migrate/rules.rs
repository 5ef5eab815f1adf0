//! Pure rewrite rules for project and workspace documents
//!
//! Rules take a document and return `Some(new_document)` only when something
//! changes. They never read or write files; the runner owns all I/O.

use super::detect::{is_legacy_version_executor, truthy};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Tag pattern written to the workspace release block
pub const RELEASE_TAG_PATTERN: &str = "{projectName}-{version}";

/// Replace `rootChangelog` with its negation `skipRootChangelog`
///
/// A missing `rootChangelog` counts as `true`. Options that already carry
/// `skipRootChangelog` and no `rootChangelog` were migrated before and are left
/// alone.
pub fn rename_root_changelog(options: &Map<String, Value>) -> Option<Map<String, Value>> {
  let root_changelog = options.get("rootChangelog");
  if root_changelog.is_none() && options.contains_key("skipRootChangelog") {
    return None;
  }

  // Hand-written configs sometimes carry 0/1 or strings here
  let enabled = root_changelog.map(truthy).unwrap_or(true);

  let mut next = options.clone();
  next.shift_remove("rootChangelog");
  next.insert("skipRootChangelog".to_string(), Value::Bool(!enabled));
  Some(next)
}

/// Apply [`rename_root_changelog`] to every legacy version target of a project
pub fn apply_root_changelog_rule(doc: &Value, plugin: &str) -> Option<Value> {
  let targets = doc.get("targets")?.as_object()?;
  let mut next_targets = targets.clone();
  let mut changed = false;

  for (name, target) in targets {
    let is_legacy = target
      .get("executor")
      .and_then(Value::as_str)
      .is_some_and(|executor| is_legacy_version_executor(executor, plugin));
    if !is_legacy {
      continue;
    }

    let empty = Map::new();
    let options = target.get("options").and_then(Value::as_object).unwrap_or(&empty);
    if let Some(next_options) = rename_root_changelog(options) {
      let mut next_target = target.clone();
      if let Some(obj) = next_target.as_object_mut() {
        obj.insert("options".to_string(), Value::Object(next_options));
      }
      next_targets.insert(name.clone(), next_target);
      changed = true;
    }
  }

  if !changed {
    return None;
  }

  let mut next = doc.clone();
  next["targets"] = Value::Object(next_targets);
  Some(next)
}

/// Delete the named targets from a project document
pub fn remove_targets(doc: &Value, names: &[String]) -> Option<Value> {
  let targets = doc.get("targets")?.as_object()?;
  if !names.iter().any(|n| targets.contains_key(n)) {
    return None;
  }

  let mut next_targets = targets.clone();
  for name in names {
    next_targets.shift_remove(name);
  }

  let mut next = doc.clone();
  next["targets"] = Value::Object(next_targets);
  Some(next)
}

/// Workspace-wide release block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceReleaseConfig {
  pub release_tag_pattern: String,
  pub changelog: ChangelogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogConfig {
  pub git: GitChangelogConfig,
  pub workspace_changelog: WorkspaceChangelogConfig,
  pub project_changelogs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitChangelogConfig {
  pub commit: bool,
  pub tag: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceChangelogConfig {
  pub create_release: CreateRelease,
  pub file: bool,
}

/// `"github"` or `false`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateRelease {
  Github,
  #[allow(dead_code)] // The migrated block always publishes; `false` is the other value the schema accepts
  Disabled,
}

impl Serialize for CreateRelease {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      CreateRelease::Github => serializer.serialize_str("github"),
      CreateRelease::Disabled => serializer.serialize_bool(false),
    }
  }
}

impl Default for WorkspaceReleaseConfig {
  /// The block produced for projects leaving the legacy plugin
  fn default() -> Self {
    Self {
      release_tag_pattern: RELEASE_TAG_PATTERN.to_string(),
      changelog: ChangelogConfig {
        git: GitChangelogConfig { commit: true, tag: true },
        workspace_changelog: WorkspaceChangelogConfig {
          create_release: CreateRelease::Github,
          file: false,
        },
        project_changelogs: true,
      },
    }
  }
}

/// Merge the release block into the workspace document
///
/// Keys of an existing `release` object that the block does not set survive.
pub fn merge_release_config(workspace_doc: Option<&Value>, release: &WorkspaceReleaseConfig) -> Value {
  let mut doc = match workspace_doc {
    Some(Value::Object(map)) => map.clone(),
    _ => Map::new(),
  };

  let mut release_obj = match doc.get("release") {
    Some(Value::Object(existing)) => existing.clone(),
    _ => Map::new(),
  };

  if let Ok(Value::Object(block)) = serde_json::to_value(release) {
    for (key, value) in block {
      release_obj.insert(key, value);
    }
  }

  doc.insert("release".to_string(), Value::Object(release_obj));
  Value::Object(doc)
}
