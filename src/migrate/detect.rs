//! Legacy-plugin detection
//!
//! An executor string has the shape `<package>[:<name>]`. A target belongs to
//! the legacy plugin when `<package>` equals the plugin id exactly, and it is
//! the legacy *version* target when `<name>` is `version`. Both migration
//! steps use this one rule; the native-release step additionally removes any
//! other executor of the plugin so no reference to it survives.

use serde_json::Value;

/// Sub-executor that performs the version bump
pub const VERSION_EXECUTOR: &str = "version";

/// An executor string split into package and executor name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorRef<'a> {
  pub package: &'a str,
  pub name: Option<&'a str>,
}

impl<'a> ExecutorRef<'a> {
  pub fn parse(executor: &'a str) -> Self {
    match executor.split_once(':') {
      Some((package, name)) => Self {
        package,
        name: Some(name),
      },
      None => Self {
        package: executor,
        name: None,
      },
    }
  }
}

/// True if `executor` belongs to `plugin`
pub fn is_legacy_executor(executor: &str, plugin: &str) -> bool {
  ExecutorRef::parse(executor).package == plugin
}

/// True if `executor` is `<plugin>:version`
pub fn is_legacy_version_executor(executor: &str, plugin: &str) -> bool {
  let parsed = ExecutorRef::parse(executor);
  parsed.package == plugin && parsed.name == Some(VERSION_EXECUTOR)
}

/// Loose truthiness for option values written by hand
pub fn truthy(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
    Value::String(s) => !s.is_empty(),
    Value::Array(_) | Value::Object(_) => true,
  }
}

/// A legacy version target found in a project document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTarget {
  /// Target name inside the project
  pub name: String,

  /// Post targets that live in this project (deleted with the target)
  pub post_targets: Vec<String>,

  /// Post targets that point at other projects (left alone)
  pub foreign_post_targets: Vec<String>,

  /// `options.syncVersions` was true
  pub sync_versions: bool,
}

/// Legacy plugin usage in one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyDetection {
  pub project: String,
  pub targets: Vec<LegacyTarget>,
  /// Other targets run by a plugin executor (e.g. `<plugin>:github`)
  pub companion_targets: Vec<String>,
}

impl LegacyDetection {
  /// Any target runs in sync mode
  pub fn sync_mode(&self) -> bool {
    self.targets.iter().any(|t| t.sync_versions)
  }

  /// Legacy targets, their local post targets, then companion targets, deduplicated
  pub fn targets_to_delete(&self) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let version_targets = self
      .targets
      .iter()
      .flat_map(|t| std::iter::once(&t.name).chain(&t.post_targets));
    for name in version_targets.chain(&self.companion_targets) {
      if !names.contains(name) {
        names.push(name.clone());
      }
    }
    names
  }
}

/// Find the legacy plugin targets of a project document
///
/// Returns `None` when no target uses the plugin.
pub fn detect_legacy_targets(project: &str, doc: &Value, plugin: &str) -> Option<LegacyDetection> {
  let targets = doc.get("targets")?.as_object()?;

  let found: Vec<LegacyTarget> = targets
    .iter()
    .filter(|(_, target)| {
      target
        .get("executor")
        .and_then(Value::as_str)
        .is_some_and(|executor| is_legacy_version_executor(executor, plugin))
    })
    .map(|(name, target)| {
      let options = target.get("options");
      let sync_versions = options
        .and_then(|o| o.get("syncVersions"))
        .is_some_and(truthy);

      let mut post_targets = Vec::new();
      let mut foreign_post_targets = Vec::new();
      let references = options
        .and_then(|o| o.get("postTargets"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str);

      for reference in references {
        match local_target_name(reference, project) {
          Some(local) => post_targets.push(local.to_string()),
          None => foreign_post_targets.push(reference.to_string()),
        }
      }

      LegacyTarget {
        name: name.clone(),
        post_targets,
        foreign_post_targets,
        sync_versions,
      }
    })
    .collect();

  let companion_targets: Vec<String> = targets
    .iter()
    .filter(|(_, target)| {
      target.get("executor").and_then(Value::as_str).is_some_and(|executor| {
        is_legacy_executor(executor, plugin) && !is_legacy_version_executor(executor, plugin)
      })
    })
    .map(|(name, _)| name.clone())
    .collect();

  if found.is_empty() && companion_targets.is_empty() {
    return None;
  }

  Some(LegacyDetection {
    project: project.to_string(),
    targets: found,
    companion_targets,
  })
}

/// Resolve a post-target reference against the owning project
///
/// `github` and `a:github` both resolve to `github` inside project `a`;
/// `b:github` belongs to another project. A trailing `:configuration` is ignored.
fn local_target_name<'a>(reference: &'a str, project: &str) -> Option<&'a str> {
  let mut parts = reference.splitn(3, ':');
  let first = parts.next()?;
  match parts.next() {
    None => Some(first),
    Some(target) if first == project || first == "{projectName}" => Some(target),
    Some(_) => None,
  }
}
