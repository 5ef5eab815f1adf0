use crate::core::error::{ConfigError, ResultExt, SemverError, SemverResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for workspace-semver
/// Searched in order: semver.toml, .semver.toml, .config/semver.toml
///
/// Every section is optional; a workspace without a config file runs on
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SemverConfig {
  pub workspace: WorkspaceConfig,
  pub plugin: PluginConfig,
  pub release: ReleaseToolConfig,
  pub version: VersionConfig,
}

/// Where the host build-graph documents live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
  /// Workspace-level document (receives the `release` block)
  pub config_file: PathBuf,

  /// Per-project document file name
  pub project_file: String,

  /// Directory names never descended into while discovering projects
  pub exclude: Vec<String>,
}

impl Default for WorkspaceConfig {
  fn default() -> Self {
    Self {
      config_file: PathBuf::from("nx.json"),
      project_file: "project.json".to_string(),
      exclude: vec![
        "node_modules".to_string(),
        "dist".to_string(),
        ".git".to_string(),
        "tmp".to_string(),
      ],
    }
  }
}

/// Identity of the plugin being migrated away from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
  /// Package name of the legacy versioning executor
  pub legacy: String,
}

impl Default for PluginConfig {
  fn default() -> Self {
    Self {
      legacy: "@jscutlery/semver".to_string(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseToolConfig {
  /// Release-publishing CLI (must understand `release create`)
  pub tool: String,
}

impl Default for ReleaseToolConfig {
  fn default() -> Self {
    Self { tool: "gh".to_string() }
  }
}

/// Defaults for `workspace-semver version`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionConfig {
  /// Program and leading arguments of the version-bump tool
  pub bump_command: Vec<String>,

  /// Remote to push to
  pub remote: Option<String>,

  /// Branch to push
  pub base_branch: Option<String>,

  /// Tag pattern with `{projectName}` and `{version}` placeholders
  pub tag_prefix: String,
}

impl Default for VersionConfig {
  fn default() -> Self {
    Self {
      bump_command: vec!["npx".to_string(), "commit-and-tag-version".to_string()],
      remote: None,
      base_branch: None,
      tag_prefix: "{projectName}-{version}".to_string(),
    }
  }
}

impl SemverConfig {
  /// Find config file in search order: semver.toml, .semver.toml, .config/semver.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("semver.toml"),
      path.join(".semver.toml"),
      path.join(".config").join("semver.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config if one exists, defaults otherwise
  pub fn load_or_default(path: &Path) -> SemverResult<Self> {
    let Some(config_path) = Self::find_config_path(path) else {
      tracing::debug!("no semver.toml under {}, using defaults", path.display());
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config = Self::parse(&content).with_context(|| format!("Invalid config in {}", config_path.display()))?;

    Ok(config)
  }

  /// Parse and validate config text
  pub fn parse(content: &str) -> SemverResult<Self> {
    let config: SemverConfig = toml_edit::de::from_str(content)?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> SemverResult<()> {
    if self.plugin.legacy.trim().is_empty() {
      return Err(SemverError::Config(ConfigError::InvalidValue {
        field: "plugin.legacy".to_string(),
        reason: "must not be empty".to_string(),
      }));
    }

    if self.release.tool.trim().is_empty() {
      return Err(SemverError::Config(ConfigError::InvalidValue {
        field: "release.tool".to_string(),
        reason: "must not be empty".to_string(),
      }));
    }

    if self.version.bump_command.first().is_none_or(|p| p.trim().is_empty()) {
      return Err(SemverError::Config(ConfigError::InvalidValue {
        field: "version.bump_command".to_string(),
        reason: "needs at least a program name".to_string(),
      }));
    }

    validate_tag_pattern("version.tag_prefix", &self.version.tag_prefix)?;

    if self.workspace.project_file.contains('/') || self.workspace.project_file.is_empty() {
      return Err(SemverError::Config(ConfigError::InvalidValue {
        field: "workspace.project_file".to_string(),
        reason: "must be a bare file name".to_string(),
      }));
    }

    Ok(())
  }
}

/// A tag pattern must place the version somewhere in the tag
pub fn validate_tag_pattern(field: &str, pattern: &str) -> SemverResult<()> {
  if !pattern.contains("{version}") {
    return Err(SemverError::Config(ConfigError::InvalidValue {
      field: field.to_string(),
      reason: format!("'{}' has no {{version}} placeholder", pattern),
    }));
  }
  Ok(())
}
