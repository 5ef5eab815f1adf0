//! Workspace file tree and project registry
//!
//! Migrations never touch the filesystem directly. They read and write through
//! a [`Tree`], which keeps every path relative to the workspace root. The CLI
//! uses [`FsTree`]; unit tests use an in-memory tree.

use crate::core::config::WorkspaceConfig;
use crate::core::error::{ResultExt, SemverError, SemverResult, ValidationError};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Read/write access to files under the workspace root
pub trait Tree {
  /// Read a file, `None` if it does not exist
  fn read(&self, path: &Path) -> SemverResult<Option<String>>;

  /// Create or replace a file
  fn write(&mut self, path: &Path, content: &str) -> SemverResult<()>;

  /// Every file named `file_name`, skipping directories named in `exclude`, sorted
  fn find_files(&self, file_name: &str, exclude: &[String]) -> SemverResult<Vec<PathBuf>>;
}

/// A project known to the host build graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
  /// Project name (`name` field, or the directory name)
  pub name: String,

  /// Path of the project document, relative to the workspace root
  pub config_path: PathBuf,

  /// Project root directory, relative to the workspace root
  pub root: PathBuf,
}

/// Parse a JSON document from the tree
pub fn read_json(tree: &dyn Tree, path: &Path) -> SemverResult<Option<Value>> {
  let Some(content) = tree.read(path)? else {
    return Ok(None);
  };

  let value = serde_json::from_str(&content).map_err(|e| {
    SemverError::Validation(ValidationError::MalformedDocument {
      path: path.to_path_buf(),
      reason: e.to_string(),
    })
  })?;

  Ok(Some(value))
}

/// Write a JSON document with two-space indentation and a trailing newline
pub fn write_json(tree: &mut dyn Tree, path: &Path, value: &Value) -> SemverResult<()> {
  let mut content = serde_json::to_string_pretty(value)?;
  content.push('\n');
  tree.write(path, &content)
}

/// Enumerate all project documents in the workspace
pub fn discover_projects(tree: &dyn Tree, config: &WorkspaceConfig) -> SemverResult<Vec<ProjectEntry>> {
  let mut projects = Vec::new();

  for config_path in tree.find_files(&config.project_file, &config.exclude)? {
    let root = config_path.parent().map(Path::to_path_buf).unwrap_or_default();
    let declared = read_json(tree, &config_path)?
      .and_then(|doc| doc.get("name").and_then(Value::as_str).map(str::to_string));

    let name = declared
      .or_else(|| root.file_name().map(|n| n.to_string_lossy().into_owned()))
      .unwrap_or_else(|| "root".to_string());

    projects.push(ProjectEntry { name, config_path, root });
  }

  Ok(projects)
}

/// Tree backed by the real filesystem
pub struct FsTree {
  root: PathBuf,
}

impl FsTree {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  fn walk(&self, dir: &Path, file_name: &str, exclude: &[String], found: &mut Vec<PathBuf>) -> SemverResult<()> {
    let abs = self.root.join(dir);
    let entries = fs::read_dir(&abs).with_context(|| format!("Failed to read directory {}", abs.display()))?;

    for entry in entries {
      let entry = entry?;
      let name = entry.file_name().to_string_lossy().into_owned();
      let file_type = entry.file_type()?;
      let rel = dir.join(&name);

      if file_type.is_dir() {
        if !exclude.iter().any(|e| e == &name) {
          self.walk(&rel, file_name, exclude, found)?;
        }
      } else if file_type.is_file() && name == file_name {
        found.push(rel);
      }
    }

    Ok(())
  }
}

impl Tree for FsTree {
  fn read(&self, path: &Path) -> SemverResult<Option<String>> {
    let abs = self.root.join(path);
    if !abs.exists() {
      return Ok(None);
    }
    let content = fs::read_to_string(&abs).with_context(|| format!("Failed to read {}", abs.display()))?;
    Ok(Some(content))
  }

  fn write(&mut self, path: &Path, content: &str) -> SemverResult<()> {
    let abs = self.root.join(path);
    if let Some(parent) = abs.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(&abs, content).with_context(|| format!("Failed to write {}", abs.display()))?;
    Ok(())
  }

  fn find_files(&self, file_name: &str, exclude: &[String]) -> SemverResult<Vec<PathBuf>> {
    let mut found = Vec::new();
    self.walk(Path::new(""), file_name, exclude, &mut found)?;
    found.sort();
    Ok(found)
  }
}
