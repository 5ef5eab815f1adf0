//! Test helpers for integration tests

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A test workspace with an nx.json and git history
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  /// Create a new test workspace with basic structure
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    // Initialize git repo with main as default branch
    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    std::fs::write(
      path.join("nx.json"),
      r#"{
  "npmScope": "acme",
  "targetDefaults": {
    "build": { "cache": true }
  }
}
"#,
    )?;

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial workspace setup"])?;

    Ok(Self { _root: root, path })
  }

  /// Add a project with the given targets under `libs/<name>`
  pub fn add_project(&self, name: &str, targets: Value) -> Result<PathBuf> {
    let project_path = self.path.join("libs").join(name);
    std::fs::create_dir_all(&project_path)?;

    let doc = serde_json::json!({
      "name": name,
      "sourceRoot": format!("libs/{}/src", name),
      "targets": targets,
    });
    self.write_json(&format!("libs/{}/project.json", name), &doc)?;
    self.write_file(
      &format!("libs/{}/package.json", name),
      &format!("{{\n  \"name\": \"@acme/{}\",\n  \"version\": \"0.1.0\"\n}}\n", name),
    )?;

    Ok(project_path)
  }

  /// Commit current changes
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "-m", message])?;

    // Get the commit SHA
    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Write a file relative to the workspace root
  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let full = self.path.join(path);
    if let Some(parent) = full.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(full, content)?;
    Ok(())
  }

  /// Write a JSON document relative to the workspace root
  pub fn write_json(&self, path: &str, value: &Value) -> Result<()> {
    self.write_file(path, &format!("{}\n", serde_json::to_string_pretty(value)?))
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Read and parse a JSON document
  pub fn read_json(&self, path: &str) -> Result<Value> {
    let content = self.read_file(path)?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path))
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the CLI and return its output whatever the exit status
pub fn run_cli_unchecked(cwd: &Path, args: &[&str]) -> Result<Output> {
  run_cli_with_env(cwd, args, &[])
}

/// Run the CLI with extra environment variables, whatever the exit status
pub fn run_cli_with_env(cwd: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_workspace-semver");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .env("RUST_LOG", "info")
    .envs(envs.iter().copied())
    .output()
    .context("Failed to run workspace-semver")
}

/// Run the CLI, failing unless it exits successfully
pub fn run_cli(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_cli_unchecked(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "workspace-semver command failed: workspace-semver {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}
