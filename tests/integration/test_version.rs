//! Integration tests for `workspace-semver version`

use crate::helpers::{TestWorkspace, git, run_cli, run_cli_unchecked, run_cli_with_env};
use anyhow::Result;
use serde_json::json;
use tempfile::TempDir;

fn project_workspace(config: &str) -> Result<TestWorkspace> {
  let ws = TestWorkspace::new()?;
  ws.add_project("lib-a", json!({ "build": { "executor": "@nx/js:tsc" } }))?;
  ws.write_file("semver.toml", config)?;
  ws.commit("Add lib-a")?;
  Ok(ws)
}

#[test]
#[cfg(unix)]
fn test_bump_receives_tag_prefix_and_flags() -> Result<()> {
  let ws = project_workspace(
    r#"[version]
bump_command = ["sh", "-c", "echo \"$@\" > args.txt", "bump"]
"#,
  )?;

  let output = run_cli(&ws.path, &["version", "lib-a", "--release-as", "minor", "--dry-run", "--no-verify"])?;

  assert_eq!(
    ws.read_file("libs/lib-a/args.txt")?.trim(),
    "--tag-prefix lib-a- --release-as minor --dry-run --no-verify"
  );
  assert!(String::from_utf8_lossy(&output.stdout).contains("Dry-run"));

  Ok(())
}

#[test]
fn test_push_without_remote_fails_before_bump() -> Result<()> {
  let ws = project_workspace(
    r#"[version]
bump_command = ["touch", "bumped"]
base_branch = "main"
"#,
  )?;

  let output = run_cli_unchecked(&ws.path, &["version", "lib-a", "--push"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("version.remote"));
  assert!(!ws.path.join("libs/lib-a/bumped").exists());

  Ok(())
}

#[test]
fn test_push_to_unknown_remote_fails_before_bump() -> Result<()> {
  let ws = project_workspace(
    r#"[version]
bump_command = ["touch", "bumped"]
remote = "upstream"
base_branch = "main"
"#,
  )?;

  let output = run_cli_unchecked(&ws.path, &["version", "lib-a", "--push"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("Remote 'upstream' is not configured"));
  assert!(!ws.path.join("libs/lib-a/bumped").exists());

  Ok(())
}

#[test]
#[cfg(unix)]
fn test_push_then_release() -> Result<()> {
  let ws = project_workspace(
    r#"[version]
bump_command = ["true"]

[release]
tool = "true"
"#,
  )?;
  let remote = TempDir::new()?;
  git(remote.path(), &["init", "--bare", "--initial-branch=main"])?;
  let remote_path = remote.path().to_string_lossy().into_owned();
  git(&ws.path, &["remote", "add", "origin", &remote_path])?;

  let output = run_cli(
    &ws.path,
    &[
      "version",
      "lib-a",
      "--push",
      "--remote",
      "origin",
      "--base-branch",
      "main",
      "--github-release",
    ],
  )?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert!(stderr.contains("lib-a is now 0.1.0 (tag lib-a-0.1.0)"));
  assert!(stderr.contains("Pushed lib-a-0.1.0 to origin/main"));
  assert!(stderr.contains("Created release lib-a-0.1.0"));

  let local_head = git(&ws.path, &["rev-parse", "HEAD"])?;
  let remote_head = git(remote.path(), &["rev-parse", "main"])?;
  assert_eq!(local_head.stdout, remote_head.stdout);

  Ok(())
}

#[test]
#[cfg(unix)]
fn test_push_keeps_caller_environment() -> Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let ws = project_workspace(
    r#"[version]
bump_command = ["true"]
remote = "origin"
base_branch = "main"
"#,
  )?;
  let remote = TempDir::new()?;
  git(remote.path(), &["init", "--bare", "--initial-branch=main"])?;
  let remote_path = remote.path().to_string_lossy().into_owned();
  git(&ws.path, &["remote", "add", "origin", &remote_path])?;

  // Credential helpers read tokens like this one from the environment
  let hook = ws.path.join(".git/hooks/pre-push");
  std::fs::create_dir_all(ws.path.join(".git/hooks"))?;
  std::fs::write(
    &hook,
    "#!/bin/sh\ntest \"$GH_TOKEN\" = \"token-123\" || { echo \"GH_TOKEN=[$GH_TOKEN]\" >&2; exit 1; }\n",
  )?;
  std::fs::set_permissions(&hook, std::fs::Permissions::from_mode(0o755))?;

  let output = run_cli_with_env(&ws.path, &["version", "lib-a", "--push"], &[("GH_TOKEN", "token-123")])?;

  assert!(
    output.status.success(),
    "push failed: {}",
    String::from_utf8_lossy(&output.stderr)
  );
  let remote_head = git(remote.path(), &["rev-parse", "main"])?;
  let local_head = git(&ws.path, &["rev-parse", "HEAD"])?;
  assert_eq!(local_head.stdout, remote_head.stdout);

  Ok(())
}

#[test]
fn test_unknown_project() -> Result<()> {
  let ws = project_workspace("[version]\nbump_command = [\"true\"]\n")?;

  let output = run_cli_unchecked(&ws.path, &["version", "lib-z", "--json"])?;

  assert_eq!(output.status.code(), Some(1));
  let result: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(result["success"], false);

  Ok(())
}
