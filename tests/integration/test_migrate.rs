//! Integration tests for `workspace-semver migrate`

use crate::helpers::{TestWorkspace, run_cli, run_cli_unchecked};
use anyhow::Result;
use serde_json::{Value, json};

fn legacy_workspace() -> Result<TestWorkspace> {
  let ws = TestWorkspace::new()?;
  ws.add_project(
    "lib-a",
    json!({
      "build": { "executor": "@nx/js:tsc" },
      "version": {
        "executor": "@jscutlery/semver:version",
        "options": { "postTargets": ["github"], "rootChangelog": true }
      },
      "github": {
        "executor": "@jscutlery/semver:github",
        "options": { "tag": "${tag}", "notes": "${notes}" }
      }
    }),
  )?;
  ws.add_project(
    "lib-b",
    json!({
      "test": { "executor": "@nx/jest:jest" }
    }),
  )?;
  ws.commit("Add projects")?;
  Ok(ws)
}

#[test]
fn test_native_release_rewrites_workspace() -> Result<()> {
  let ws = legacy_workspace()?;
  let untouched = ws.read_file("libs/lib-b/project.json")?;

  run_cli(&ws.path, &["migrate", "native-release"])?;

  // Legacy targets and their post target are gone, everything else survives
  let project = ws.read_json("libs/lib-a/project.json")?;
  let targets = project["targets"].as_object().expect("targets");
  assert_eq!(targets.keys().collect::<Vec<_>>(), vec!["build"]);
  assert_eq!(project["sourceRoot"], "libs/lib-a/src");
  assert!(!ws.read_file("libs/lib-a/project.json")?.contains("@jscutlery/semver"));

  // Unrelated project not rewritten
  assert_eq!(ws.read_file("libs/lib-b/project.json")?, untouched);

  let nx = ws.read_json("nx.json")?;
  assert_eq!(nx["npmScope"], "acme");
  assert_eq!(nx["targetDefaults"]["build"]["cache"], true);
  assert_eq!(
    nx["release"],
    json!({
      "releaseTagPattern": "{projectName}-{version}",
      "changelog": {
        "git": { "commit": true, "tag": true },
        "workspaceChangelog": { "createRelease": "github", "file": false },
        "projectChangelogs": true
      }
    })
  );

  Ok(())
}

#[test]
fn test_native_release_second_run_is_noop() -> Result<()> {
  let ws = legacy_workspace()?;
  run_cli(&ws.path, &["migrate", "native-release"])?;
  let nx_before = ws.read_file("nx.json")?;

  let output = run_cli(&ws.path, &["migrate", "native-release"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stderr.contains("No @jscutlery/semver config detected, skipping migration."));
  assert!(stdout.contains("Nothing to migrate"));
  assert_eq!(ws.read_file("nx.json")?, nx_before);

  Ok(())
}

#[test]
fn test_sync_mode_leaves_workspace_untouched() -> Result<()> {
  let ws = legacy_workspace()?;
  ws.add_project(
    "lib-c",
    json!({
      "version": {
        "executor": "@jscutlery/semver:version",
        "options": { "syncVersions": true }
      }
    }),
  )?;
  let project_a = ws.read_file("libs/lib-a/project.json")?;
  let nx = ws.read_file("nx.json")?;

  let output = run_cli(&ws.path, &["migrate", "native-release"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert!(stderr.contains("Sync mode detected, skipping migration, please migrate manually."));
  assert_eq!(ws.read_file("libs/lib-a/project.json")?, project_a);
  assert_eq!(ws.read_file("nx.json")?, nx);

  Ok(())
}

#[test]
fn test_dry_run_reports_without_writing() -> Result<()> {
  let ws = legacy_workspace()?;
  let project_a = ws.read_file("libs/lib-a/project.json")?;
  let nx = ws.read_file("nx.json")?;

  let output = run_cli(&ws.path, &["migrate", "native-release", "--dry-run"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);

  assert!(stdout.contains("Dry-run"));
  assert!(stdout.contains("libs/lib-a/project.json"));
  assert!(stdout.contains("nx.json"));
  assert_eq!(ws.read_file("libs/lib-a/project.json")?, project_a);
  assert_eq!(ws.read_file("nx.json")?, nx);

  Ok(())
}

#[test]
fn test_json_report() -> Result<()> {
  let ws = legacy_workspace()?;

  let output = run_cli(&ws.path, &["migrate", "native-release", "--json", "--dry-run"])?;
  let report: Value = serde_json::from_slice(&output.stdout)?;

  assert_eq!(report["step"], "native-release");
  assert_eq!(report["outcome"], "migrated");
  assert_eq!(report["dry_run"], true);
  assert_eq!(report["projects"], json!(["lib-a"]));

  Ok(())
}

#[test]
fn test_root_changelog_migration() -> Result<()> {
  let ws = legacy_workspace()?;

  run_cli(&ws.path, &["migrate", "2.0.0"])?;

  let options = &ws.read_json("libs/lib-a/project.json")?["targets"]["version"]["options"];
  assert_eq!(options["skipRootChangelog"], false);
  assert!(options.get("rootChangelog").is_none());
  assert_eq!(options["postTargets"], json!(["github"]));

  // Companion targets are not version targets
  let github = &ws.read_json("libs/lib-a/project.json")?["targets"]["github"]["options"];
  assert!(github.get("skipRootChangelog").is_none());

  // Second run has nothing left to rename
  let before = ws.read_file("libs/lib-a/project.json")?;
  let output = run_cli(&ws.path, &["migrate", "2.0.0"])?;
  assert!(String::from_utf8_lossy(&output.stdout).contains("Nothing to migrate"));
  assert_eq!(ws.read_file("libs/lib-a/project.json")?, before);

  Ok(())
}

#[test]
fn test_unknown_step_is_rejected() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_cli_unchecked(&ws.path, &["migrate", "3.0.0"])?;

  assert!(!output.status.success());
  assert!(String::from_utf8_lossy(&output.stderr).contains("unknown migration"));

  Ok(())
}

#[test]
fn test_malformed_project_is_a_validation_error() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_file("libs/broken/project.json", "{ \"targets\": ")?;

  let output = run_cli_unchecked(&ws.path, &["migrate", "native-release"])?;

  assert_eq!(output.status.code(), Some(3));
  assert_eq!(ws.read_file("libs/broken/project.json")?, "{ \"targets\": ");

  Ok(())
}
