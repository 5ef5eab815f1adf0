//! Migrate command implementation

use crate::core::context::WorkspaceContext;
use crate::core::error::SemverResult;
use crate::core::logger::TracingLogger;
use crate::migrate::{MigrationOutcome, MigrationReport, MigrationStep, run_migration};

/// Run the migrate command
pub fn run_migrate(ctx: &WorkspaceContext, step: MigrationStep, dry_run: bool, json: bool) -> SemverResult<()> {
  let mut tree = ctx.tree();
  let report = run_migration(&mut tree, &ctx.config, step, dry_run, &TracingLogger)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_report(&report);
  }

  Ok(())
}

fn print_report(report: &MigrationReport) {
  match report.outcome {
    MigrationOutcome::NothingToDo => {
      println!("✅ Nothing to migrate for {}", report.step);
      return;
    }
    MigrationOutcome::SyncModeSkipped => {
      println!("⚠️  Sync mode detected, {} left untouched", report.step);
      println!("   Migrate the synced projects manually.");
      return;
    }
    MigrationOutcome::Migrated => {}
  }

  if report.dry_run {
    println!("🔍 Dry-run: migration {} would write:", report.step);
  } else {
    println!("✅ Migration {} applied:", report.step);
  }
  for file in &report.files {
    println!("   {}", file.display());
  }
  if !report.projects.is_empty() {
    println!();
    println!("   Projects: {}", report.projects.join(", "));
  }
}
