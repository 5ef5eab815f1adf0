//! Version command implementation

use crate::core::context::WorkspaceContext;
use crate::core::error::SemverResult;
use crate::core::logger::TracingLogger;
use crate::release::VersionOptions;

/// Run the version command
pub fn run_version(ctx: &WorkspaceContext, options: VersionOptions, json: bool) -> SemverResult<()> {
  let result = crate::release::run_version(ctx, &options, &TracingLogger);

  if json {
    println!("{}", serde_json::to_string_pretty(&result)?);
  } else if result.success {
    if options.dry_run {
      println!("🔍 Dry-run: {} bump checked, nothing pushed or released", options.project);
    } else {
      println!("✅ {} versioned", options.project);
    }
  } else {
    println!("❌ Versioning {} failed", options.project);
  }

  if !result.success {
    std::process::exit(1);
  }

  Ok(())
}
