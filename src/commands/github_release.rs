//! GitHub release command implementation

use crate::core::context::WorkspaceContext;
use crate::core::error::SemverResult;
use crate::core::logger::TracingLogger;
use crate::release::{GithubRelease, ReleaseOptions};

/// Run the github-release command
pub fn run_github_release(ctx: &WorkspaceContext, options: ReleaseOptions, json: bool) -> SemverResult<()> {
  let publisher = GithubRelease::new(&ctx.config.release.tool).in_dir(&ctx.root);
  let result = publisher.create(&options, &TracingLogger);

  if json {
    println!("{}", serde_json::to_string_pretty(&result)?);
  } else if result.success {
    println!("✅ Release {} created", options.tag);
  } else {
    println!("❌ Release {} was not created", options.tag);
  }

  if !result.success {
    std::process::exit(1);
  }

  Ok(())
}
