mod commands;
mod core;
mod migrate;
mod release;

use clap::{Parser, Subcommand};
use core::error::{SemverError, print_error};
use migrate::MigrationStep;
use release::{ReleaseOptions, VersionOptions};

/// Migrate off the legacy versioning plugin, version projects, publish releases
#[derive(Parser)]
#[command(name = "workspace-semver")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Configuration migrations
  // ============================================================================
  /// Rewrite project and workspace documents for a plugin schema change
  Migrate {
    /// Migration to run: 2.0.0 or native-release
    step: MigrationStep,
    /// Report what would change without writing anything
    #[arg(long)]
    dry_run: bool,
    /// Output the report in JSON format
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // Releases
  // ============================================================================
  /// Create a GitHub release from a tag
  GithubRelease {
    /// Tag to release
    tag: String,
    /// Assets to upload
    files: Vec<String>,
    /// Release notes
    #[arg(long)]
    notes: Option<String>,
    /// Read release notes from a file
    #[arg(long)]
    notes_file: Option<String>,
    /// Branch or SHA to tag from when the tag does not exist
    #[arg(long)]
    target: Option<String>,
    /// Save the release as a draft
    #[arg(long)]
    draft: bool,
    /// Release title
    #[arg(long)]
    title: Option<String>,
    /// Mark the release as a prerelease
    #[arg(long)]
    prerelease: bool,
    /// Start a discussion in the given category
    #[arg(long)]
    discussion_category: Option<String>,
    /// Target repository (owner/repo)
    #[arg(long)]
    repo: Option<String>,
    /// Let GitHub generate the notes
    #[arg(long)]
    generate_notes: bool,
    /// Tag to start generated notes from
    #[arg(long)]
    notes_start_tag: Option<String>,
    /// Output the result in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Bump a project's version, then optionally push and release it
  Version {
    /// Project name (as declared in its project.json)
    project: String,
    /// Force the bump: major, minor, patch or an exact version
    #[arg(long)]
    release_as: Option<String>,
    /// Tag pattern, e.g. "{projectName}-{version}"
    #[arg(long)]
    tag_prefix: Option<String>,
    /// Run the bump tool in dry-run mode and stop
    #[arg(long)]
    dry_run: bool,
    /// Skip git hooks
    #[arg(long)]
    no_verify: bool,
    /// Push the release commit and tags
    #[arg(long)]
    push: bool,
    /// Remote to push to (default: [version].remote)
    #[arg(long)]
    remote: Option<String>,
    /// Branch to push (default: [version].base_branch)
    #[arg(long)]
    base_branch: Option<String>,
    /// Create a GitHub release for the new tag
    #[arg(long)]
    github_release: bool,
    /// Let GitHub generate the release notes
    #[arg(long)]
    generate_notes: bool,
    /// Release notes
    #[arg(long)]
    notes: Option<String>,
    /// Output the result in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  core::logger::init_tracing();

  let workspace_root = match std::env::current_dir() {
    Ok(dir) => dir,
    Err(e) => {
      eprintln!("Error: Failed to get current directory: {}", e);
      std::process::exit(2);
    }
  };

  let ctx = match core::context::WorkspaceContext::build(&workspace_root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Migrate { step, dry_run, json } => commands::run_migrate(&ctx, step, dry_run, json),

    Commands::GithubRelease {
      tag,
      files,
      notes,
      notes_file,
      target,
      draft,
      title,
      prerelease,
      discussion_category,
      repo,
      generate_notes,
      notes_start_tag,
      json,
    } => commands::run_github_release(
      &ctx,
      ReleaseOptions {
        tag,
        files,
        notes,
        notes_file,
        target,
        draft,
        title,
        prerelease,
        discussion_category,
        repo,
        generate_notes,
        notes_start_tag,
      },
      json,
    ),

    Commands::Version {
      project,
      release_as,
      tag_prefix,
      dry_run,
      no_verify,
      push,
      remote,
      base_branch,
      github_release,
      generate_notes,
      notes,
      json,
    } => commands::run_version(
      &ctx,
      VersionOptions {
        project,
        release_as,
        tag_prefix,
        dry_run,
        no_verify,
        push,
        remote,
        base_branch,
        github_release,
        generate_notes,
        notes,
      },
      json,
    ),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: SemverError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
