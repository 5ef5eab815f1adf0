//! Error types for workspace-semver with contextual messages and exit codes
//!
//! Every error maps to an exit code and may carry a help line that tells the
//! user what to do next.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for workspace-semver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, failed release result)
  User = 1,
  /// System error (git, I/O)
  System = 2,
  /// Validation failure (malformed documents)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for workspace-semver
#[derive(Debug)]
pub enum SemverError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Validation errors (documents, config values)
  Validation(ValidationError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl SemverError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    SemverError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    SemverError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      SemverError::Message { message, context, help } => SemverError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      SemverError::Io(err) => SemverError::Message {
        message: format!("I/O error: {}", err),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      SemverError::Config(_) => ExitCode::User,
      SemverError::Git(_) => ExitCode::System,
      SemverError::Validation(_) => ExitCode::Validation,
      SemverError::Io(_) => ExitCode::System,
      SemverError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      SemverError::Config(e) => e.help_message(),
      SemverError::Git(e) => e.help_message(),
      SemverError::Validation(e) => e.help_message(),
      SemverError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for SemverError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SemverError::Config(e) => write!(f, "{}", e),
      SemverError::Git(e) => write!(f, "{}", e),
      SemverError::Validation(e) => write!(f, "{}", e),
      SemverError::Io(e) => write!(f, "I/O error: {}", e),
      SemverError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for SemverError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      SemverError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for SemverError {
  fn from(err: io::Error) -> Self {
    SemverError::Io(err)
  }
}

impl From<String> for SemverError {
  fn from(msg: String) -> Self {
    SemverError::message(msg)
  }
}

impl From<&str> for SemverError {
  fn from(msg: &str) -> Self {
    SemverError::message(msg)
  }
}

impl From<serde_json::Error> for SemverError {
  fn from(err: serde_json::Error) -> Self {
    SemverError::message(format!("JSON error: {}", err))
  }
}

impl From<toml_edit::de::Error> for SemverError {
  fn from(err: toml_edit::de::Error) -> Self {
    SemverError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<semver::Error> for SemverError {
  fn from(err: semver::Error) -> Self {
    SemverError::message(format!("Invalid version: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Value present but unusable
  InvalidValue { field: String, reason: String },

  /// Missing required field
  MissingField { field: String },

  /// Project not found in the workspace
  ProjectNotFound { name: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::InvalidValue { field, .. } => Some(format!("Fix `{}` in semver.toml.", field)),
      ConfigError::MissingField { field } => Some(format!(
        "Pass it on the command line or set `{}` in semver.toml.",
        field
      )),
      ConfigError::ProjectNotFound { name } => Some(format!(
        "Projects are discovered from project.json files. Does one declare \"name\": \"{}\"?",
        name
      )),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::InvalidValue { field, reason } => {
        write!(f, "Invalid config value for {}: {}", field, reason)
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::ProjectNotFound { name } => {
        write!(f, "Project '{}' not found in workspace", name)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Push failed
  PushFailed {
    remote: String,
    branch: String,
    reason: String,
  },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        if reason.contains("non-fast-forward") || reason.contains("rejected") {
          Some("The remote has commits you don't have. Pull and rebase before releasing.".to_string())
        } else if reason.contains("permission denied") || reason.contains("403") {
          Some("Check your SSH key or token permissions for the remote.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Initialize the repository first or check the path: {}",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::PushFailed { remote, branch, reason } => {
        write!(f, "Push to {}/{} failed: {}", remote, branch, reason)
      }
    }
  }
}

/// Validation errors
#[derive(Debug)]
pub enum ValidationError {
  /// A configuration document has an unexpected shape
  MalformedDocument { path: PathBuf, reason: String },
}

impl ValidationError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValidationError::MalformedDocument { .. } => {
        Some("Fix the document by hand, then re-run the migration.".to_string())
      }
    }
  }
}

impl fmt::Display for ValidationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValidationError::MalformedDocument { path, reason } => {
        write!(f, "Malformed document {}: {}", path.display(), reason)
      }
    }
  }
}

/// Result type alias for workspace-semver
pub type SemverResult<T> = Result<T, SemverError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> SemverResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> SemverResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<SemverError>,
{
  fn context(self, ctx: impl Into<String>) -> SemverResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> SemverResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &SemverError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
