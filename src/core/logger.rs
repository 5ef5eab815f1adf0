//! Injected logging capability
//!
//! Workflows take a `&dyn Logger` instead of reaching for a global. The CLI
//! passes [`TracingLogger`]; tests pass [`RecordingLogger`] and assert on what
//! was said.

#[cfg(test)]
use std::sync::Mutex;

/// Sink for operator-facing messages
pub trait Logger {
  fn info(&self, message: &str);
  fn warn(&self, message: &str);
  fn error(&self, message: &str);
}

/// Forwards to the `tracing` macros
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
  fn info(&self, message: &str) {
    tracing::info!("{}", message);
  }

  fn warn(&self, message: &str) {
    tracing::warn!("{}", message);
  }

  fn error(&self, message: &str) {
    tracing::error!("{}", message);
  }
}

/// Severity of a recorded message
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Info,
  Warn,
  Error,
}

/// Keeps every message in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingLogger {
  entries: Mutex<Vec<(Level, String)>>,
}

#[cfg(test)]
impl RecordingLogger {
  pub fn new() -> Self {
    Self::default()
  }

  /// All messages recorded so far, oldest first
  pub fn entries(&self) -> Vec<(Level, String)> {
    self.entries.lock().map(|e| e.clone()).unwrap_or_default()
  }

  /// True if any message at `level` contains `needle`
  pub fn contains(&self, level: Level, needle: &str) -> bool {
    self
      .entries()
      .iter()
      .any(|(l, msg)| *l == level && msg.contains(needle))
  }

  fn push(&self, level: Level, message: &str) {
    if let Ok(mut entries) = self.entries.lock() {
      entries.push((level, message.to_string()));
    }
  }
}

#[cfg(test)]
impl Logger for RecordingLogger {
  fn info(&self, message: &str) {
    self.push(Level::Info, message);
  }

  fn warn(&self, message: &str) {
    self.push(Level::Warn, message);
  }

  fn error(&self, message: &str) {
    self.push(Level::Error, message);
  }
}

/// Install the fmt subscriber for the CLI (`RUST_LOG` overrides `info`)
pub fn init_tracing() {
  let filter =
    tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
  // A second init (e.g. from a test harness) is harmless
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}
