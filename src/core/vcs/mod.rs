pub mod system_git;

pub use system_git::SystemGit;

/// How a release push should be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
  pub remote: String,
  pub branch: String,
  /// Skip pre-push hooks
  pub no_verify: bool,
}

impl PushRequest {
  /// Arguments after `git`: atomic push of the branch and its annotated tags
  pub fn args(&self) -> Vec<String> {
    let mut args = vec!["push".to_string(), "--atomic".to_string(), "--follow-tags".to_string()];
    if self.no_verify {
      args.push("--no-verify".to_string());
    }
    args.push(self.remote.clone());
    args.push(self.branch.clone());
    args
  }
}
