use thiserror::Error;

/// Fatal failures raised by the work-item pipeline. None of these are retried
/// or substituted with defaults: each one signals malformed upstream data or a
/// broken caller contract that would corrupt report rows if ignored.
#[derive(Debug, Error)]
pub enum MetricsError {
  #[error(
    "malformed pull request link {url:?}: expected vstfs:///Git/PullRequestId/[ProjectId]%2f[RepoId]%2f[PullRequestId]"
  )]
  MalformedLink { url: String },

  #[error("linked pull request references an unknown repo id: {repo_id}")]
  UnknownRepo { repo_id: String },

  #[error("linked pull request references an unknown pull request id: {pr_id}")]
  UnknownPullRequest { pr_id: i64 },

  #[error("the work items API supports at most 200 ids per call; got {requested}")]
  BatchSizeExceeded { requested: usize },

  #[error("missing required argument: {name}")]
  MissingArgument { name: &'static str },

  #[error("unparseable timestamp from the work item service: {value:?}")]
  InvalidTimestamp { value: String },

  #[error(transparent)]
  Transport(#[from] anyhow::Error),
}
