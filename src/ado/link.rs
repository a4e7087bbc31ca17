use crate::error::MetricsError;

/// Decomposed pull-request artifact locator
/// (`vstfs:///Git/PullRequestId/[ProjectId]%2f[RepoId]%2f[PullRequestId]`).
/// Segments are lowercased during parsing, so `repo_id` is always in the
/// case-normalized form the submitter index is keyed by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestLink {
  pub project_ref: String,
  pub repo_id: String,
  pub pr_id: i64,
}

pub fn parse_pull_request_link(url: &str) -> Result<PullRequestLink, MetricsError> {
  let lowered = url.to_lowercase();
  let segments: Vec<&str> = lowered.split("%2f").collect();

  if segments.len() != 3 {
    return Err(MetricsError::MalformedLink { url: url.to_string() });
  }

  let pr_id = segments[2]
    .parse::<i64>()
    .map_err(|_| MetricsError::MalformedLink { url: url.to_string() })?;

  Ok(PullRequestLink {
    project_ref: segments[0].to_string(),
    repo_id: segments[1].to_string(),
    pr_id,
  })
}
