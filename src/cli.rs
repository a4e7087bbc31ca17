use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::model::{PullRequestSubmitters, ReportRow};
use crate::ado::workitems::ReportRequest;

#[derive(Parser, Debug)]
#[command(
    name = "ado-activity-report",
    version,
    about = "Export Azure DevOps user-story activity to JSON report rows",
    long_about = None
)]
pub struct Cli {
  /// Azure DevOps organization name
  #[arg(long)]
  pub organization: Option<String>,

  /// Base service URL
  #[arg(long, default_value = "https://dev.azure.com")]
  pub service_url: String,

  /// Project name or id
  #[arg(long)]
  pub project: Option<String>,

  /// Team name or id used for the backlog query
  #[arg(long)]
  pub team: Option<String>,

  /// Repository label stamped on every report row
  #[arg(long)]
  pub repo: Option<String>,

  /// Path to a JSON file mapping repo id -> { pull request id -> submitter name }
  #[arg(long)]
  pub submitters: Option<PathBuf>,

  /// Output location: file path, or "-" for stdout
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Emit compact JSON instead of pretty-printed
  #[arg(long)]
  pub compact: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

#[derive(Debug)]
pub struct EffectiveConfig {
  pub organization: Option<String>,
  pub service_url: String,
  pub out: String,
  pub compact: bool,
  pub request: ReportRequest,
}

/// Load the submitter index from disk. Repo-id keys are folded to lowercase
/// once here so lookups against case-normalized link segments never miss.
pub fn load_submitters(path: &Path) -> Result<PullRequestSubmitters> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading submitters file {}", path.display()))?;
  let parsed: PullRequestSubmitters = serde_json::from_str(&raw)
    .with_context(|| format!("parsing submitters file {}", path.display()))?;

  Ok(parsed.into_iter().map(|(repo, prs)| (repo.to_lowercase(), prs)).collect())
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let submitters = match &cli.submitters {
    Some(path) => Some(load_submitters(path)?),
    None => None,
  };

  let request = ReportRequest {
    team_id: cli.team,
    project: cli.project,
    repo: cli.repo,
    submitters,
    defaults: ReportRow::default(),
  };

  Ok(EffectiveConfig {
    organization: cli.organization,
    service_url: cli.service_url.trim_end_matches('/').to_string(),
    out: cli.out,
    compact: cli.compact,
    request,
  })
}
