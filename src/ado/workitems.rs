// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Turn user-story work items into per-contributor, per-week report rows (query, batch fetch, row build)
// role: ado/pipeline
// inputs: AdoApi seam; team/project/repo identifiers; read-only submitter index; defaults row template
// outputs: Ordered Vec<ReportRow>, creation/assignment/PR-lead-time rows in encounter order
// invariants:
// - Required arguments are validated before any API interaction
// - A single details call never carries more than 200 ids; chunking preserves id order
// - The defaults template is cloned per row and never mutated
// - Earliest qualifying PR link wins; equal timestamps keep the first seen
// errors: All fatal; malformed links, unknown references, and batch overruns abort the run
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::Context;
use chrono::{DateTime, FixedOffset};

use crate::ado::api::AdoApi;
use crate::ado::link;
use crate::error::MetricsError;
use crate::model::{PullRequestSubmitters, ReportRow, WiqlResponse, WorkItem, WorkItemDetailsResponse};
use crate::util;

/// Hard per-call id limit of the work items details endpoint.
pub const DETAILS_BATCH_LIMIT: usize = 200;

const API_VERSION: &str = "6.0";

const USER_STORY_QUERY: &str =
  "Select [System.Id] From WorkItems Where [System.WorkItemType] = 'User Story' AND [State] <> 'Removed'";

/// Everything one report run needs. Identifier fields are optional so that
/// validation (with precise missing-argument names) happens here rather than
/// at the CLI boundary.
#[derive(Debug, Default)]
pub struct ReportRequest {
  pub team_id: Option<String>,
  pub project: Option<String>,
  pub repo: Option<String>,
  pub submitters: Option<PullRequestSubmitters>,
  pub defaults: ReportRow,
}

fn require<'a>(name: &'static str, value: Option<&'a str>) -> Result<&'a str, MetricsError> {
  match value {
    Some(v) if !v.trim().is_empty() => Ok(v),
    _ => Err(MetricsError::MissingArgument { name }),
  }
}

/// Run the full pipeline: WIQL query, chunked detail fetch, row construction.
/// Rows come back in encounter order, creation/[assignment]/[PR] per item.
pub fn collect_report_rows(api: &dyn AdoApi, req: &ReportRequest) -> Result<Vec<ReportRow>, MetricsError> {
  let team_id = require("teamId", req.team_id.as_deref())?;
  let project = require("project", req.project.as_deref())?;
  let repo = require("repo", req.repo.as_deref())?;
  let submitters = req
    .submitters
    .as_ref()
    .ok_or(MetricsError::MissingArgument { name: "pullRequestSubmitters" })?;

  let ids = query_user_story_ids(api, project, team_id)?;
  let items = fetch_all_details(api, project, &ids)?;

  let mut rows = Vec::new();

  for item in &items {
    rows.extend(rows_for_work_item(item, repo, submitters, &req.defaults)?);
  }

  Ok(rows)
}

/// Fetch the ids of every non-removed user story in the team's backlog.
pub fn query_user_story_ids(api: &dyn AdoApi, project: &str, team_id: &str) -> Result<Vec<i64>, MetricsError> {
  let body = serde_json::json!({ "query": USER_STORY_QUERY });
  let raw = api.wiql_query_json(project, team_id, &body, &[("api-version", API_VERSION)])?;
  let parsed: WiqlResponse = serde_json::from_value(raw).context("parsing the WIQL query response")?;

  Ok(parsed.work_items.into_iter().map(|w| w.id).collect())
}

/// Fetch details (relations expanded) for one chunk of at most 200 ids.
/// Exceeding the limit is a caller contract violation, not a service error.
pub fn fetch_details(api: &dyn AdoApi, project: &str, ids: &[i64]) -> Result<Vec<WorkItem>, MetricsError> {
  if ids.len() > DETAILS_BATCH_LIMIT {
    return Err(MetricsError::BatchSizeExceeded { requested: ids.len() });
  }

  let joined = ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",");
  let params = [
    ("ids", joined.as_str()),
    ("api-version", API_VERSION),
    ("$expand", "Relations"),
  ];
  let raw = api.work_items_json(project, &params)?;
  let parsed: WorkItemDetailsResponse =
    serde_json::from_value(raw).context("parsing the work item details response")?;

  Ok(parsed.value)
}

/// Fetch details for an unbounded id list, 200 at a time, preserving order.
pub fn fetch_all_details(api: &dyn AdoApi, project: &str, ids: &[i64]) -> Result<Vec<WorkItem>, MetricsError> {
  let mut items = Vec::with_capacity(ids.len());

  for chunk in ids.chunks(DETAILS_BATCH_LIMIT) {
    items.extend(fetch_details(api, project, chunk)?);
  }

  Ok(items)
}

/// Build the rows one work item contributes: always a creation row; an
/// assignment row once the story has been activated and assigned (and is past
/// "New"); a PR lead-time row when a qualifying linked pull request exists.
pub fn rows_for_work_item(
  item: &WorkItem,
  repo: &str,
  submitters: &PullRequestSubmitters,
  defaults: &ReportRow,
) -> Result<Vec<ReportRow>, MetricsError> {
  let created = util::parse_ado_timestamp(&item.fields.created_date)?;

  let mut rows = vec![ReportRow {
    contributor: item.fields.created_by.display_name.clone(),
    week: util::iso_week(&created),
    repo: repo.to_string(),
    user_stories_created: 1,
    ..defaults.clone()
  }];

  let (Some(activated_raw), Some(assignee)) = (&item.fields.activated_date, &item.fields.assigned_to) else {
    return Ok(rows);
  };

  if item.fields.state == "New" {
    return Ok(rows);
  }

  let activated = util::parse_ado_timestamp(activated_raw)?;
  let pr_row = initial_pr_row(item, &activated, repo, submitters, defaults)?;

  let completed = matches!(item.fields.state.as_str(), "Closed" | "Resolved");
  let points = item.fields.story_points;

  let completion_days = if completed {
    let resolved_raw = item.fields.resolved_date.as_deref().ok_or_else(|| {
      MetricsError::Transport(anyhow::anyhow!(
        "work item {} is {} but carries no resolved date",
        item.id,
        item.fields.state
      ))
    })?;
    let resolved = util::parse_ado_timestamp(resolved_raw)?;
    Some(util::date_diff_days(&resolved, &activated))
  } else {
    None
  };

  rows.push(ReportRow {
    contributor: assignee.display_name.clone(),
    week: util::iso_week(&activated),
    repo: repo.to_string(),
    user_stories_assigned: 1,
    user_stories_completed: if completed { 1 } else { 0 },
    user_story_points_completed: if completed { points.unwrap_or(0.0) } else { 0.0 },
    user_story_points_assigned: points.unwrap_or(0.0),
    user_story_completion_days: completion_days,
    ..defaults.clone()
  });

  if let Some(row) = pr_row {
    rows.push(row);
  }

  Ok(rows)
}

/// Resolve the earliest pull request linked to the item at or after its
/// activation instant and emit the lead-time row, or `None` when no relation
/// qualifies. Reference errors against the submitter index are fatal.
pub fn initial_pr_row(
  item: &WorkItem,
  activated: &DateTime<FixedOffset>,
  repo: &str,
  submitters: &PullRequestSubmitters,
  defaults: &ReportRow,
) -> Result<Option<ReportRow>, MetricsError> {
  let mut earliest: Option<(&str, DateTime<FixedOffset>)> = None;

  for relation in &item.relations {
    if relation.rel != "ArtifactLink" {
      continue;
    }

    let Some(url) = relation.url.as_deref() else { continue };
    let (Some(name), Some(created_raw)) = (
      relation.attributes.name.as_deref(),
      relation.attributes.resource_created_date.as_deref(),
    ) else {
      continue;
    };

    if name != "Pull Request" {
      continue;
    }

    let created = util::parse_ado_timestamp(created_raw)?;

    if created < *activated {
      continue;
    }

    // Strict-greater replacement keeps the first of equal-earliest links.
    match &earliest {
      None => earliest = Some((url, created)),
      Some((_, best)) if *best > created => earliest = Some((url, created)),
      _ => {}
    }
  }

  let Some((url, submitted)) = earliest else {
    return Ok(None);
  };

  let parsed = link::parse_pull_request_link(url)?;

  let repo_submitters = submitters
    .get(&parsed.repo_id)
    .ok_or_else(|| MetricsError::UnknownRepo { repo_id: parsed.repo_id.clone() })?;
  let submitter = repo_submitters
    .get(&parsed.pr_id)
    .ok_or(MetricsError::UnknownPullRequest { pr_id: parsed.pr_id })?;

  Ok(Some(ReportRow {
    contributor: submitter.clone(),
    week: util::iso_week(&submitted),
    repo: repo.to_string(),
    user_story_initial_pr_submission_days: Some(util::lead_time_days(activated, &submitted)),
    ..defaults.clone()
  }))
}
