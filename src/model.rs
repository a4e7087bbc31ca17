// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the JSON model (work items, relations, API envelopes, report rows) shared by the pipeline
// role: model/types
// outputs: Serializable structs with stable field names; Azure DevOps field names mapped via serde renames
// invariants: Payloads are validated once at deserialization; absent optional fields stay None; rows never alias
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Repo id (lowercase) -> pull request id -> submitter display name.
/// Supplied by the caller and read-only to the pipeline.
pub type PullRequestSubmitters = BTreeMap<String, BTreeMap<i64, String>>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IdentityRef {
  #[serde(rename = "displayName")]
  pub display_name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct RelationAttributes {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(rename = "resourceCreatedDate", skip_serializing_if = "Option::is_none")]
  pub resource_created_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Relation {
  pub rel: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  #[serde(default)]
  pub attributes: RelationAttributes,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorkItemFields {
  #[serde(rename = "System.State")]
  pub state: String,
  #[serde(rename = "System.CreatedDate")]
  pub created_date: String,
  #[serde(rename = "System.CreatedBy")]
  pub created_by: IdentityRef,
  #[serde(rename = "System.AssignedTo", skip_serializing_if = "Option::is_none")]
  pub assigned_to: Option<IdentityRef>,
  #[serde(rename = "Microsoft.VSTS.Common.ActivatedDate", skip_serializing_if = "Option::is_none")]
  pub activated_date: Option<String>,
  #[serde(rename = "Microsoft.VSTS.Common.ResolvedDate", skip_serializing_if = "Option::is_none")]
  pub resolved_date: Option<String>,
  #[serde(rename = "Microsoft.VSTS.Scheduling.StoryPoints", skip_serializing_if = "Option::is_none")]
  pub story_points: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorkItem {
  pub id: i64,
  pub fields: WorkItemFields,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub relations: Vec<Relation>,
}

/// Envelope returned by the WIQL query endpoint; only the matched ids matter.
#[derive(Debug, Deserialize)]
pub struct WiqlResponse {
  #[serde(rename = "workItems")]
  pub work_items: Vec<WiqlWorkItemRef>,
}

#[derive(Debug, Deserialize)]
pub struct WiqlWorkItemRef {
  pub id: i64,
}

/// Envelope returned by the work-items detail endpoint.
#[derive(Debug, Deserialize)]
pub struct WorkItemDetailsResponse {
  pub value: Vec<WorkItem>,
}

/// One flat report row. Metric fields a given row does not set stay at the
/// defaults template's value; the two day-count metrics use `None` for
/// "not applicable" (distinct from zero days).
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ReportRow {
  pub contributor: String,
  pub week: String,
  pub repo: String,
  pub user_stories_created: i64,
  pub user_stories_assigned: i64,
  pub user_stories_completed: i64,
  pub user_story_points_completed: f64,
  pub user_story_points_assigned: f64,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub user_story_completion_days: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub user_story_initial_pr_submission_days: Option<f64>,
}
