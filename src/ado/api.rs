// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Isolated Azure DevOps REST helpers (PAT discovery, WIQL POST, work item GET) behind a trait seam
// role: ado/api
// inputs: organization + service URL; env AZURE_DEVOPS_PAT / ADO_PAT; AAR_TEST_* fixtures for the env backend
// outputs: Raw JSON response bodies for the pipeline to deserialize
// side_effects: Network calls to the configured service URL
// invariants:
// - Every request carries the fixed api-version parameter
// - Non-2xx responses become errors carrying the service's message field when present
// - Backend selection prefers env fixtures, then a PAT-authenticated HTTP client
// errors: Surfaced with context; the pipeline wraps them as transport failures
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Capability contract the pipeline needs from the tracking service: a WIQL
/// search POST and a work-item details GET, both returning parsed JSON.
pub trait AdoApi: std::fmt::Debug {
  fn wiql_query_json(
    &self,
    project: &str,
    team: &str,
    body: &serde_json::Value,
    params: &[(&str, &str)],
  ) -> Result<serde_json::Value>;

  fn work_items_json(&self, project: &str, params: &[(&str, &str)]) -> Result<serde_json::Value>;
}

/// Discover a personal access token: AZURE_DEVOPS_PAT first, then ADO_PAT.
pub fn discover_pat() -> Option<String> {
  if let Ok(t) = std::env::var("AZURE_DEVOPS_PAT") {
    if !t.trim().is_empty() {
      return Some(t);
    }
  }

  if let Ok(t) = std::env::var("ADO_PAT") {
    if !t.trim().is_empty() {
      return Some(t);
    }
  }

  None
}

#[derive(Debug)]
pub struct AdoHttpApi {
  agent: ureq::Agent,
  base_url: String,
  organization: String,
  auth_header: String,
}

impl AdoHttpApi {
  pub fn new(organization: &str, service_url: &str, pat: &str) -> Self {
    let agent: ureq::Agent = ureq::Agent::config_builder()
      .http_status_as_error(false)
      .build()
      .into();
    // PAT basic auth uses an empty user name
    let auth_header = format!("Basic {}", STANDARD.encode(format!(":{}", pat)));

    Self {
      agent,
      base_url: service_url.trim_end_matches('/').to_string(),
      organization: organization.to_string(),
      auth_header,
    }
  }

  fn get_json(&self, url: &str, params: &[(&str, &str)]) -> Result<serde_json::Value> {
    let mut req = self
      .agent
      .get(url)
      .header("Accept", "application/json")
      .header("User-Agent", "ado-activity-report")
      .header("Authorization", &self.auth_header);

    for (k, v) in params {
      req = req.query(*k, *v);
    }

    let mut resp = req.call().with_context(|| format!("GET {}", url))?;
    let status = resp.status().as_u16();
    let body = resp
      .body_mut()
      .read_json::<serde_json::Value>()
      .with_context(|| format!("reading response from {}", url))?;

    ensure_success(status, &body, url)?;

    Ok(body)
  }

  fn post_json(&self, url: &str, body: &serde_json::Value, params: &[(&str, &str)]) -> Result<serde_json::Value> {
    let mut req = self
      .agent
      .post(url)
      .header("Accept", "application/json")
      .header("User-Agent", "ado-activity-report")
      .header("Authorization", &self.auth_header);

    for (k, v) in params {
      req = req.query(*k, *v);
    }

    let mut resp = req.send_json(body).with_context(|| format!("POST {}", url))?;
    let status = resp.status().as_u16();
    let parsed = resp
      .body_mut()
      .read_json::<serde_json::Value>()
      .with_context(|| format!("reading response from {}", url))?;

    ensure_success(status, &parsed, url)?;

    Ok(parsed)
  }
}

fn ensure_success(status: u16, body: &serde_json::Value, url: &str) -> Result<()> {
  if (200..300).contains(&status) {
    return Ok(());
  }

  let detail = body
    .get("message")
    .and_then(|m| m.as_str())
    .unwrap_or("no message in response body");

  anyhow::bail!("{} returned HTTP {}: {}", url, status, detail)
}

impl AdoApi for AdoHttpApi {
  fn wiql_query_json(
    &self,
    project: &str,
    team: &str,
    body: &serde_json::Value,
    params: &[(&str, &str)],
  ) -> Result<serde_json::Value> {
    let url = format!(
      "{}/{}/{}/{}/_apis/wit/wiql",
      self.base_url, self.organization, project, team
    );
    self.post_json(&url, body, params)
  }

  fn work_items_json(&self, project: &str, params: &[(&str, &str)]) -> Result<serde_json::Value> {
    let url = format!("{}/{}/{}/_apis/wit/workitems", self.base_url, self.organization, project);
    self.get_json(&url, params)
  }
}

/// Env-backed fixture API for tests. The work-items fixture is either a plain
/// response object (single-chunk runs) or a map keyed by the `ids` request
/// parameter (multi-chunk runs get one entry per expected call).
pub struct AdoEnvApi;

impl AdoApi for AdoEnvApi {
  fn wiql_query_json(
    &self,
    _project: &str,
    _team: &str,
    _body: &serde_json::Value,
    _params: &[(&str, &str)],
  ) -> Result<serde_json::Value> {
    let s = std::env::var("AAR_TEST_WIQL_JSON").context("AAR_TEST_WIQL_JSON is not set")?;
    serde_json::from_str(&s).context("AAR_TEST_WIQL_JSON is not valid JSON")
  }

  fn work_items_json(&self, _project: &str, params: &[(&str, &str)]) -> Result<serde_json::Value> {
    let s = std::env::var("AAR_TEST_WORKITEMS_JSON").context("AAR_TEST_WORKITEMS_JSON is not set")?;
    let v: serde_json::Value = serde_json::from_str(&s).context("AAR_TEST_WORKITEMS_JSON is not valid JSON")?;

    if v.get("value").is_some() {
      return Ok(v);
    }

    let ids = params
      .iter()
      .find(|(k, _)| *k == "ids")
      .map(|(_, v)| *v)
      .unwrap_or_default();

    match v.get(ids) {
      Some(resp) => Ok(resp.clone()),
      None => anyhow::bail!("AAR_TEST_WORKITEMS_JSON has no entry for ids {:?}", ids),
    }
  }
}

pub fn env_wants_mock() -> bool {
  std::env::var("AAR_TEST_WIQL_JSON").is_ok() || std::env::var("AAR_TEST_WORKITEMS_JSON").is_ok()
}

/// Select a backend: env fixtures when present, otherwise a PAT-authenticated
/// HTTP client against the configured organization.
pub fn build_api(organization: Option<&str>, service_url: &str) -> Result<Box<dyn AdoApi>> {
  if env_wants_mock() {
    return Ok(Box::new(AdoEnvApi));
  }

  let organization = organization.context("an Azure DevOps organization is required (--organization)")?;
  let pat = discover_pat().context("no personal access token found; set AZURE_DEVOPS_PAT or ADO_PAT")?;

  Ok(Box::new(AdoHttpApi::new(organization, service_url, &pat)))
}
