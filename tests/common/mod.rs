use assert_cmd::Command;
use std::io::Write as _;

#[allow(dead_code)]
pub fn bin() -> Command {
  Command::cargo_bin("ado-activity-report").unwrap()
}

/// WIQL fixture body: the query response envelope with one ref per id.
#[allow(dead_code)]
pub fn wiql_fixture(ids: &[i64]) -> String {
  let refs: Vec<serde_json::Value> = ids.iter().map(|id| serde_json::json!({ "id": id })).collect();
  serde_json::json!({ "workItems": refs }).to_string()
}

/// Details fixture body: the work-items response envelope.
#[allow(dead_code)]
pub fn details_fixture(items: &[serde_json::Value]) -> String {
  serde_json::json!({ "value": items }).to_string()
}

/// A story still in "New": only the always-present fields.
#[allow(dead_code)]
pub fn new_story(id: i64, created: &str, creator: &str) -> serde_json::Value {
  serde_json::json!({
    "id": id,
    "fields": {
      "System.State": "New",
      "System.CreatedDate": created,
      "System.CreatedBy": { "displayName": creator }
    }
  })
}

/// Write a submitter index to a temp file and hand back the handle; the file
/// lives as long as the handle does.
#[allow(dead_code)]
pub fn write_submitters(content: &str) -> tempfile::NamedTempFile {
  let mut file = tempfile::NamedTempFile::new().unwrap();
  write!(file, "{}", content).unwrap();
  file
}
