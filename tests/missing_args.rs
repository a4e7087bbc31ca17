mod common;

/// Required-argument validation happens before any service interaction: the
/// fixture env vars hold deliberately unusable JSON, so touching the API
/// would fail with a different message than the one asserted here.
fn run_without(missing: &str) -> std::process::Output {
  let submitters = common::write_submitters("{}");

  let mut args: Vec<&str> = Vec::new();
  if missing != "team" {
    args.extend_from_slice(&["--team", "team-1"]);
  }
  if missing != "project" {
    args.extend_from_slice(&["--project", "proj"]);
  }
  if missing != "repo" {
    args.extend_from_slice(&["--repo", "core"]);
  }
  if missing != "submitters" {
    args.extend_from_slice(&["--submitters", submitters.path().to_str().unwrap()]);
  }

  common::bin()
    .args(&args)
    .env("AAR_TEST_WIQL_JSON", "not json")
    .env("AAR_TEST_WORKITEMS_JSON", "not json")
    .output()
    .unwrap()
}

#[test]
fn each_missing_argument_is_named_in_the_error() {
  for (flag, reported) in [
    ("team", "teamId"),
    ("project", "project"),
    ("repo", "repo"),
    ("submitters", "pullRequestSubmitters"),
  ] {
    let out = run_without(flag);
    assert!(!out.status.success(), "--{} missing should fail", flag);

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
      stderr.contains(&format!("missing required argument: {}", reported)),
      "--{} missing, stderr: {}",
      flag,
      stderr
    );
  }
}

#[test]
fn whitespace_arguments_count_as_missing() {
  use predicates::prelude::*;

  let submitters = common::write_submitters("{}");

  common::bin()
    .args([
      "--team",
      "   ",
      "--project",
      "proj",
      "--repo",
      "core",
      "--submitters",
      submitters.path().to_str().unwrap(),
    ])
    .env("AAR_TEST_WIQL_JSON", "not json")
    .assert()
    .failure()
    .stderr(predicate::str::contains("missing required argument: teamId"));
}
