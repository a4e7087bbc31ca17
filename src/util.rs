// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for timestamp parsing, week bucketing, day arithmetic, and man page rendering
// role: utilities/helpers
// inputs: Date strings as returned by the work item service; clap CommandFactory
// outputs: Parsed DateTimes, two-digit ISO week labels, day counts, man page text
// invariants:
// - parse_ado_timestamp accepts RFC3339, offsetless, and date-only forms; anything else is an error
// - iso_week is always exactly two digits, locale-independent
// - lead_time_days counts whole minutes before converting to fractional days
// errors: Unparseable timestamps surface as MetricsError::InvalidTimestamp with the offending value
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use clap::CommandFactory;

use crate::error::MetricsError;

/// Parse a timestamp string as the work item service emits them. Most carry an
/// explicit offset (RFC3339); some older fields come back offsetless or
/// date-only, both treated as UTC.
pub fn parse_ado_timestamp(value: &str) -> Result<DateTime<FixedOffset>, MetricsError> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
    return Ok(dt);
  }

  if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
    return Ok(Utc.from_utc_datetime(&naive).fixed_offset());
  }

  if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
    let naive = date.and_time(NaiveTime::MIN);
    return Ok(Utc.from_utc_datetime(&naive).fixed_offset());
  }

  Err(MetricsError::InvalidTimestamp { value: value.to_string() })
}

/// Two-digit ISO week number used to bucket report rows.
pub fn iso_week(dt: &DateTime<FixedOffset>) -> String {
  format!("{:02}", dt.iso_week().week())
}

/// Whole-day difference `later - earlier`.
pub fn date_diff_days(later: &DateTime<FixedOffset>, earlier: &DateTime<FixedOffset>) -> i64 {
  (*later - *earlier).num_days()
}

/// Fractional days between story activation and PR submission: whole minutes
/// divided by 60 by 24, matching the report's upstream definition of lead time.
pub fn lead_time_days(activated: &DateTime<FixedOffset>, submitted: &DateTime<FixedOffset>) -> f64 {
  (*submitted - *activated).num_minutes() as f64 / 60.0 / 24.0
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
