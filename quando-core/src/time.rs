//! Parsing of `--start` / `--end` arguments.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{QuandoError, QuandoResult};

/// Parse a time bound given on the command line.
///
/// Accepts RFC 3339 (`2024-03-01T09:00:00+01:00`), a local date-time
/// (`2024-03-01T09:00`, `2024-03-01 09:00:30`) or a local date (`2024-03-01`,
/// read as midnight).
pub fn parse_cli_time(s: &str) -> QuandoResult<DateTime<Utc>> {
    parse_in(s, &Local)
}

fn parse_in<Tz: TimeZone>(s: &str, tz: &Tz) -> QuandoResult<DateTime<Utc>> {
    let s = s.trim();
    let invalid = || QuandoError::InvalidTime(s.to_string());

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(invalid)?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(invalid)
}
