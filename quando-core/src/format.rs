//! One-line rendering of events.

use std::fmt::Display;

use chrono::TimeZone;

use crate::event::Event;

const DATE: &str = "%y-%m-%d";
const TIME: &str = "%H:%M";
const DATE_TIME: &str = "%y-%m-%d %H:%M";

/// Render an event in `tz`, e.g. `24-03-01 09:00 - 10:30: Standup, Room 1`.
pub fn event_line<Tz>(event: &Event, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let start = event.start.with_timezone(tz);
    let end = event.end.with_timezone(tz);

    let mut line = if event.all_day {
        start.format(DATE).to_string()
    } else if start == end {
        start.format(DATE_TIME).to_string()
    } else if start.date_naive() == end.date_naive() {
        format!("{} - {}", start.format(DATE_TIME), end.format(TIME))
    } else {
        format!("{} - {}", start.format(DATE_TIME), end.format(DATE_TIME))
    };

    if let Some(summary) = event.summary.as_deref().filter(|s| !s.is_empty()) {
        line.push_str(": ");
        line.push_str(summary);
    }
    if let Some(location) = event.location.as_deref().filter(|s| !s.is_empty()) {
        line.push_str(", ");
        line.push_str(location);
    }

    line
}

/// Extra lines shown under an event in verbose mode.
pub fn detail_lines(event: &Event) -> Vec<String> {
    event
        .description
        .as_deref()
        .map(|d| d.lines().map(|l| format!("    {}", l.trim_end())).collect())
        .unwrap_or_default()
}
