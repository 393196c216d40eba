//! ICS document parsing using the icalendar crate's parser.

use chrono::Duration;
use icalendar::{
    DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};

use crate::error::{QuandoError, QuandoResult};
use crate::event::{Event, EventTime};

/// A parsed ICS document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calendar {
    /// Sorted ascending by start; ties keep document order
    events: Vec<Event>,
}

impl Calendar {
    /// Parse every VEVENT of `content`. Events without a usable DTSTART are skipped.
    pub fn parse(content: &str) -> QuandoResult<Self> {
        if !content.trim_start().to_ascii_uppercase().starts_with("BEGIN:VCALENDAR") {
            return Err(QuandoError::IcsParse("Missing BEGIN:VCALENDAR".into()));
        }

        let unfolded = unfold(content);
        let calendar = read_calendar(&unfolded).map_err(QuandoError::IcsParse)?;

        let mut events = Vec::new();
        for vevent in vevents(&calendar.components) {
            match parse_event(vevent) {
                Some(event) => events.push(event),
                None => log::debug!(
                    "Skipping VEVENT without a usable DTSTART ({:?})",
                    vevent.find_prop("UID").map(|p| p.val.to_string())
                ),
            }
        }
        events.sort_by_key(|e| e.start);

        log::debug!("Parsed {} events", events.len());
        Ok(Calendar { events })
    }

    /// Events in ascending start order.
    pub fn timeline(self) -> impl Iterator<Item = Event> {
        self.events.into_iter()
    }
}

/// VEVENTs at the top level or nested in VCALENDAR wrappers.
fn vevents<'a, 'c>(components: &'c [Component<'a>]) -> Vec<&'c Component<'a>> {
    let mut found = Vec::new();
    for component in components {
        if component.name == "VEVENT" {
            found.push(component);
        } else if component.name == "VCALENDAR" {
            found.extend(vevents(&component.components));
        }
    }
    found
}

fn parse_event(vevent: &Component) -> Option<Event> {
    let start_time = EventTime::from(DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?).ok()?);
    let all_day = start_time.is_date();
    let start = start_time.to_utc()?;

    let end = vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(EventTime::from)
        .and_then(|t| t.to_utc())
        .or_else(|| {
            vevent
                .find_prop("DURATION")
                .and_then(|p| parse_duration(p.val.as_ref()))
                .map(|d| start + d)
        })
        .unwrap_or(if all_day { start + Duration::days(1) } else { start });

    let text = |name: &str| {
        vevent
            .find_prop(name)
            .map(|p| unescape_text(p.val.as_ref()))
            .filter(|s| !s.is_empty())
    };

    Some(Event {
        uid: vevent.find_prop("UID").map(|p| p.val.to_string()),
        start,
        end: end.max(start),
        all_day,
        summary: text("SUMMARY"),
        location: text("LOCATION"),
        description: text("DESCRIPTION"),
    })
}

/// Positive ISO 8601 durations only (`PT1H30M`, `P1D`).
fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim().trim_start_matches('+');
    if value.starts_with('-') {
        return None;
    }
    let duration = iso8601::duration(value).ok()?;
    let std_duration: std::time::Duration = duration.into();
    Duration::from_std(std_duration).ok()
}

/// Undo RFC 5545 TEXT escaping.
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
