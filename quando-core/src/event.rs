//! Calendar events as shown by quando.

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::{CalendarDateTime, DatePerhapsTime};

/// Time value as written in the ICS document.
#[derive(Debug, Clone, PartialEq)]
pub enum EventTime {
    /// All-day value (`VALUE=DATE`)
    Date(NaiveDate),
    /// `...Z` suffix
    DateTimeUtc(DateTime<Utc>),
    /// No zone attached; read as local time
    DateTimeFloating(NaiveDateTime),
    /// `TZID=` parameter
    DateTimeZoned { datetime: NaiveDateTime, tzid: String },
}

impl EventTime {
    pub fn is_date(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }

    /// Resolve to an instant. Dates start at local midnight; an unknown TZID
    /// falls back to local time.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            EventTime::Date(d) => instant_in(&Local, &d.and_hms_opt(0, 0, 0)?),
            EventTime::DateTimeUtc(dt) => Some(*dt),
            EventTime::DateTimeFloating(dt) => instant_in(&Local, dt),
            EventTime::DateTimeZoned { datetime, tzid } => match tzid.parse::<Tz>() {
                Ok(tz) => instant_in(&tz, datetime),
                Err(_) => {
                    log::debug!("Unknown TZID '{tzid}', reading {datetime} as local time");
                    instant_in(&Local, datetime)
                }
            },
        }
    }
}

impl From<DatePerhapsTime> for EventTime {
    fn from(value: DatePerhapsTime) -> Self {
        match value {
            DatePerhapsTime::Date(date) => EventTime::Date(date),
            DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => EventTime::DateTimeUtc(dt),
            DatePerhapsTime::DateTime(CalendarDateTime::Floating(dt)) => {
                EventTime::DateTimeFloating(dt)
            }
            DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
                EventTime::DateTimeZoned {
                    datetime: date_time,
                    tzid,
                }
            }
        }
    }
}

/// Wall-clock time in `zone` as an instant. Repeated times take the earlier
/// reading; times skipped by a forward transition keep the offset in force
/// before it, so 02:30 in a 02:00 -> 03:00 gap becomes 03:30.
fn instant_in<Z: TimeZone>(zone: &Z, local: &NaiveDateTime) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(local) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => {
            let before = zone.from_local_datetime(&(*local - Duration::days(1))).earliest()?;
            let offset = before.offset().fix().local_minus_utc();
            Some((*local - Duration::seconds(offset.into())).and_utc())
        }
    }
}

/// One entry of a calendar timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub uid: Option<String>,
    pub start: DateTime<Utc>,
    /// Equal to `start` for instantaneous events
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl Event {
    /// A timed event without any text fields.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Event {
            uid: None,
            start,
            end,
            all_day: false,
            summary: None,
            location: None,
            description: None,
        }
    }
}
