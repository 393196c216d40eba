//! Selecting which events of a timeline to show.

use chrono::{DateTime, Utc};

use crate::event::Event;

/// Time window requested on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Window {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub include_past: bool,
}

impl Window {
    /// Filter an ascending-by-start sequence of events.
    ///
    /// `now` stands in for the start bound when past events are excluded; it
    /// is read once here, not per event.
    pub fn apply<I>(&self, events: I, now: DateTime<Utc>) -> Timeline<I::IntoIter>
    where
        I: IntoIterator<Item = Event>,
    {
        let past_floor = (!self.include_past).then_some(now);
        let floor = match (self.start, past_floor) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };

        Timeline {
            events: events.into_iter(),
            floor,
            ceiling: self.end,
            dropping: floor.is_some(),
            done: false,
        }
    }
}

/// Forward-only view over a timeline.
///
/// Leading events that start before the floor are dropped; once one event
/// clears the floor nothing is dropped any more. The first event starting
/// after the ceiling ends the sequence without reading further.
#[derive(Debug)]
pub struct Timeline<I> {
    events: I,
    floor: Option<DateTime<Utc>>,
    ceiling: Option<DateTime<Utc>>,
    dropping: bool,
    done: bool,
}

impl<I: Iterator<Item = Event>> Iterator for Timeline<I> {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        if self.done {
            return None;
        }

        let event = loop {
            let Some(event) = self.events.next() else {
                self.done = true;
                return None;
            };
            match self.floor {
                Some(floor) if self.dropping && event.start < floor => continue,
                _ => {
                    self.dropping = false;
                    break event;
                }
            }
        };

        if self.ceiling.is_some_and(|ceiling| event.start > ceiling) {
            self.done = true;
            return None;
        }

        Some(event)
    }
}
