//! ICS input: turning document text into a timeline of events.

mod parse;

pub use parse::Calendar;
