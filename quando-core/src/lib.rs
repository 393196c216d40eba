//! Core of the quando calendar viewer.
//!
//! - `store` keeps the name -> URL registry and the name -> ICS cache
//! - `resolve` decides where a calendar's text comes from (stdin, network or cache)
//! - `ics` turns ICS text into an ascending timeline of `Event`s
//! - `timeline` and `format` select and render the events to show

pub mod error;
pub mod event;
pub mod format;
pub mod ics;
pub mod resolve;
pub mod settings;
pub mod store;
pub mod time;
pub mod timeline;

pub use error::{QuandoError, QuandoResult};
pub use event::{Event, EventTime};
