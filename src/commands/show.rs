use std::io::{ErrorKind, Write};

use anyhow::Result;
use chrono::{Local, Utc};
use quando_core::Event;
use quando_core::format::{detail_lines, event_line};
use quando_core::resolve::{HttpFetcher, ShowRequest, resolve};
use quando_core::settings::Settings;
use quando_core::store::{Cache, Registry};
use quando_core::timeline::Window;

pub async fn run(
    settings: &Settings,
    registry: &mut Registry,
    request: ShowRequest,
    window: Window,
    verbose: bool,
) -> Result<()> {
    let mut cache = Cache::load(&settings.cache_file)?;
    let fetcher = HttpFetcher::new(settings.fetch_timeout);

    let resolved = resolve(&request, registry, &mut cache, &fetcher, std::io::stdin()).await?;

    let events = window.apply(resolved.calendar.timeline(), Utc::now());
    print_events(&mut std::io::stdout().lock(), events, verbose)
}

/// A reader that went away (`quando show work | head`) ends the listing quietly.
fn print_events<W: Write>(
    out: &mut W,
    events: impl Iterator<Item = Event>,
    verbose: bool,
) -> Result<()> {
    match write_events(out, events, verbose) {
        Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
        result => Ok(result?),
    }
}

fn write_events<W: Write>(
    out: &mut W,
    events: impl Iterator<Item = Event>,
    verbose: bool,
) -> std::io::Result<()> {
    for event in events {
        writeln!(out, "{}", event_line(&event, &Local))?;
        if verbose {
            for line in detail_lines(&event) {
                writeln!(out, "{line}")?;
            }
        }
    }
    out.flush()
}
