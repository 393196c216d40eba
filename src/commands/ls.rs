use std::io::Write;

use anyhow::Result;
use owo_colors::{OwoColorize, Stream::Stdout};
use quando_core::store::Registry;

pub fn run(registry: &Registry) -> Result<()> {
    write_list(registry, &mut std::io::stdout().lock())?;
    Ok(())
}

/// One `name: url` line per calendar. Nothing at all when there are none.
fn write_list<W: Write>(registry: &Registry, out: &mut W) -> std::io::Result<()> {
    for (name, url) in registry.iter() {
        writeln!(out, "{}: {}", name.if_supports_color(Stdout, |t| t.bold()), url)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_prints_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::load(&dir.path().join("quando.json")).unwrap();

        let mut out = Vec::new();
        write_list(&registry, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_lists_calendars_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = Registry::load(&dir.path().join("quando.json")).unwrap();
        registry.insert("work", "https://example.com/work.ics");
        registry.insert("home", "https://example.com/home.ics");

        let mut out = Vec::new();
        write_list(&registry, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("home") && lines[0].ends_with(": https://example.com/home.ics"));
        assert!(lines[1].contains("work") && lines[1].ends_with(": https://example.com/work.ics"));
    }
}
