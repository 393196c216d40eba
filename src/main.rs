mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use quando_core::resolve::ShowRequest;
use quando_core::settings::{Overrides, Settings};
use quando_core::store::Registry;
use quando_core::time::parse_cli_time;
use quando_core::timeline::Window;

#[derive(Parser)]
#[command(name = "quando", version)]
#[command(about = "Show ICS calendars in the terminal")]
struct Cli {
    /// Path to the cache file
    #[arg(long, global = true)]
    cache_file: Option<PathBuf>,

    /// Path to the data file where all calendar names and URLs are remembered
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a calendar
    Show {
        /// Name of the calendar. A dash ('-') reads the ICS file from stdin
        name: String,

        /// Retrieve the calendar from this URL and remember the URL in the future
        #[arg(short, long, conflicts_with = "cache")]
        url: Option<String>,

        /// Read the calendar from the cache instead of fetching its URL
        #[arg(short, long)]
        cache: bool,

        /// Hide events starting before this time (e.g. "2025-03-20" or "2025-03-20T15:00")
        #[arg(short, long, value_parser = parse_cli_time)]
        start: Option<DateTime<Utc>>,

        /// Stop at the first event starting after this time
        #[arg(short, long, value_parser = parse_cli_time)]
        end: Option<DateTime<Utc>>,

        /// Also print event descriptions
        #[arg(short, long)]
        verbose: bool,

        /// Include past events
        #[arg(short, long)]
        past: bool,
    },
    /// List all calendars
    Ls,
    /// Remove a calendar
    Rm {
        /// Name of the calendar to remove
        name: String,
    },
    /// Remove all calendars
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", one_line(&e));
            ExitCode::FAILURE
        }
    }
}

/// The whole cause chain, joined on one line.
fn one_line(e: &anyhow::Error) -> String {
    format!("{e:#}").replace('\n', " ")
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(Overrides {
        data_file: cli.data_file,
        cache_file: cli.cache_file,
    })?;
    log::debug!(
        "Data file {}, cache file {}",
        settings.data_file.display(),
        settings.cache_file.display()
    );

    match cli.command {
        Commands::Show {
            name,
            url,
            cache,
            start,
            end,
            verbose,
            past,
        } => {
            let mut registry = Registry::load(&settings.data_file)?;
            let request = ShowRequest {
                name,
                url,
                prefer_cache: cache,
            };
            let window = Window {
                start,
                end,
                include_past: past,
            };
            commands::show::run(&settings, &mut registry, request, window, verbose).await
        }
        Commands::Ls => {
            let registry = Registry::load(&settings.data_file)?;
            commands::ls::run(&registry)
        }
        Commands::Rm { name } => {
            let mut registry = Registry::load(&settings.data_file)?;
            commands::rm::run(&mut registry, &name)
        }
        Commands::Clear => commands::clear::run(&settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_fatal_error_is_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let err = anyhow::Error::from(Registry::load(dir.path()).unwrap_err());

        let line = one_line(&err);
        assert!(!line.contains('\n'));
        assert_eq!(line.matches("os error").count(), 1);
    }

    #[test]
    fn test_context_is_joined_on_the_same_line() {
        let err = Err::<(), _>(std::io::Error::other("disk full"))
            .context("Could not write output")
            .unwrap_err();
        assert_eq!(one_line(&err), "Could not write output: disk full");
    }
}
