//! Error types for quando.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in quando operations.
#[derive(Error, Debug)]
pub enum QuandoError {
    #[error("Failed to parse the {kind} at {}: Expected JSON object of {expected}", path.display())]
    Config {
        kind: &'static str,
        path: PathBuf,
        expected: &'static str,
    },

    #[error("Could not {action} {kind} at {}: {cause}", path.display())]
    Io {
        action: &'static str,
        kind: &'static str,
        path: PathBuf,
        cause: std::io::Error,
    },

    #[error("No calendar named {0}, consider creating one by specifying a URL with the '--url' flag")]
    UnknownCalendar(String),

    #[error("Could not find an entry for {name} in the cache at {}", path.display())]
    NotCached { name: String, path: PathBuf },

    #[error("Failed to fetch calendar from {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Could not read calendar from standard input: {0}")]
    Stdin(std::io::Error),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Invalid time '{0}'. Expected RFC 3339, YYYY-MM-DDTHH:MM or YYYY-MM-DD")]
    InvalidTime(String),

    #[error("Configuration error: {0}")]
    Settings(String),
}

/// Result type alias for quando operations.
pub type QuandoResult<T> = Result<T, QuandoError>;
