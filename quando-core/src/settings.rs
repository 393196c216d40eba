//! Where quando keeps its files and how long it waits for the network.
//!
//! Values are layered: built-in defaults, then `~/.config/quando/config.toml`,
//! then `QUANDO_*` environment variables, then command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{QuandoError, QuandoResult};

const FILE_NAME: &str = "quando.json";

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Keys accepted in config.toml / the environment
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    data_file: Option<String>,
    cache_file: Option<String>,
    /// humantime format, e.g. "15s"
    fetch_timeout: Option<String>,
}

/// Values given explicitly on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub data_file: Option<PathBuf>,
    pub cache_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Registry of calendar names and URLs
    pub data_file: PathBuf,
    pub cache_file: PathBuf,
    pub fetch_timeout: Duration,
}

impl Settings {
    pub fn config_path() -> QuandoResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| QuandoError::Settings("Could not determine config directory".into()))?
            .join("quando");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load(overrides: Overrides) -> QuandoResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path, overrides)
    }

    fn load_from(config_path: &Path, overrides: Overrides) -> QuandoResult<Self> {
        let file: FileSettings = Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(Environment::with_prefix("QUANDO"))
            .build()
            .map_err(|e| QuandoError::Settings(e.to_string()))?
            .try_deserialize()
            .map_err(|e| QuandoError::Settings(e.to_string()))?;

        let data_file = match (overrides.data_file, file.data_file) {
            (Some(path), _) => path,
            (None, Some(path)) => expand(&path),
            (None, None) => default_data_file()?,
        };

        let cache_file = match (overrides.cache_file, file.cache_file) {
            (Some(path), _) => path,
            (None, Some(path)) => expand(&path),
            (None, None) => default_cache_file()?,
        };

        let fetch_timeout = match file.fetch_timeout {
            Some(s) => humantime::parse_duration(&s).map_err(|e| {
                QuandoError::Settings(format!("Invalid fetch_timeout '{s}': {e}"))
            })?,
            None => DEFAULT_FETCH_TIMEOUT,
        };

        Ok(Settings {
            data_file,
            cache_file,
            fetch_timeout,
        })
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

fn default_data_file() -> QuandoResult<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(FILE_NAME))
        .ok_or_else(|| QuandoError::Settings("Could not determine data directory".into()))
}

fn default_cache_file() -> QuandoResult<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join(FILE_NAME))
        .ok_or_else(|| QuandoError::Settings("Could not determine cache directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "data_file = \"/srv/quando/data.json\"\ncache_file = \"/srv/quando/cache.json\"\nfetch_timeout = \"5s\"\n",
        )
        .unwrap();

        let settings = Settings::load_from(&config_path, Overrides::default()).unwrap();
        assert_eq!(settings.data_file, PathBuf::from("/srv/quando/data.json"));
        assert_eq!(settings.cache_file, PathBuf::from("/srv/quando/cache.json"));
        assert_eq!(settings.fetch_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides_beat_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "data_file = \"/srv/quando/data.json\"\n").unwrap();

        let overrides = Overrides {
            data_file: Some(PathBuf::from("/tmp/other.json")),
            cache_file: None,
        };
        let settings = Settings::load_from(&config_path, overrides).unwrap();
        assert_eq!(settings.data_file, PathBuf::from("/tmp/other.json"));
    }

    #[test]
    fn test_tilde_is_expanded() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "cache_file = \"~/quando-cache.json\"\n").unwrap();

        let settings = Settings::load_from(&config_path, Overrides::default()).unwrap();
        assert!(!settings.cache_file.starts_with("~"));
        assert!(settings.cache_file.ends_with("quando-cache.json"));
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "fetch_timeout = \"soon\"\n").unwrap();

        assert!(matches!(
            Settings::load_from(&config_path, Overrides::default()),
            Err(QuandoError::Settings(_))
        ));
    }
}
