//! Persistent name -> string maps backing the registry and the cache.
//!
//! Both files hold a flat JSON object whose keys and values are strings:
//! `{ "<name>": "<url>" }` for the registry, `{ "<name>": "<ics text>" }` for
//! the cache. A missing file loads as an empty map.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{QuandoError, QuandoResult};

/// Which store a map backs; only changes how errors are worded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreKind {
    Registry,
    Cache,
}

impl StoreKind {
    fn label(self) -> &'static str {
        match self {
            StoreKind::Registry => "data file",
            StoreKind::Cache => "cache file",
        }
    }

    fn expected(self) -> &'static str {
        match self {
            StoreKind::Registry => "names and URLs",
            StoreKind::Cache => "names and ICS content",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct JsonMap {
    kind: StoreKind,
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonMap {
    fn load(kind: StoreKind, path: &Path) -> QuandoResult<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(JsonMap {
                    kind,
                    path: path.to_path_buf(),
                    entries: BTreeMap::new(),
                });
            }
            Err(e) => {
                return Err(QuandoError::Io {
                    action: "open/read",
                    kind: kind.label(),
                    path: path.to_path_buf(),
                    cause: e,
                });
            }
        };

        let entries = parse_entries(&contents).ok_or_else(|| QuandoError::Config {
            kind: kind.label(),
            path: path.to_path_buf(),
            expected: kind.expected(),
        })?;

        Ok(JsonMap {
            kind,
            path: path.to_path_buf(),
            entries,
        })
    }

    fn save(&self) -> QuandoResult<()> {
        let io_err = |cause: std::io::Error| QuandoError::Io {
            action: "update",
            kind: self.kind.label(),
            path: self.path.clone(),
            cause,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents = serde_json::to_string(&self.entries)
            .map_err(|e| io_err(std::io::Error::new(ErrorKind::InvalidData, e)))?;

        std::fs::write(&self.path, contents).map_err(io_err)
    }
}

/// Accepts only a flat object of string values.
fn parse_entries(contents: &str) -> Option<BTreeMap<String, String>> {
    let Value::Object(object) = serde_json::from_str::<Value>(contents).ok()? else {
        return None;
    };

    object
        .into_iter()
        .map(|(name, value)| match value {
            Value::String(s) => Some((name, s)),
            _ => None,
        })
        .collect()
}

/// Remembered calendars: name -> source URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Registry {
    map: JsonMap,
}

impl Registry {
    /// Load the registry, or an empty one if the file does not exist yet.
    pub fn load(path: &Path) -> QuandoResult<Self> {
        Ok(Registry {
            map: JsonMap::load(StoreKind::Registry, path)?,
        })
    }

    /// A registry with no entries, regardless of what is currently stored at `path`.
    pub fn empty(path: &Path) -> Self {
        Registry {
            map: JsonMap {
                kind: StoreKind::Registry,
                path: path.to_path_buf(),
                entries: BTreeMap::new(),
            },
        }
    }

    /// Write the registry back to disk. Failure here must abort the command.
    pub fn save(&self) -> QuandoResult<()> {
        self.map.save()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.entries.get(name).map(String::as_str)
    }

    /// Remember `url` under `name`, replacing any previous URL.
    pub fn insert(&mut self, name: &str, url: &str) {
        self.map.entries.insert(name.to_string(), url.to_string());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.map.entries.remove(name)
    }

    pub fn clear(&mut self) {
        self.map.entries.clear();
    }

    /// Calendars sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map
            .entries
            .iter()
            .map(|(name, url)| (name.as_str(), url.as_str()))
    }

    pub fn len(&self) -> usize {
        self.map.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.entries.is_empty()
    }
}

/// Last ICS text shown for each calendar name.
#[derive(Debug, Clone, PartialEq)]
pub struct Cache {
    map: JsonMap,
}

impl Cache {
    pub fn load(path: &Path) -> QuandoResult<Self> {
        Ok(Cache {
            map: JsonMap::load(StoreKind::Cache, path)?,
        })
    }

    pub fn save(&self) -> QuandoResult<()> {
        self.map.save()
    }

    /// The cache is a convenience: a failed write is reported and otherwise ignored.
    pub fn save_or_warn(&self) {
        if let Err(e) = self.save() {
            log::warn!("{e}");
        }
    }

    pub fn path(&self) -> &Path {
        &self.map.path
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.entries.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: &str, ics: &str) {
        self.map.entries.insert(name.to_string(), ics.to_string());
    }
}
