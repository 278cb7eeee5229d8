use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use serde_json::Value;

use crate::error::{PlayerError, Result};

use super::set::FavoritesSet;

/// Storage key of the favorites list.
pub const FAVORITES_KEY: &str = "favorites";

/// Durable string-keyed storage of JSON values.
pub trait KeyValueStore {
    /// `Ok(None)` when nothing was stored under `key`.
    fn get(&self, key: &str) -> io::Result<Option<Value>>;

    fn set(&mut self, key: &str, value: Value) -> io::Result<()>;
}

/// All keys in a single JSON object file.
///
/// A missing file reads as empty. Writes go to a sibling temp file that is
/// then renamed over the existing file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> io::Result<BTreeMap<String, Value>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e),
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text).map_err(io::Error::from)
    }

    fn write_all(&self, entries: &BTreeMap<String, Value>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(entries).map_err(io::Error::from)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> io::Result<Option<Value>> {
        Ok(self.read_all()?.remove(key))
    }

    /// An unparsable file is overwritten rather than blocking every save.
    fn set(&mut self, key: &str, value: Value) -> io::Result<()> {
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(e) if matches!(
                e.kind(),
                io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof
            ) =>
            {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "storage file is not valid JSON; starting it over"
                );
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value);
        self.write_all(&entries)
    }
}

/// Volatile store, for tests and for running without a data directory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, Value>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<Value>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> io::Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// Backend whose every call fails.
#[cfg(test)]
pub(crate) struct FailingStore;

#[cfg(test)]
impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> io::Result<Option<Value>> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read denied"))
    }

    fn set(&mut self, _key: &str, _value: Value) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "write denied"))
    }
}

/// Loads and saves the favorites set as a JSON array of path strings.
pub struct FavoritesStore {
    backend: Box<dyn KeyValueStore>,
}

impl FavoritesStore {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Read the persisted set. Nothing stored yet yields an empty set.
    pub fn load(&self) -> Result<FavoritesSet> {
        let value = self.backend.get(FAVORITES_KEY).map_err(persistence_err)?;
        let Some(value) = value else {
            return Ok(FavoritesSet::default());
        };

        let paths: Vec<PathBuf> = serde_json::from_value(value)
            .map_err(|e| persistence_err(io::Error::from(e)))?;
        Ok(paths.into_iter().collect())
    }

    pub fn save(&mut self, favorites: &FavoritesSet) -> Result<()> {
        let paths: Vec<&std::path::Path> = favorites.iter().collect();
        let value = serde_json::to_value(paths).map_err(|e| persistence_err(io::Error::from(e)))?;
        self.backend
            .set(FAVORITES_KEY, value)
            .map_err(persistence_err)?;
        tracing::debug!(count = favorites.len(), "favorites saved");
        Ok(())
    }
}

fn persistence_err(source: io::Error) -> PlayerError {
    PlayerError::PersistenceIo {
        key: FAVORITES_KEY.to_string(),
        source,
    }
}
