//! Persistence seam: where maps are loaded from and saved to.
//!
//! A stored map is its title plus the serialized document, the same pair
//! the map API returns. The editor never interprets `data` here; parsing
//! and its fallback happen in the session.

use mm_core::error::PersistenceError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

/// A map as held by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMap {
    pub title: String,
    /// Serialized document JSON.
    pub data: String,
}

/// Loads and saves maps by id.
pub trait DocumentStore {
    fn load(&self, map_id: &str) -> Result<StoredMap, PersistenceError>;

    fn save(&mut self, map_id: &str, map: &StoredMap) -> Result<(), PersistenceError>;
}

// ─── In-memory store ─────────────────────────────────────────────────────

/// Keeps maps in a `HashMap`. Can be told to fail saves, to exercise the
/// error path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    maps: HashMap<String, StoredMap>,
    save_failure: Option<PersistenceError>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_map(mut self, map_id: &str, title: &str, data: &str) -> Self {
        self.maps.insert(
            map_id.to_string(),
            StoredMap {
                title: title.to_string(),
                data: data.to_string(),
            },
        );
        self
    }

    /// Make every following save fail with `err`, or succeed again on `None`.
    pub fn set_save_failure(&mut self, err: Option<PersistenceError>) {
        self.save_failure = err;
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    pub fn get(&self, map_id: &str) -> Option<&StoredMap> {
        self.maps.get(map_id)
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self, map_id: &str) -> Result<StoredMap, PersistenceError> {
        self.maps
            .get(map_id)
            .cloned()
            .ok_or_else(|| PersistenceError::NotFound(map_id.to_string()))
    }

    fn save(&mut self, map_id: &str, map: &StoredMap) -> Result<(), PersistenceError> {
        if let Some(err) = &self.save_failure {
            return Err(err.clone());
        }
        self.maps.insert(map_id.to_string(), map.clone());
        self.saves += 1;
        Ok(())
    }
}

// ─── File store ──────────────────────────────────────────────────────────

/// One JSON file per map, `<dir>/<map_id>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, map_id: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !map_id.is_empty()
            && map_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PersistenceError::NotFound(map_id.to_string()));
        }
        Ok(self.dir.join(format!("{map_id}.json")))
    }
}

impl DocumentStore for FileStore {
    fn load(&self, map_id: &str) -> Result<StoredMap, PersistenceError> {
        let path = self.path(map_id)?;
        let text = std::fs::read_to_string(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => PersistenceError::NotFound(map_id.to_string()),
            ErrorKind::PermissionDenied => PersistenceError::Auth,
            _ => PersistenceError::Io(format!("{}: {err}", path.display())),
        })?;
        serde_json::from_str(&text)
            .map_err(|err| PersistenceError::Io(format!("{}: {err}", path.display())))
    }

    fn save(&mut self, map_id: &str, map: &StoredMap) -> Result<(), PersistenceError> {
        let path = self.path(map_id)?;
        let text =
            serde_json::to_string_pretty(map).map_err(|err| PersistenceError::Io(err.to_string()))?;
        std::fs::create_dir_all(&self.dir)
            .and_then(|()| std::fs::write(&path, text))
            .map_err(|err| match err.kind() {
                ErrorKind::PermissionDenied => PersistenceError::Auth,
                _ => PersistenceError::Io(format!("{}: {err}", path.display())),
            })
    }
}
