//! Snapshot persistence.
//!
//! [`SnapshotStore`] is a plain key-value seam over raw JSON text. The
//! [`Persistence`] adapter layered on top is best-effort: write failures are
//! logged and swallowed, and anything unreadable loads as "no snapshot".

use log::warn;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

use crate::constants::SAVE_KEY;
use crate::state::{SimulationState, apply_defaults};
use crate::tuning::ModeTuning;

/// Durable key-value storage for serialized snapshots.
pub trait SnapshotStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the raw snapshot stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `payload` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn write(&self, key: &str, payload: &str) -> Result<(), Self::Error>;

    /// Delete the value under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be modified.
    fn remove(&self, key: &str) -> Result<(), Self::Error>;
}

/// Errors raised by the file-backed store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("snapshot I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("snapshot key {0:?} is not a valid file name")]
    InvalidKey(String),
}

/// Shared in-memory store. Clones see the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl SnapshotStore for MemoryStore {
    type Error = Infallible;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, payload: &str) -> Result<(), Self::Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per snapshot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
            && !key.starts_with('.');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl SnapshotStore for FileStore {
    type Error = StorageError;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn write(&self, key: &str, payload: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).map_err(|source| StorageError::Io {
            path: self.root.clone(),
            source,
        })?;
        fs::write(&path, payload).map_err(|source| StorageError::Io { path, source })
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }
}

/// Best-effort save/load/clear of the single simulation snapshot.
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    store: S,
    key: String,
}

impl<S: SnapshotStore> Persistence<S> {
    /// Adapter using the standard save key.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_key(store, SAVE_KEY)
    }

    #[must_use]
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Persist `state`. Returns whether the write landed.
    pub fn save(&self, state: &SimulationState) -> bool {
        let payload = match serde_json::to_string(state) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("could not serialize snapshot: {err}");
                return false;
            }
        };
        match self.store.write(&self.key, &payload) {
            Ok(()) => true,
            Err(err) => {
                warn!("could not save snapshot {}: {err}", self.key);
                false
            }
        }
    }

    /// Load the stored snapshot, defaulting any missing or malformed field.
    /// Unreadable or unparsable snapshots load as `None`.
    #[must_use]
    pub fn load(&self, tuning: &ModeTuning) -> Option<SimulationState> {
        let payload = match self.store.read(&self.key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(err) => {
                warn!("could not read snapshot {}: {err}", self.key);
                return None;
            }
        };
        if payload.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<Value>(&payload) {
            Ok(raw) => Some(apply_defaults(&raw, tuning)),
            Err(err) => {
                warn!("ignoring malformed snapshot {}: {err}", self.key);
                None
            }
        }
    }

    /// Remove the stored snapshot.
    pub fn clear(&self) {
        if let Err(err) = self.store.remove(&self.key) {
            warn!("could not clear snapshot {}: {err}", self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameMode;

    /// Store whose writes always fail.
    struct BrokenStore;

    impl SnapshotStore for BrokenStore {
        type Error = StorageError;

        fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn write(&self, key: &str, _payload: &str) -> Result<(), Self::Error> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn remove(&self, key: &str) -> Result<(), Self::Error> {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("streetwise-{tag}-{}", std::process::id()))
    }

    #[test]
    fn memory_roundtrip_and_clear() {
        let tuning = ModeTuning::default();
        let persistence = Persistence::new(MemoryStore::new());
        let state = SimulationState {
            day: 4,
            money: 75,
            mode: GameMode::Chaos,
            actions_per_day: 4,
            actions_left: 2,
            ..SimulationState::default()
        };
        assert!(persistence.save(&state));
        assert!(persistence.store().contains(SAVE_KEY));
        assert_eq!(persistence.load(&tuning), Some(state));
        persistence.clear();
        assert_eq!(persistence.load(&tuning), None);
    }

    #[test]
    fn malformed_snapshots_load_as_absent() {
        let tuning = ModeTuning::default();
        let store = MemoryStore::new();
        let persistence = Persistence::new(store.clone());
        store.write(SAVE_KEY, "{not json").expect("infallible");
        assert_eq!(persistence.load(&tuning), None);
        store.write(SAVE_KEY, "   ").expect("infallible");
        assert_eq!(persistence.load(&tuning), None);
        store
            .write(SAVE_KEY, r#"{"day": 3, "mode": "fentanyl"}"#)
            .expect("infallible");
        let state = persistence.load(&tuning).expect("partial snapshot");
        assert_eq!(state.day, 3);
        assert_eq!(state.mode, GameMode::Chaos);
        assert_eq!(state.hunger, 100);
    }

    #[test]
    fn failures_are_swallowed() {
        let persistence = Persistence::new(BrokenStore);
        assert!(!persistence.save(&SimulationState::default()));
        assert_eq!(persistence.load(&ModeTuning::default()), None);
        persistence.clear();
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = scratch_dir("file-store");
        let store = FileStore::new(&dir);
        assert_eq!(store.read(SAVE_KEY).expect("read missing"), None);
        store.write(SAVE_KEY, "{\"day\":2}").expect("write");
        assert!(dir.join("streetwise.save.v2.json").exists());
        assert_eq!(
            store.read(SAVE_KEY).expect("read").as_deref(),
            Some("{\"day\":2}")
        );
        store.remove(SAVE_KEY).expect("remove");
        store.remove(SAVE_KEY).expect("remove twice");
        assert_eq!(store.read(SAVE_KEY).expect("read removed"), None);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_store_rejects_path_keys() {
        let store = FileStore::new(scratch_dir("keys"));
        assert!(matches!(
            store.write("../escape", "{}"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.read(""), Err(StorageError::InvalidKey(_))));
    }
}
