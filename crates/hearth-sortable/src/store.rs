#![forbid(unsafe_code)]

//! Durable order storage.
//!
//! The store is a key→[`PersistedCollection`] mapping shared by every
//! collection in the application; namespacing by collection key is what
//! keeps the sections from clobbering each other. Persisted data is a
//! *hint*: it may reference ids that no longer exist and omit ids that now
//! do — reconciliation in the controller handles both.
//!
//! # Degradation
//!
//! `load` never fails: a missing key, an unreadable file, a parse error, or
//! an unknown format version all come back as `None` and the caller falls
//! back to the canonical order. `save` reports errors, but callers treat a
//! failed write as "in-memory only for this session", not as a fault to
//! surface.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Version written into every persisted payload.
///
/// A payload carrying any other version loads as absent rather than being
/// interpreted.
pub const FORMAT_VERSION: u32 = 1;

/// One persisted item: its id plus its toggle state, when it has one.
///
/// Order and state persist together, uniformly for every collection; items
/// without toggleable state simply carry no `state` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<bool>,
}

/// The serialized form of one collection's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedCollection {
    pub version: u32,
    pub entries: Vec<PersistedEntry>,
}

impl PersistedCollection {
    /// Wrap entries in the current format version.
    #[must_use]
    pub fn new(entries: Vec<PersistedEntry>) -> Self {
        Self {
            version: FORMAT_VERSION,
            entries,
        }
    }

    fn accept(self) -> Option<Self> {
        if self.version == FORMAT_VERSION {
            Some(self)
        } else {
            tracing::warn!(version = self.version, "unknown persisted format version, ignoring");
            None
        }
    }
}

/// Storage failure raised by [`OrderStore::save`].
#[derive(Debug)]
pub enum StoreError {
    /// I/O failure against the backing medium.
    Io(io::Error),
    /// The payload could not be serialized.
    Serialize(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "order store i/o failure: {err}"),
            Self::Serialize(err) => write!(f, "order store serialization failure: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err)
    }
}

/// Durable key→ordered-entries mapping.
pub trait OrderStore {
    /// The last saved payload for `key`, or `None` if never saved or not
    /// interpretable.
    fn load(&self, key: &str) -> Option<PersistedCollection>;

    /// Overwrite the payload stored under `key`.
    ///
    /// Must be atomic with respect to a single caller: a reader never
    /// observes a partial write.
    fn save(&mut self, key: &str, value: &PersistedCollection) -> Result<(), StoreError>;
}

/// A store handle shared by every controller in the application.
///
/// All operations run on the UI thread, so single-threaded shared
/// ownership is sufficient.
pub type SharedStore = Rc<RefCell<dyn OrderStore>>;

/// Wrap a concrete store in a [`SharedStore`] handle.
pub fn shared<S: OrderStore + 'static>(store: S) -> SharedStore {
    Rc::new(RefCell::new(store))
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: AHashMap<String, PersistedCollection>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for MemoryStore {
    fn load(&self, key: &str) -> Option<PersistedCollection> {
        self.entries.get(key).cloned().and_then(PersistedCollection::accept)
    }

    fn save(&mut self, key: &str, value: &PersistedCollection) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// JSON file store: one file holding every collection key.
///
/// Writes serialize the whole map to a sibling temp file and rename it into
/// place, so a reader sees either the old file or the new one, never a
/// torn write. Keys are kept in a sorted map for stable file output.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, PersistedCollection>,
}

impl FileStore {
    /// Open a store backed by `path`.
    ///
    /// A missing file starts empty; an unreadable or malformed file also
    /// starts empty (with a diagnostic) — stored orders are hints, losing
    /// them degrades to canonical order.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "malformed state file, starting empty");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "unreadable state file, starting empty");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    /// The file this store writes to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_out(&self) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&self.entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl OrderStore for FileStore {
    fn load(&self, key: &str) -> Option<PersistedCollection> {
        self.entries.get(key).cloned().and_then(PersistedCollection::accept)
    }

    fn save(&mut self, key: &str, value: &PersistedCollection) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.clone());
        self.write_out()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(ids: &[&str]) -> PersistedCollection {
        PersistedCollection::new(
            ids.iter()
                .map(|id| PersistedEntry {
                    id: (*id).to_owned(),
                    state: None,
                })
                .collect(),
        )
    }

    // --- MemoryStore ---

    #[test]
    fn memory_round_trip() {
        let mut store = MemoryStore::new();
        let saved = order(&["c", "a", "b"]);
        store.save("devices", &saved).unwrap();
        assert_eq!(store.load("devices"), Some(saved));
    }

    #[test]
    fn memory_load_absent_key() {
        let store = MemoryStore::new();
        assert_eq!(store.load("rooms"), None);
    }

    #[test]
    fn memory_keys_are_independent() {
        let mut store = MemoryStore::new();
        store.save("rooms", &order(&["r1"])).unwrap();
        store.save("devices", &order(&["d1", "d2"])).unwrap();

        assert_eq!(store.load("rooms"), Some(order(&["r1"])));
        assert_eq!(store.load("devices"), Some(order(&["d1", "d2"])));

        store.save("rooms", &order(&["r2"])).unwrap();
        assert_eq!(store.load("devices"), Some(order(&["d1", "d2"])));
    }

    #[test]
    fn unknown_version_loads_as_absent() {
        let mut store = MemoryStore::new();
        let mut saved = order(&["a"]);
        saved.version = 99;
        store.save("devices", &saved).unwrap();
        assert_eq!(store.load("devices"), None);
    }

    // --- FileStore ---

    #[test]
    fn file_round_trip_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let saved = order(&["智能空调", "客厅灯光"]);
        {
            let mut store = FileStore::open(&path);
            store.save("devices", &saved).unwrap();
        }

        let store = FileStore::open(&path);
        assert_eq!(store.load("devices"), Some(saved));
    }

    #[test]
    fn file_missing_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("absent.json"));
        assert_eq!(store.load("devices"), None);
    }

    #[test]
    fn file_malformed_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"{ not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.load("devices"), None);
    }

    #[test]
    fn file_save_leaves_no_temp_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut store = FileStore::open(&path);
        store.save("rooms", &order(&["客厅"])).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn file_preserves_other_keys_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        {
            let mut store = FileStore::open(&path);
            store.save("rooms", &order(&["客厅", "厨房"])).unwrap();
            store.save("scenes", &order(&["回家模式"])).unwrap();
        }
        {
            let mut store = FileStore::open(&path);
            store.save("rooms", &order(&["厨房", "客厅"])).unwrap();
        }

        let store = FileStore::open(&path);
        assert_eq!(store.load("scenes"), Some(order(&["回家模式"])));
        assert_eq!(store.load("rooms"), Some(order(&["厨房", "客厅"])));
    }

    #[test]
    fn entry_state_survives_serialization() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let saved = PersistedCollection::new(vec![
            PersistedEntry {
                id: "客厅灯光".to_owned(),
                state: Some(true),
            },
            PersistedEntry {
                id: "回家模式".to_owned(),
                state: None,
            },
        ]);
        {
            let mut store = FileStore::open(&path);
            store.save("devices", &saved).unwrap();
        }

        let store = FileStore::open(&path);
        assert_eq!(store.load("devices"), Some(saved));
    }
}
