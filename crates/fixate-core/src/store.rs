//! Durable storage for the completion set.
//!
//! The record format is fixed: one named entry whose value is a bare JSON
//! array of `YYYY-MM-DD` strings, e.g. `["2024-01-10","2024-01-11"]`.
//! Whole-record overwrite on every write; no versioning, no migration.
//!
//! Storage is an injected port so hosts and tests can supply their own
//! backend. [`FileStore`] keeps the record at
//! `~/.config/fixate[-dev]/completed_days.json`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::completion::CompletionSet;
use crate::error::StoreError;

/// Name of the single durable record.
pub const RECORD_FILE: &str = "completed_days.json";

/// Injected storage port for the completion set.
pub trait PersistenceStore {
    /// The stored set, or `None` when no prior record exists.
    fn read(&self) -> Result<Option<CompletionSet>, StoreError>;

    /// Overwrite the entire stored representation.
    fn write(&mut self, set: &CompletionSet) -> Result<(), StoreError>;
}

/// Returns `~/.config/fixate[-dev]/` based on FIXATE_ENV.
///
/// Set FIXATE_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FIXATE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("fixate-dev")
    } else {
        base_dir.join("fixate")
    };

    std::fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// File-backed store: one JSON record in the data directory.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Open the store at the default data-dir location.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open() -> Result<Self, StoreError> {
        Ok(Self {
            path: data_dir()?.join(RECORD_FILE),
        })
    }

    /// Open the store at an explicit path.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceStore for FileStore {
    fn read(&self) -> Result<Option<CompletionSet>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let set = serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(set))
    }

    fn write(&mut self, set: &CompletionSet) -> Result<(), StoreError> {
        let raw = serde_json::to_string(set).map_err(StoreError::Encode)?;
        std::fs::write(&self.path, raw).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[derive(Default)]
struct MemoryInner {
    record: Option<String>,
    fail_writes: bool,
    writes: usize,
}

/// In-memory store for tests and embedded hosts.
///
/// Clones share the same backing record, so a test can hold a probe handle
/// while the tracker owns the store. The raw record is kept as text so
/// malformed data can be seeded, and writes can be armed to fail.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with a raw record, valid or not.
    pub fn with_record(raw: impl Into<String>) -> Self {
        let store = Self::new();
        store.lock().record = Some(raw.into());
        store
    }

    /// Make every subsequent write fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// The raw record currently held, if any.
    pub fn record(&self) -> Option<String> {
        self.lock().record.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PersistenceStore for MemoryStore {
    fn read(&self) -> Result<Option<CompletionSet>, StoreError> {
        match &self.lock().record {
            None => Ok(None),
            Some(raw) => {
                let set = serde_json::from_str(raw).map_err(|source| StoreError::Malformed {
                    path: PathBuf::from("<memory>"),
                    source,
                })?;
                Ok(Some(set))
            }
        }
    }

    fn write(&mut self, set: &CompletionSet) -> Result<(), StoreError> {
        let raw = serde_json::to_string(set).map_err(StoreError::Encode)?;
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(StoreError::Rejected("writes disabled".into()));
        }
        inner.record = Some(raw);
        inner.writes += 1;
        Ok(())
    }
}
