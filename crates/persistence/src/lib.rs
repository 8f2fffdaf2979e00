#![deny(warnings)]

//! Persistence layer: calculator input records as JSON blobs in a key-value store.
//!
//! Each domain's input record lives under its fixed key
//! ([`roi_core::InputRecord::STORAGE_KEY`]). Loading never fails: a missing,
//! unreadable or malformed blob falls back to the domain defaults.

use roi_core::{Domain, InputRecord};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Returns the default directory used for local saves.
pub fn default_store_dir() -> &'static str {
    "./saves"
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Keys become file names, so only `[A-Za-z0-9_-]` is accepted.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// String blobs under string keys.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&mut self, key: &str, blob: &str) -> Result<(), StoreError>;
    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process store, mostly for tests and one-shot runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created lazily on first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, blob: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        // write-then-rename so a crash never leaves a half-written blob
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Restore a record, falling back to its defaults on any problem.
pub fn load_or_default<T, S>(store: &S) -> T
where
    T: InputRecord,
    S: KvStore + ?Sized,
{
    let key = T::STORAGE_KEY;
    let blob = match store.get(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            debug!(key, "no saved inputs, using defaults");
            return T::default();
        }
        Err(e) => {
            warn!(key, error = %e, "could not read saved inputs, using defaults");
            return T::default();
        }
    };
    match serde_json::from_str(&blob) {
        Ok(record) => record,
        Err(e) => {
            warn!(key, error = %e, "saved inputs are malformed, using defaults");
            T::default()
        }
    }
}

/// Persist a record under its domain key.
pub fn save<T, S>(store: &mut S, record: &T) -> Result<(), StoreError>
where
    T: InputRecord,
    S: KvStore + ?Sized,
{
    let blob = serde_json::to_string(record)?;
    store.put(T::STORAGE_KEY, &blob)?;
    debug!(key = T::STORAGE_KEY, bytes = blob.len(), "saved inputs");
    Ok(())
}

/// Drop a domain's saved record so the next load starts from defaults.
pub fn reset<S>(store: &mut S, domain: Domain) -> Result<(), StoreError>
where
    S: KvStore + ?Sized,
{
    let key = domain.storage_key();
    store.remove(key)?;
    debug!(key, "cleared saved inputs");
    Ok(())
}
