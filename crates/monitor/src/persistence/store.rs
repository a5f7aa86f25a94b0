#![forbid(unsafe_code)]

use crate::error::Error;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::trace;

/// Local key/value storage for snapshots.
pub trait StateStore: Send + Sync {
    /// `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, Error>;
    fn save(&self, key: &str, value: &str) -> Result<(), Error>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), Error>;
}

/// Stores nothing and always loads empty.
#[derive(Debug, Default)]
pub struct NoopStore;

impl StateStore for NoopStore {
    fn load(&self, _key: &str) -> Result<Option<String>, Error> {
        Ok(None)
    }

    fn save(&self, _key: &str, _value: &str) -> Result<(), Error> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<(), Error> {
        Ok(())
    }
}

/// In-process map. Clones share the same entries, so a test can keep one
/// handle and give another to the monitor.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.lock().insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), Error> {
        self.insert(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a directory. The directory is
/// created on first write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>, Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), Error> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        // write-then-rename so readers never see a torn file
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        trace!(path = %path.display(), bytes = value.len(), "snapshot file written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_clones_share_entries() {
        let store = MemoryStore::default();
        let other = store.clone();
        store.save("k", "v").unwrap();
        assert_eq!(other.load("k").unwrap().as_deref(), Some("v"));
        other.remove("k").unwrap();
        assert!(!store.contains("k"));
        store.remove("missing").unwrap();
    }

    #[test]
    fn noop_store_forgets() {
        let store = NoopStore;
        store.save("k", "v").unwrap();
        assert_eq!(store.load("k").unwrap(), None);
    }

    #[test]
    fn json_file_store_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested"));

        assert_eq!(store.load("a.v1").unwrap(), None);
        store.save("a.v1", "{\"x\":1}").unwrap();
        assert!(store.path_for("a.v1").is_file());
        assert_eq!(store.load("a.v1").unwrap().as_deref(), Some("{\"x\":1}"));

        store.save("a.v1", "{}").unwrap();
        assert_eq!(store.load("a.v1").unwrap().as_deref(), Some("{}"));
        assert!(!dir.path().join("nested/a.v1.json.tmp").exists());

        store.remove("a.v1").unwrap();
        store.remove("a.v1").unwrap();
        assert_eq!(store.load("a.v1").unwrap(), None);
    }
}
