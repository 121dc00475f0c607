//! File-backed store.
//!
//! The whole store is one JSON object mapping keys to JSON-encoded strings.
//! Every read loads the file and every write rewrites it, so a CLI and a
//! running storefront pointed at the same file see each other's changes.
//! Writes go to `<path>.tmp` first and are renamed into place.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use super::{KeyValueStore, StoreError};

type Entries = BTreeMap<String, String>;

/// A [`KeyValueStore`] persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (without creating) the store at `path`.
    ///
    /// The file and its parent directory are created on the first write.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CorruptFile` if an existing file is not a valid
    /// store, so a bad file is reported at startup rather than on first use.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };
        store.read_all()?;
        Ok(store)
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Entries, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&raw).map_err(|source| StoreError::CorruptFile {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn write_all(&self, entries: &Entries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let body = serde_json::to_vec_pretty(entries).map_err(|source| StoreError::Encode {
            key: self.path.display().to_string(),
            source,
        })?;

        let tmp = self.tmp_path();
        let mut file = File::create(&tmp)?;
        file.write_all(&body)?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), keys = entries.len(), "Store written");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Load, apply `change`, and write back while holding the lock.
    ///
    /// The file is only rewritten when `change` returns `true`.
    fn modify(&self, change: impl FnOnce(&mut Entries) -> bool) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut entries = self.read_all()?;
        if change(&mut entries) {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.modify(|entries| {
            entries.insert(key.to_owned(), value);
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.modify(|entries| entries.remove(key).is_some())
    }

    fn update(
        &self,
        key: &str,
        change: &mut dyn FnMut(Option<String>) -> Option<String>,
    ) -> Result<(), StoreError> {
        self.modify(|entries| match change(entries.get(key).cloned()) {
            Some(next) => {
                entries.insert(key.to_owned(), next);
                true
            }
            None => false,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();
        assert!(store.get("user").unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileStore::open(&path).unwrap();
        store.set("cart", "[]".to_string()).unwrap();
        store.set("user", "{}".to_string()).unwrap();
        store.remove("user").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("cart").unwrap().as_deref(), Some("[]"));
        assert!(reopened.get("user").unwrap().is_none());
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn test_two_handles_share_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let first = FileStore::open(&path).unwrap();
        let second = FileStore::open(&path).unwrap();
        first.set("users", "[]".to_string()).unwrap();

        assert_eq!(second.get("users").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_update_sees_current_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();
        store.set("n", "1".to_string()).unwrap();

        store
            .update("n", &mut |raw| {
                let n: u32 = raw.unwrap().parse().unwrap();
                Some((n + 1).to_string())
            })
            .unwrap();
        store.update("n", &mut |_| None).unwrap();

        assert_eq!(store.get("n").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_corrupt_file_rejected_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::CorruptFile { .. }));
    }
}
