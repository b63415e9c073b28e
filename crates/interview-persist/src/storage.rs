use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{PersistError, Result};

/// String key/value storage with browser-storage semantics
///
/// Implementations are synchronous; callers decide whether a failure matters.
pub trait KeyValueStorage: Send + Sync {
    /// Read a value, `None` when the key was never written
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write (or overwrite) a value
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; deleting a missing key is not an error
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-process storage, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStorage {
    store: RwLock<HashMap<String, String>>,
    disabled: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail, as a browser does with storage turned off
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.store.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_enabled(&self) -> Result<()> {
        if self.disabled.load(Ordering::SeqCst) {
            return Err(PersistError::Unavailable("storage is disabled".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.check_enabled()?;
        let store = self
            .store
            .read()
            .map_err(|_| PersistError::Internal("storage lock poisoned".to_string()))?;
        Ok(store.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.check_enabled()?;
        let mut store = self
            .store
            .write()
            .map_err(|_| PersistError::Internal("storage lock poisoned".to_string()))?;
        store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.check_enabled()?;
        let mut store = self
            .store
            .write()
            .map_err(|_| PersistError::Internal("storage lock poisoned".to_string()))?;
        store.remove(key);
        Ok(())
    }
}

/// Directory-backed storage: one file per key
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() {
            return Err(PersistError::InvalidKey("empty key".to_string()));
        }
        Ok(self.root.join(format!("{}.json", encode_key(key))))
    }
}

/// Keys become file names: `[A-Za-z0-9_-]` are kept, everything else is hex-escaped
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' | b'-' => out.push(byte as char),
            other => out.push_str(&format!("%{:02X}", other)),
        }
    }
    out
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        tracing::trace!("Wrote storage key {} to {}", key, path.display());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k").unwrap(), None);

        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));

        storage.remove_item("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_disabled_memory_storage_fails() {
        let storage = MemoryStorage::new();
        storage.set_disabled(true);

        assert!(matches!(
            storage.set_item("k", "v"),
            Err(PersistError::Unavailable(_))
        ));
        assert!(storage.get_item("k").is_err());
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get_item("golden_interview:abc").unwrap(), None);
        storage.set_item("golden_interview:abc", "{\"a\":1}").unwrap();
        assert_eq!(
            storage.get_item("golden_interview:abc").unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        storage.remove_item("golden_interview:abc").unwrap();
        storage.remove_item("golden_interview:abc").unwrap();
        assert_eq!(storage.get_item("golden_interview:abc").unwrap(), None);
    }

    #[test]
    fn test_file_storage_rejects_empty_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(storage.get_item(""), Err(PersistError::InvalidKey(_))));
    }

    #[test]
    fn test_key_encoding_is_collision_free_for_separators() {
        assert_ne!(encode_key("a:b"), encode_key("a_b"));
        assert_eq!(encode_key("a:b"), "a%3Ab");
        assert_eq!(encode_key("../etc"), "%2E%2E%2Fetc");
    }
}
