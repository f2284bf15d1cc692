//! Key-value blob storage
//!
//! Features:
//! - Whole-value replace per key (no partial or field-level updates)
//! - In-memory store for tests and ephemeral servers
//! - On-disk store with tmp-then-rename writes so readers never see a torn blob
//!
//! There is no compare-and-swap: concurrent read-modify-write cycles can lose
//! an update (last write wins).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StoreError;

/// A string blob store keyed by name
pub trait BlobStore {
    /// Read a blob; `Ok(None)` if absent
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Replace a blob
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))?;
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        log::info!("Blob store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are fixed names; keep anything path-like out of the file name
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };
        std::fs::write(&tmp, value).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "wheeliepoppers-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryBlobStore::new();
        assert_eq!(store.get("leaderboard").unwrap(), None);
        store.set("leaderboard", "[]").unwrap();
        assert_eq!(store.get("leaderboard").unwrap().as_deref(), Some("[]"));
        store.set("leaderboard", "[1]").unwrap();
        assert_eq!(store.get("leaderboard").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_file_store_replaces_whole_value() {
        let dir = scratch_dir("file-store");
        let store = FileBlobStore::open(&dir).unwrap();
        assert_eq!(store.get("leaderboard").unwrap(), None);

        store.set("leaderboard", r#"[{"a":1}]"#).unwrap();
        store.set("leaderboard", "[]").unwrap();
        assert_eq!(store.get("leaderboard").unwrap().as_deref(), Some("[]"));
        assert!(!dir.join("leaderboard.json.tmp").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_store_sanitizes_keys() {
        let dir = scratch_dir("sanitize");
        let store = FileBlobStore::open(&dir).unwrap();
        store.set("../escape", "x").unwrap();
        assert!(dir.join("___escape.json").exists());
        assert_eq!(store.get("../escape").unwrap().as_deref(), Some("x"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
