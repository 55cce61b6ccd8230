use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::error::{storage_err, ConfigStoreError, StoreResult};

/// Byte-addressable persistence used by a config store.
///
/// Implementations only move bytes; locking and encryption live in the store.
pub trait Backend: Send + Sync {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Create an empty entry at `path`.
    fn create(&self, path: &Path) -> StoreResult<()>;

    /// Read the full contents at `path`.
    fn read_all(&self, path: &Path) -> StoreResult<Vec<u8>>;

    /// Replace the full contents at `path`.
    fn write_all(&self, path: &Path, bytes: &[u8]) -> StoreResult<()>;
}

/// In-memory backend for tests and ephemeral sessions.
/// Clones share the same underlying map.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBackend {
    inner: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the bytes currently held for `path`.
    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        self.inner.lock().ok()?.get(path).cloned()
    }

    /// Overwrite `path` directly, bypassing any store.
    pub fn set_contents(&self, path: &Path, bytes: Vec<u8>) -> StoreResult<()> {
        let mut map = self.lock()?;
        map.insert(path.to_path_buf(), bytes);
        Ok(())
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, HashMap<PathBuf, Vec<u8>>>> {
        self.inner
            .lock()
            .map_err(|err| storage_err(format!("lock poisoned: {err}")))
    }
}

impl Backend for InMemoryBackend {
    fn exists(&self, path: &Path) -> bool {
        self.inner
            .lock()
            .map(|map| map.contains_key(path))
            .unwrap_or(false)
    }

    fn create(&self, path: &Path) -> StoreResult<()> {
        let mut map = self.lock()?;
        map.entry(path.to_path_buf()).or_default();
        Ok(())
    }

    fn read_all(&self, path: &Path) -> StoreResult<Vec<u8>> {
        let map = self.lock()?;
        map.get(path)
            .cloned()
            .ok_or_else(|| ConfigStoreError::Storage {
                reason: format!("no such entry: {}", path.display()),
            })
    }

    fn write_all(&self, path: &Path, bytes: &[u8]) -> StoreResult<()> {
        let mut map = self.lock()?;
        map.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_makes_empty_entry_and_keeps_existing_bytes() {
        let backend = InMemoryBackend::new();
        let path = Path::new("settings.dat");
        assert!(!backend.exists(path));

        backend.create(path).expect("create should succeed");
        assert!(backend.exists(path));
        assert_eq!(backend.read_all(path).expect("read"), Vec::<u8>::new());

        backend.write_all(path, b"frame").expect("write");
        backend.create(path).expect("create again");
        assert_eq!(backend.read_all(path).expect("read"), b"frame".to_vec());
    }

    #[test]
    fn write_all_replaces_previous_contents() {
        let backend = InMemoryBackend::new();
        let path = Path::new("settings.dat");
        backend.write_all(path, b"a longer first value").expect("write");
        backend.write_all(path, b"short").expect("write");
        assert_eq!(backend.contents(path), Some(b"short".to_vec()));
    }

    #[test]
    fn read_missing_entry_is_a_storage_error() {
        let backend = InMemoryBackend::new();
        let err = backend
            .read_all(Path::new("missing.dat"))
            .expect_err("missing entry should fail");
        assert!(matches!(err, ConfigStoreError::Storage { .. }));
    }

    #[test]
    fn clones_share_state() {
        let backend = InMemoryBackend::new();
        let other = backend.clone();
        let path = Path::new("shared.dat");
        other.set_contents(path, vec![1, 2, 3]).expect("set");
        assert_eq!(backend.contents(path), Some(vec![1, 2, 3]));
    }
}
