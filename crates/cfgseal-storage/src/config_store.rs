use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use cfgseal_core::{
    codec::{Codec, JsonCodec},
    error::{ConfigStoreError, StoreResult},
    storage::Backend,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument, warn};
use zeroize::Zeroizing;

use crate::{
    cipher,
    file_backend::FileBackend,
    frame::Frame,
    key::{KeyMaterial, KeySize},
    options::StoreOptions,
};

/// A single configuration value persisted to one file, AES-CBC encrypted at rest.
///
/// `save` and `load` hold the store's lock for their whole pipeline, so callers
/// sharing one store (e.g. through `Arc`) never observe a torn frame. Separate
/// processes writing the same file are not coordinated.
///
/// The lock guards no data, so a panic inside a codec or `Serialize` impl does
/// not wedge the store: the next call takes the lock over and carries on.
pub struct EncryptedConfigStore<T, C = JsonCodec, B = FileBackend> {
    path: PathBuf,
    key: KeyMaterial,
    codec: C,
    backend: B,
    lock: Mutex<()>,
    _value: PhantomData<fn() -> T>,
}

/// Result of `load_or_default`: the decoded value, or the caller's fallback
/// together with the reason it was used.
#[derive(Debug)]
#[must_use]
pub struct LoadOutcome<T> {
    pub value: T,
    pub error: Option<ConfigStoreError>,
}

impl<T> LoadOutcome<T> {
    pub fn into_parts(self) -> (T, Option<ConfigStoreError>) {
        (self.value, self.error)
    }

    /// Drop the fallback and surface the error, if any.
    pub fn into_result(self) -> StoreResult<T> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.value),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

impl<T> EncryptedConfigStore<T, JsonCodec, FileBackend>
where
    T: Serialize + DeserializeOwned,
{
    /// Open the store at `path`, creating an empty file if none exists.
    ///
    /// `key` must be 16, 24 or 32 bytes; it is checked before the file system
    /// is touched.
    pub fn open(path: impl Into<PathBuf>, key: impl AsRef<[u8]>) -> StoreResult<Self> {
        Self::open_with_options(path, key, &StoreOptions::default())
    }

    pub fn open_with_options(
        path: impl Into<PathBuf>,
        key: impl AsRef<[u8]>,
        options: &StoreOptions,
    ) -> StoreResult<Self> {
        let key = KeyMaterial::new(key.as_ref())?;
        Self::with_backend(path, key, JsonCodec, FileBackend::from_options(options))
    }
}

impl<T, C, B> EncryptedConfigStore<T, C, B>
where
    T: Serialize + DeserializeOwned,
    C: Codec,
    B: Backend,
{
    /// Build a store over any backend and codec.
    pub fn with_backend(
        path: impl Into<PathBuf>,
        key: KeyMaterial,
        codec: C,
        backend: B,
    ) -> StoreResult<Self> {
        let path = path.into();
        if !backend.exists(&path) {
            backend.create(&path)?;
        }
        debug!(
            path = %path.display(),
            key_size = ?key.size(),
            codec = codec.name(),
            "opened config store"
        );

        Ok(Self {
            path,
            key,
            codec,
            backend,
            lock: Mutex::new(()),
            _value: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key_size(&self) -> KeySize {
        self.key.size()
    }

    /// Encrypt `value` under a fresh IV and overwrite the backing file.
    ///
    /// If the write fails part way the file contents are undefined; save again.
    #[instrument(skip_all, fields(path = %self.path.display(), codec = self.codec.name()))]
    pub fn save(&self, value: &T) -> StoreResult<()> {
        let _guard = self.acquire();

        let payload = Zeroizing::new(self.codec.encode(value)?);
        let iv = cipher::generate_iv()?;
        let ciphertext = cipher::encrypt(&self.key, &iv, &payload)?;
        let frame = Frame::new(iv, ciphertext).encode();

        self.backend.write_all(&self.path, &frame)?;
        debug!(bytes = frame.len(), "saved config");
        Ok(())
    }

    /// Read, decrypt and decode the stored value.
    #[instrument(skip_all, fields(path = %self.path.display(), codec = self.codec.name()))]
    pub fn load(&self) -> StoreResult<T> {
        let _guard = self.acquire();

        let bytes = self.backend.read_all(&self.path)?;
        let frame = Frame::decode(&bytes)?;
        let plaintext = cipher::decrypt(&self.key, &frame.iv, &frame.ciphertext)?;
        let value = self.codec.decode(&plaintext)?;

        debug!(bytes = bytes.len(), "loaded config");
        Ok(value)
    }

    /// Load the stored value, or hand back `fallback` with the reason.
    ///
    /// A never-saved store yields `InvalidFrame { len: 0 }`
    /// (`ConfigStoreError::is_uninitialized`), which callers usually treat as
    /// "first run" rather than corruption.
    pub fn load_or_default(&self, fallback: T) -> LoadOutcome<T> {
        match self.load() {
            Ok(value) => LoadOutcome { value, error: None },
            Err(err) => {
                if err.is_uninitialized() {
                    debug!(path = %self.path.display(), "no saved config yet, using fallback");
                } else {
                    warn!(path = %self.path.display(), error = %err, "using fallback config");
                }
                LoadOutcome {
                    value: fallback,
                    error: Some(err),
                }
            }
        }
    }

    fn acquire(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T, C, B> std::fmt::Debug for EncryptedConfigStore<T, C, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedConfigStore")
            .field("path", &self.path)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
