use thiserror::Error;

/// Errors produced while opening, saving or loading an encrypted config store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigStoreError {
    /// Key is not 16, 24 or 32 bytes long.
    #[error("key length must be 16, 24 or 32 bytes, got {len}")]
    InvalidKeyLength { len: usize },
    /// Backing file could not be created, read or written.
    #[error("storage failure: {reason}")]
    Storage { reason: String },
    /// Entropy source or cipher setup failed.
    #[error("crypto failure: {reason}")]
    Crypto { reason: String },
    /// Payload could not be encoded or decoded by the codec.
    #[error("serialization failure: {reason}")]
    Serialization { reason: String },
    /// Persisted content is shorter than one cipher block.
    #[error("invalid frame: {len} bytes is shorter than one cipher block")]
    InvalidFrame { len: usize },
    /// Ciphertext is misaligned or its padding does not validate.
    #[error("corrupt data: {reason}")]
    CorruptData { reason: String },
}

impl ConfigStoreError {
    /// True when the backing file is empty, i.e. nothing was ever saved.
    pub fn is_uninitialized(&self) -> bool {
        matches!(self, ConfigStoreError::InvalidFrame { len: 0 })
    }

    /// True when persisted bytes exist but cannot be decoded into a frame.
    pub fn is_corrupt(&self) -> bool {
        match self {
            ConfigStoreError::InvalidFrame { len } => *len > 0,
            ConfigStoreError::CorruptData { .. } => true,
            _ => false,
        }
    }
}

pub type StoreResult<T> = Result<T, ConfigStoreError>;

pub fn storage_err<E: ToString>(err: E) -> ConfigStoreError {
    ConfigStoreError::Storage {
        reason: err.to_string(),
    }
}

pub fn serialization_err<E: ToString>(err: E) -> ConfigStoreError {
    ConfigStoreError::Serialization {
        reason: err.to_string(),
    }
}
