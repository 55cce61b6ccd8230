//! Encrypted single-file config storage.
//! Values are serialized, PKCS#7 padded and AES-CBC encrypted under a fresh IV,
//! then written as `IV || ciphertext`. Confidentiality only: there is no MAC.

pub mod cipher;
pub mod config_store;
pub mod file_backend;
pub mod frame;
pub mod key;
pub mod options;
pub mod padding;

pub use config_store::{EncryptedConfigStore, LoadOutcome};
pub use file_backend::FileBackend;
pub use key::{KeyMaterial, KeySize};
pub use options::{StoreOptions, WriteMode};
