//! Core contracts for cfgseal: the error type, payload codecs and the storage backend trait.
//! This crate is intentionally small to keep dependency surface minimal.

pub mod codec;
pub mod error;
pub mod storage;

pub use codec::{Codec, JsonCodec, PrettyJsonCodec, TomlCodec};
pub use error::{ConfigStoreError, StoreResult};
pub use storage::{Backend, InMemoryBackend};
