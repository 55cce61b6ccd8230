use serde::{de::DeserializeOwned, Serialize};

use crate::error::{serialization_err, StoreResult};

/// Turns a configuration value into bytes and back.
///
/// The store never inspects the payload; any deterministic byte format works.
pub trait Codec: Send + Sync {
    /// Short name used for logging.
    fn name(&self) -> &'static str;

    fn encode<T: Serialize>(&self, value: &T) -> StoreResult<Vec<u8>>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> StoreResult<T>;
}

/// Compact JSON via `serde_json`. Default codec for stores.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode<T: Serialize>(&self, value: &T) -> StoreResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(serialization_err)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> StoreResult<T> {
        serde_json::from_slice(bytes).map_err(serialization_err)
    }
}

/// Indented JSON. Reads anything `JsonCodec` writes and vice versa.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrettyJsonCodec;

impl Codec for PrettyJsonCodec {
    fn name(&self) -> &'static str {
        "json-pretty"
    }

    fn encode<T: Serialize>(&self, value: &T) -> StoreResult<Vec<u8>> {
        serde_json::to_vec_pretty(value).map_err(serialization_err)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> StoreResult<T> {
        serde_json::from_slice(bytes).map_err(serialization_err)
    }
}

/// TOML via the `toml` crate. The top-level value must serialize as a table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TomlCodec;

impl Codec for TomlCodec {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn encode<T: Serialize>(&self, value: &T) -> StoreResult<Vec<u8>> {
        toml::to_string(value)
            .map(String::into_bytes)
            .map_err(serialization_err)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> StoreResult<T> {
        let text = std::str::from_utf8(bytes).map_err(serialization_err)?;
        toml::from_str(text).map_err(serialization_err)
    }
}
