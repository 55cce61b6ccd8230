use std::fmt;

use base64::{engine::general_purpose, Engine as _};
use cfgseal_core::error::{ConfigStoreError, StoreResult};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// AES strength selected by the key length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySize {
    Aes128,
    Aes192,
    Aes256,
}

impl KeySize {
    pub fn from_len(len: usize) -> StoreResult<Self> {
        match len {
            16 => Ok(KeySize::Aes128),
            24 => Ok(KeySize::Aes192),
            32 => Ok(KeySize::Aes256),
            len => Err(ConfigStoreError::InvalidKeyLength { len }),
        }
    }

    pub fn key_len(self) -> usize {
        match self {
            KeySize::Aes128 => 16,
            KeySize::Aes192 => 24,
            KeySize::Aes256 => 32,
        }
    }

    pub fn bits(self) -> usize {
        self.key_len() * 8
    }
}

/// Symmetric key used for encryption at rest.
///
/// Bytes are wiped on drop and never printed (Debug shows the size only).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    bytes: Vec<u8>,
}

impl KeyMaterial {
    /// Validate raw key bytes. Only 16, 24 and 32 byte keys are accepted.
    pub fn new(bytes: impl Into<Vec<u8>>) -> StoreResult<Self> {
        let mut bytes = bytes.into();
        if let Err(err) = KeySize::from_len(bytes.len()) {
            bytes.zeroize();
            return Err(err);
        }
        Ok(Self { bytes })
    }

    /// Use the UTF-8 bytes of `secret` as the key, e.g. `"0123456789abcdef"`.
    pub fn from_passphrase(secret: &str) -> StoreResult<Self> {
        Self::new(secret.as_bytes())
    }

    /// Decode a standard base64 key.
    pub fn from_base64(encoded: &str) -> StoreResult<Self> {
        let bytes = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| ConfigStoreError::Crypto {
                reason: format!("key decode failed: {e}"),
            })?;
        Self::new(bytes)
    }

    /// Standard base64 form of the key, for handing to a secret manager.
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }

    pub fn size(&self) -> KeySize {
        match self.bytes.len() {
            16 => KeySize::Aes128,
            24 => KeySize::Aes192,
            _ => KeySize::Aes256,
        }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("size", &self.size())
            .finish_non_exhaustive()
    }
}

impl TryFrom<&[u8]> for KeyMaterial {
    type Error = ConfigStoreError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

impl TryFrom<Vec<u8>> for KeyMaterial {
    type Error = ConfigStoreError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

impl TryFrom<&str> for KeyMaterial {
    type Error = ConfigStoreError;

    fn try_from(secret: &str) -> Result<Self, Self::Error> {
        Self::from_passphrase(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_aes_key_lengths() {
        for (len, size) in [
            (16, KeySize::Aes128),
            (24, KeySize::Aes192),
            (32, KeySize::Aes256),
        ] {
            let key = KeyMaterial::new(vec![7u8; len]).expect("valid key");
            assert_eq!(key.size(), size);
            assert_eq!(key.size().key_len(), len);
        }
        assert_eq!(KeySize::Aes256.bits(), 256);
    }

    #[test]
    fn rejects_other_lengths() {
        for len in [0, 1, 15, 17, 23, 25, 31, 33, 64] {
            let err = KeyMaterial::new(vec![0u8; len]).expect_err("should reject");
            assert_eq!(err, ConfigStoreError::InvalidKeyLength { len });
        }
    }

    #[test]
    fn passphrase_uses_utf8_bytes() {
        let key = KeyMaterial::from_passphrase("0123456789abcdef").expect("16 chars");
        assert_eq!(key.as_bytes(), b"0123456789abcdef");
        assert_eq!(key.size(), KeySize::Aes128);

        let err = KeyMaterial::try_from("short").expect_err("should reject");
        assert_eq!(err, ConfigStoreError::InvalidKeyLength { len: 5 });
    }

    #[test]
    fn base64_round_trips() {
        let key = KeyMaterial::new([42u8; 32]).expect("valid key");
        let decoded = KeyMaterial::from_base64(&key.to_base64()).expect("decode");
        assert_eq!(decoded.as_bytes(), key.as_bytes());
    }

    #[test]
    fn base64_rejects_garbage_and_wrong_length() {
        let err = KeyMaterial::from_base64("not base64!").expect_err("should reject");
        assert!(matches!(err, ConfigStoreError::Crypto { .. }));

        let err = KeyMaterial::from_base64("abcd").expect_err("should reject length");
        assert_eq!(err, ConfigStoreError::InvalidKeyLength { len: 3 });
    }

    #[test]
    fn debug_output_hides_key_bytes() {
        let key = KeyMaterial::from_passphrase("0123456789abcdef").expect("valid key");
        let rendered = format!("{key:?}");
        assert!(rendered.contains("Aes128"));
        assert!(!rendered.contains("0123456789abcdef"));
    }
}
