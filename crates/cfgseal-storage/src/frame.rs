use cfgseal_core::error::{ConfigStoreError, StoreResult};

use crate::cipher::{Iv, BLOCK_SIZE};

/// On-disk layout: `IV (16 bytes) || ciphertext`. No magic, version or tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub iv: Iv,
    pub ciphertext: Vec<u8>,
}

impl Frame {
    pub fn new(iv: Iv, ciphertext: Vec<u8>) -> Self {
        Self { iv, ciphertext }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(BLOCK_SIZE + self.ciphertext.len());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Split persisted bytes into IV and ciphertext.
    ///
    /// Anything shorter than one block is an `InvalidFrame`; ciphertext
    /// alignment is checked later by the cipher.
    pub fn decode(bytes: &[u8]) -> StoreResult<Self> {
        if bytes.len() < BLOCK_SIZE {
            return Err(ConfigStoreError::InvalidFrame { len: bytes.len() });
        }
        let (iv, ciphertext) = bytes.split_at(BLOCK_SIZE);
        let mut out = [0u8; BLOCK_SIZE];
        out.copy_from_slice(iv);
        Ok(Self {
            iv: out,
            ciphertext: ciphertext.to_vec(),
        })
    }
}
