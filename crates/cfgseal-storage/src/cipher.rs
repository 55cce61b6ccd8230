//! AES-CBC encryption with PKCS#7 padding.
//!
//! Confidentiality only: there is no authentication tag, so a tampered
//! ciphertext that still unpads cleanly decrypts to garbage instead of failing.

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{
    generic_array::GenericArray, BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit,
    KeyIvInit,
};
use cfgseal_core::error::{ConfigStoreError, StoreResult};
use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroizing;

use crate::{
    key::{KeyMaterial, KeySize},
    padding,
};

/// AES block size; also the IV length.
pub const BLOCK_SIZE: usize = 16;

pub type Iv = [u8; BLOCK_SIZE];

/// Fill a fresh IV from the OS CSPRNG.
pub fn generate_iv() -> StoreResult<Iv> {
    let mut iv = [0u8; BLOCK_SIZE];
    OsRng
        .try_fill_bytes(&mut iv)
        .map_err(|e| ConfigStoreError::Crypto {
            reason: format!("entropy source failed: {e}"),
        })?;
    Ok(iv)
}

/// Pad `plaintext` and encrypt it under `key` and `iv`.
///
/// The buffer is sized up front so padding never reallocates; encryption then
/// overwrites the only plaintext copy in place.
pub fn encrypt(key: &KeyMaterial, iv: &Iv, plaintext: &[u8]) -> StoreResult<Vec<u8>> {
    let mut buf = Vec::with_capacity(plaintext.len() + BLOCK_SIZE);
    buf.extend_from_slice(plaintext);
    let mut buf = padding::pad(buf, BLOCK_SIZE);
    match key.size() {
        KeySize::Aes128 => encrypt_blocks::<Aes128>(key.as_bytes(), iv, &mut buf)?,
        KeySize::Aes192 => encrypt_blocks::<Aes192>(key.as_bytes(), iv, &mut buf)?,
        KeySize::Aes256 => encrypt_blocks::<Aes256>(key.as_bytes(), iv, &mut buf)?,
    }
    Ok(buf)
}

/// Decrypt `ciphertext` under `key` and `iv`, then strip and validate padding.
///
/// The plaintext is wiped on drop, including when padding is rejected.
pub fn decrypt(key: &KeyMaterial, iv: &Iv, ciphertext: &[u8]) -> StoreResult<Zeroizing<Vec<u8>>> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(ConfigStoreError::CorruptData {
            reason: format!(
                "ciphertext length {} is not a positive multiple of {BLOCK_SIZE}",
                ciphertext.len()
            ),
        });
    }

    let mut buf = Zeroizing::new(ciphertext.to_vec());
    match key.size() {
        KeySize::Aes128 => decrypt_blocks::<Aes128>(key.as_bytes(), iv, &mut buf)?,
        KeySize::Aes192 => decrypt_blocks::<Aes192>(key.as_bytes(), iv, &mut buf)?,
        KeySize::Aes256 => decrypt_blocks::<Aes256>(key.as_bytes(), iv, &mut buf)?,
    }

    let len = padding::unpad(&buf, BLOCK_SIZE)
        .map_err(|e| ConfigStoreError::CorruptData {
            reason: e.to_string(),
        })?
        .len();
    buf.truncate(len);
    Ok(buf)
}

fn encrypt_blocks<C>(key: &[u8], iv: &Iv, buf: &mut [u8]) -> StoreResult<()>
where
    C: BlockCipher + BlockEncryptMut + KeyInit,
{
    let mut mode = cbc::Encryptor::<C>::new_from_slices(key, iv).map_err(cipher_init_err)?;
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        mode.encrypt_block_mut(GenericArray::from_mut_slice(block));
    }
    Ok(())
}

fn decrypt_blocks<C>(key: &[u8], iv: &Iv, buf: &mut [u8]) -> StoreResult<()>
where
    C: BlockCipher + BlockDecryptMut + KeyInit,
{
    let mut mode = cbc::Decryptor::<C>::new_from_slices(key, iv).map_err(cipher_init_err)?;
    for block in buf.chunks_exact_mut(BLOCK_SIZE) {
        mode.decrypt_block_mut(GenericArray::from_mut_slice(block));
    }
    Ok(())
}

fn cipher_init_err<E: std::fmt::Display>(err: E) -> ConfigStoreError {
    ConfigStoreError::Crypto {
        reason: format!("cipher init failed: {err}"),
    }
}
