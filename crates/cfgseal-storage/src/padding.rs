//! PKCS#7-style block padding.
//!
//! `pad` always appends between 1 and `block_size` bytes, each holding the pad
//! length, so block-aligned input still gains a full block. `unpad` checks every
//! pad byte instead of trusting the last one.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaddingError {
    #[error("padded buffer is empty")]
    Empty,
    #[error("buffer length {len} is not a multiple of the block size {block_size}")]
    Misaligned { len: usize, block_size: usize },
    #[error("pad length {pad} is out of range for block size {block_size}")]
    OutOfRange { pad: usize, block_size: usize },
    #[error("pad bytes do not all equal {pad}")]
    Inconsistent { pad: usize },
}

/// Append PKCS#7 padding. `block_size` must be in `1..=255`.
pub fn pad(mut data: Vec<u8>, block_size: usize) -> Vec<u8> {
    debug_assert!((1..=255).contains(&block_size));
    let pad = block_size - data.len() % block_size;
    data.resize(data.len() + pad, pad as u8);
    data
}

/// Strip and validate PKCS#7 padding.
pub fn unpad(data: &[u8], block_size: usize) -> Result<&[u8], PaddingError> {
    let len = data.len();
    let last = *data.last().ok_or(PaddingError::Empty)?;
    if len % block_size != 0 {
        return Err(PaddingError::Misaligned { len, block_size });
    }

    let pad = usize::from(last);
    if pad == 0 || pad > block_size || pad > len {
        return Err(PaddingError::OutOfRange { pad, block_size });
    }

    let (body, tail) = data.split_at(len - pad);
    if tail.iter().any(|&b| b != last) {
        return Err(PaddingError::Inconsistent { pad });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: usize = 16;

    #[test]
    fn pad_unpad_identity_around_block_boundary() {
        for len in [0, BLOCK - 1, BLOCK, BLOCK + 1] {
            let data: Vec<u8> = (0..len as u8).collect();
            let padded = pad(data.clone(), BLOCK);
            assert_eq!(padded.len() % BLOCK, 0, "len {len}");
            assert!(padded.len() > data.len(), "len {len}");
            assert_eq!(unpad(&padded, BLOCK).expect("unpad"), data.as_slice());
        }
    }

    #[test]
    fn aligned_input_gets_a_full_block() {
        let padded = pad(vec![0xAA; BLOCK], BLOCK);
        assert_eq!(padded.len(), 2 * BLOCK);
        assert!(padded[BLOCK..].iter().all(|&b| b == BLOCK as u8));
    }

    #[test]
    fn empty_input_pads_to_one_block() {
        assert_eq!(pad(Vec::new(), BLOCK), vec![BLOCK as u8; BLOCK]);
    }

    #[test]
    fn rejects_empty_buffer() {
        assert_eq!(unpad(&[], BLOCK), Err(PaddingError::Empty));
    }

    #[test]
    fn rejects_misaligned_buffer() {
        let err = unpad(&[1u8; 17], BLOCK).expect_err("misaligned");
        assert_eq!(err, PaddingError::Misaligned { len: 17, block_size: BLOCK });
    }

    #[test]
    fn rejects_zero_and_oversized_pad() {
        let mut block = [3u8; BLOCK];
        block[BLOCK - 1] = 0;
        assert!(matches!(
            unpad(&block, BLOCK),
            Err(PaddingError::OutOfRange { pad: 0, .. })
        ));

        block[BLOCK - 1] = 17;
        assert!(matches!(
            unpad(&block, BLOCK),
            Err(PaddingError::OutOfRange { pad: 17, .. })
        ));
    }

    #[test]
    fn rejects_inconsistent_pad_bytes() {
        let mut padded = pad(b"hello".to_vec(), BLOCK);
        let idx = padded.len() - 2;
        padded[idx] ^= 0x01;
        assert_eq!(
            unpad(&padded, BLOCK),
            Err(PaddingError::Inconsistent { pad: 11 })
        );
    }
}
