// Copyright (C) Microsoft Corporation. All rights reserved.

//! Cipher block chaining over a raw block transform.
//!
//! The helpers take a single-block transform closure, so any provider's
//! ECB transform can be chained. The IV slice is advanced in place to the
//! last ciphertext block, ready for the next call.

use super::*;

/// CBC-encrypts `data` in place.
///
/// # Arguments
///
/// * `iv` - Chaining value, exactly one block long; updated in place
/// * `data` - Whole blocks of plaintext, replaced by ciphertext
/// * `block` - Raw transform applied to one block in place
pub(crate) fn cbc_encrypt<F>(
    iv: &mut [u8],
    data: &mut [u8],
    mut block: F,
) -> Result<(), CryptoError>
where
    F: FnMut(&mut [u8]) -> Result<(), CryptoError>,
{
    let block_size = iv.len();
    if block_size == 0 || data.len() % block_size != 0 {
        Err(CryptoError::InvalidInputSize)?;
    }

    for chunk in data.chunks_exact_mut(block_size) {
        chunk.iter_mut().zip(iv.iter()).for_each(|(d, v)| *d ^= v);
        block(chunk)?;
        iv.copy_from_slice(chunk);
    }
    Ok(())
}

/// CBC-decrypts `data` in place.
///
/// # Arguments
///
/// * `iv` - Chaining value, exactly one block long; updated in place
/// * `data` - Whole blocks of ciphertext, replaced by plaintext
/// * `block` - Raw inverse transform applied to one block in place
pub(crate) fn cbc_decrypt<F>(
    iv: &mut [u8],
    data: &mut [u8],
    mut block: F,
) -> Result<(), CryptoError>
where
    F: FnMut(&mut [u8]) -> Result<(), CryptoError>,
{
    let block_size = iv.len();
    if block_size == 0 || data.len() % block_size != 0 {
        Err(CryptoError::InvalidInputSize)?;
    }

    let mut saved = [0u8; MAX_BLOCK_SIZE];
    let saved = &mut saved[..block_size];
    for chunk in data.chunks_exact_mut(block_size) {
        saved.copy_from_slice(chunk);
        block(chunk)?;
        chunk.iter_mut().zip(iv.iter()).for_each(|(d, v)| *d ^= v);
        iv.copy_from_slice(saved);
    }
    Ok(())
}
