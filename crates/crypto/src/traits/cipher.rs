// Copyright (C) Microsoft Corporation. All rights reserved.

//! Cipher provider trait.

use super::*;

/// Direction a cipher schedule is derived for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherDirection {
    /// Schedule used by encrypt transforms.
    Encrypt,
    /// Schedule used by decrypt transforms.
    Decrypt,
}

/// Trait for symmetric cipher providers.
///
/// A provider derives one opaque schedule per direction from a key and
/// applies the algorithm's raw transform in place. For block ciphers the raw
/// transform is the electronic codebook transform over whole blocks; for
/// stream ciphers it XORs the keystream and advances the schedule.
///
/// # Implementation Requirements
///
/// Implementors must:
/// - Reject key lengths the algorithm cannot use with `InvalidKeyLength`
/// - Reject algorithms they do not provide with `UnsupportedAlgorithm`
/// - Keep output length equal to input length
/// - Never share mutable state between two schedules
pub trait CipherBackend {
    /// Keyed state for one direction of one algorithm.
    type Schedule;

    /// Returns whether this backend provides `algo`.
    ///
    /// Handles consult this before admitting any memory, so an unsupported
    /// algorithm fails `open` without touching the allocator.
    fn is_supported(algo: CipherAlgo) -> bool;

    /// Returns the size in bytes of a schedule for `algo`.
    ///
    /// This is the amount requested from the allocator when a handle reserves
    /// room for one direction.
    fn schedule_size(algo: CipherAlgo) -> usize;

    /// Derives a schedule for `algo` from `key`.
    ///
    /// # Arguments
    ///
    /// * `algo` - The cipher algorithm
    /// * `direction` - Whether the schedule encrypts or decrypts
    /// * `key` - Raw key bytes
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The algorithm is not provided by this backend
    /// - The key length is not valid for the algorithm
    /// - The underlying key setup fails
    fn schedule(
        algo: CipherAlgo,
        direction: CipherDirection,
        key: &[u8],
    ) -> Result<Self::Schedule, CryptoError>;

    /// Applies the raw encrypt transform to `data` in place.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputSize` for block ciphers when `data` is not a
    /// multiple of the block size, or `CipherError` if the transform fails.
    fn encrypt(schedule: &mut Self::Schedule, data: &mut [u8]) -> Result<(), CryptoError>;

    /// Applies the raw decrypt transform to `data` in place.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputSize` for block ciphers when `data` is not a
    /// multiple of the block size, or `CipherError` if the transform fails.
    fn decrypt(schedule: &mut Self::Schedule, data: &mut [u8]) -> Result<(), CryptoError>;
}
