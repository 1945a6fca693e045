// Copyright (C) Microsoft Corporation. All rights reserved.

//! Hash provider trait.
//!
//! Hash providers expose the classic init/update/finalize triple over a
//! cloneable running state, and the same triple for keyed HMAC states.
//! Cloning a state is how the hash handles snapshot a message prefix, and
//! cloning a freshly keyed MAC is how they reuse its precomputed inner and
//! outer pad states for every message.

use super::*;

/// Trait for cryptographic hash providers.
///
/// # Implementation Requirements
///
/// Implementors must:
/// - Produce a fresh, independent state from every `init` call
/// - Make `Clone` a deep copy: updating a clone never affects the original
/// - Write exactly [`HashAlgo::digest_size`] bytes in `finish` and
///   `hmac_finish`
/// - Absorb the key pads in `hmac_init`, so a clone of the keyed state
///   starts a new message without rehashing the key
pub trait HashBackend {
    /// Running digest state.
    type State: Clone;

    /// Keyed HMAC state holding the inner and outer pad states.
    type Mac: Clone;

    /// Returns whether this backend provides `algo`.
    fn is_supported(algo: HashAlgo) -> bool;

    /// Returns the size in bytes of a running state for `algo`.
    fn state_size(algo: HashAlgo) -> usize;

    /// Creates a freshly initialized running state.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedAlgorithm` if the backend does not provide `algo`,
    /// or `HashError` if the underlying initialization fails.
    fn init(algo: HashAlgo) -> Result<Self::State, CryptoError>;

    /// Absorbs `data` into the running state.
    ///
    /// # Errors
    ///
    /// Returns `HashError` if the underlying update fails.
    fn update(state: &mut Self::State, data: &[u8]) -> Result<(), CryptoError>;

    /// Consumes a running state and writes its digest to the front of `out`.
    ///
    /// # Returns
    ///
    /// The number of digest bytes written.
    ///
    /// # Errors
    ///
    /// Returns `HashBufferTooSmall` if `out` cannot hold the digest, or
    /// `HashError` if the underlying finalization fails.
    fn finish(state: Self::State, out: &mut [u8]) -> Result<usize, CryptoError>;

    /// Derives a keyed HMAC state for `algo` from `key`.
    ///
    /// Keys longer than the hash block are hashed first (RFC 2104).
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedAlgorithm` if the backend does not provide `algo`,
    /// or `HashError` if keying fails.
    fn hmac_init(algo: HashAlgo, key: &[u8]) -> Result<Self::Mac, CryptoError>;

    /// Absorbs `data` into a keyed HMAC state.
    ///
    /// # Errors
    ///
    /// Returns `HashError` if the underlying update fails.
    fn hmac_update(mac: &mut Self::Mac, data: &[u8]) -> Result<(), CryptoError>;

    /// Consumes a keyed HMAC state and writes the MAC to the front of `out`.
    ///
    /// # Returns
    ///
    /// The number of MAC bytes written.
    ///
    /// # Errors
    ///
    /// Returns `HashBufferTooSmall` if `out` cannot hold the MAC, or
    /// `HashError` if the underlying finalization fails.
    fn hmac_finish(mac: Self::Mac, out: &mut [u8]) -> Result<usize, CryptoError>;
}
