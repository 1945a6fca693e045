// Copyright (C) Microsoft Corporation. All rights reserved.

//! Hash and HMAC handles.
//!
//! A [`HashHandle`] owns a running digest state and a fixed digest buffer.
//! In HMAC mode it also owns precomputed inner and outer pad states derived
//! from the key, so every message authenticated with that key skips the
//! pad compression.
//!
//! # Supported Hash Functions
//!
//! | Algorithm | Id | Digest bytes | Notes                 |
//! |-----------|----|--------------|-----------------------|
//! | MD5       | 0  | 16           |                       |
//! | SHA-1     | 1  | 20           |                       |
//! | RMD160    | 2  | 20           | reserved, not openable |
//!
//! # Streaming
//!
//! `write` may be called any number of times; `read` finalizes a copy of the
//! running state, so a handle can be read, written further and read again.
//! [`HashHandle::try_clone`] snapshots a message prefix for two independent
//! continuations.

mod handle;

pub use handle::*;

use super::*;

/// Largest digest any supported hash produces.
pub const MAX_DIGEST_SIZE: usize = 20;

/// Input block size shared by every supported hash.
pub const HASH_BLOCK_SIZE: usize = 64;

/// Hash algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum HashAlgo {
    /// MD5.
    Md5 = 0,
    /// SHA-1.
    Sha1 = 1,
    /// RIPEMD-160, reserved.
    Rmd160 = 2,
}

impl HashAlgo {
    /// Returns the digest size in bytes.
    pub fn digest_size(self) -> usize {
        match self {
            HashAlgo::Md5 => 16,
            HashAlgo::Sha1 | HashAlgo::Rmd160 => 20,
        }
    }

    /// Returns the input block size in bytes.
    pub fn block_size(self) -> usize {
        HASH_BLOCK_SIZE
    }
}

impl TryFrom<u32> for HashAlgo {
    type Error = CryptoError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(HashAlgo::Md5),
            1 => Ok(HashAlgo::Sha1),
            2 => Ok(HashAlgo::Rmd160),
            _ => Err(CryptoError::UnsupportedAlgorithm),
        }
    }
}

/// Hash handle mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum HashMode {
    /// Plain message digest.
    Plain = 0,
    /// Keyed HMAC.
    Hmac = 1,
}

impl TryFrom<u32> for HashMode {
    type Error = CryptoError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(HashMode::Plain),
            1 => Ok(HashMode::Hmac),
            _ => Err(CryptoError::HashInvalidMode),
        }
    }
}

/// Returns the digest length for a numeric hash identifier.
///
/// Unknown identifiers report 0 rather than an error.
pub fn hash_digest_length(id: u32) -> usize {
    HashAlgo::try_from(id).map_or(0, HashAlgo::digest_size)
}

#[cfg(test)]
pub(crate) mod tests;
