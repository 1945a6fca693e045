// Copyright (C) Microsoft Corporation. All rights reserved.

//! Symmetric cipher handles.
//!
//! A [`CipherHandle`] owns an independent encrypt schedule, decrypt schedule
//! and a chaining IV per direction. Both schedules are derived from the same
//! key but never share mutable state, so an encrypt chain and a decrypt chain
//! on the same handle advance independently.
//!
//! # Supported Algorithms
//!
//! | Algorithm   | Id | Key bytes | Block bytes |
//! |-------------|----|-----------|-------------|
//! | AES-256     | 0  | 32        | 16          |
//! | AES-128     | 1  | 16        | 16          |
//! | 3DES (EDE3) | 2  | 24        | 8           |
//! | DES         | 3  | 8         | 8           |
//! | ARCFOUR-128 | 4  | 16        | stream      |
//! | ARCFOUR-40  | 5  | 5         | stream      |
//! | ARCTWO-40   | 6  | 5         | 8           |
//!
//! # Modes
//!
//! - [`CipherMode::Ecb`]: raw block transform, no chaining
//! - [`CipherMode::Cbc`]: chained through the per-direction IV
//! - [`CipherMode::Stream`]: raw keystream (ARCFOUR)
//!
//! Padding is the caller's responsibility: block cipher input must be a
//! whole number of blocks.

mod cbc;
mod handle;

pub use handle::*;

use super::*;

/// Largest block size any supported cipher may use, and the IV capacity.
pub const MAX_BLOCK_SIZE: usize = 64;

/// Cipher algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CipherAlgo {
    /// AES with a 256-bit key.
    Aes256 = 0,
    /// AES with a 128-bit key.
    Aes128 = 1,
    /// Triple DES with three independent keys.
    Des3 = 2,
    /// Single DES.
    Des = 3,
    /// ARCFOUR with a 128-bit key.
    Arcfour128 = 4,
    /// ARCFOUR with a 40-bit key.
    Arcfour40 = 5,
    /// ARCTWO with a 40-bit key.
    Arctwo40 = 6,
}

impl CipherAlgo {
    /// Every cipher algorithm, in identifier order.
    pub const ALL: [CipherAlgo; 7] = [
        CipherAlgo::Aes256,
        CipherAlgo::Aes128,
        CipherAlgo::Des3,
        CipherAlgo::Des,
        CipherAlgo::Arcfour128,
        CipherAlgo::Arcfour40,
        CipherAlgo::Arctwo40,
    ];

    /// Returns the block size in bytes; 1 for stream ciphers.
    pub fn block_size(self) -> usize {
        match self {
            CipherAlgo::Aes256 | CipherAlgo::Aes128 => 16,
            CipherAlgo::Des3 | CipherAlgo::Des | CipherAlgo::Arctwo40 => 8,
            CipherAlgo::Arcfour128 | CipherAlgo::Arcfour40 => 1,
        }
    }

    /// Returns the required key length in bytes.
    pub fn key_size(self) -> usize {
        match self {
            CipherAlgo::Aes256 => 32,
            CipherAlgo::Aes128 => 16,
            CipherAlgo::Des3 => 24,
            CipherAlgo::Des => 8,
            CipherAlgo::Arcfour128 => 16,
            CipherAlgo::Arcfour40 | CipherAlgo::Arctwo40 => 5,
        }
    }

    /// Returns whether the algorithm is a stream cipher.
    pub fn is_stream(self) -> bool {
        matches!(self, CipherAlgo::Arcfour128 | CipherAlgo::Arcfour40)
    }
}

impl TryFrom<u32> for CipherAlgo {
    type Error = CryptoError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        CipherAlgo::ALL
            .into_iter()
            .find(|algo| *algo as u32 == id)
            .ok_or(CryptoError::UnsupportedAlgorithm)
    }
}

/// Cipher block mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum CipherMode {
    /// Raw block transform without chaining.
    Ecb = 0,
    /// Cipher block chaining.
    Cbc = 1,
    /// Raw keystream.
    Stream = 2,
}

impl TryFrom<u32> for CipherMode {
    type Error = CryptoError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(CipherMode::Ecb),
            1 => Ok(CipherMode::Cbc),
            2 => Ok(CipherMode::Stream),
            _ => Err(CryptoError::UnsupportedMode),
        }
    }
}
