// Copyright (C) Microsoft Corporation. All rights reserved.

//! Handle-based cryptographic primitives layer.
//!
//! This crate exposes a uniform, backend-agnostic API over symmetric ciphers,
//! hash functions, keyed hashes and entropy sources, plus a canonical DER codec
//! for the `(r, s)` pair of DSA/ECDSA signatures. It includes support for:
//!
//! - **Ciphers**: AES-128/256, 3DES, DES, ARCFOUR-40/128 and ARCTWO-40 behind
//!   stateful [`CipherHandle`]s, in raw (ECB/stream) or CBC mode
//! - **Hash**: MD5 and SHA-1 behind stateful [`HashHandle`]s that can be cloned
//!   mid-stream
//! - **HMAC**: keyed mode of the same hash handles, with precomputed inner and
//!   outer pad states
//! - **RNG**: three entropy classes (nonce, pseudo-random, strong-random) read
//!   from configurable OS endpoints
//! - **DER**: `SEQUENCE { INTEGER r, INTEGER s }` encoding and decoding
//!
//! # Lifecycle
//!
//! Everything that allocates starts from a [`CryptoLibrary`], which performs
//! the one-time backend initialization and carries the [`Allocator`]
//! capability every handle is built with.
//!
//! # Backend Support
//!
//! The primitives themselves come from a [`Backend`]:
//! - RustCrypto: pure Rust implementations, the default
//! - OpenSSL: enabled with the `use-openssl` feature

mod backend;
mod cipher;
mod der;
mod hash;
mod library;
mod memory;
mod rand;
mod traits;

pub use backend::*;
pub use cipher::*;
pub use der::*;
pub use hash::*;
pub use library::*;
pub use memory::*;
pub use rand::*;
use thiserror::Error;
pub use traits::*;

/// Comprehensive error type for all cryptographic operations.
///
/// This enum covers errors from handle construction, cipher and hash
/// operations, HMAC keying, entropy collection, the signature codec and
/// library initialization.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    // Lifecycle errors
    /// Backend initialization, self-test or version check failed.
    #[error("Library initialization failed")]
    InitializationFailure,

    // Memory errors
    /// The installed allocator refused a request.
    #[error("Memory allocation failed")]
    AllocationFailure,

    // Algorithm selection errors
    /// The algorithm identifier is unknown or not provided by the backend.
    #[error("Unsupported algorithm")]
    UnsupportedAlgorithm,
    /// The mode is not usable with the selected algorithm.
    #[error("Unsupported mode")]
    UnsupportedMode,

    // Cipher errors
    /// The key length does not match the algorithm.
    #[error("Cipher invalid key length")]
    InvalidKeyLength,
    /// The IV length does not match the algorithm block size.
    #[error("Cipher invalid IV length")]
    InvalidIvLength,
    /// The data length is not a multiple of the algorithm block size.
    #[error("Cipher invalid input size")]
    InvalidInputSize,
    /// A transform was requested before a key was set.
    #[error("Cipher key not set")]
    CipherKeyNotSet,
    /// A CBC transform was requested before an IV was set.
    #[error("Cipher IV not set")]
    CipherIvNotSet,
    /// The backend cipher transform failed.
    #[error("Cipher operation failed")]
    CipherError,

    // Hash errors
    /// The operation is not valid for the handle's hash mode.
    #[error("Hash invalid mode")]
    HashInvalidMode,
    /// The backend hash operation failed.
    #[error("Hashing operation failed")]
    HashError,
    /// Output buffer is too small to hold the digest.
    #[error("Hash buffer too small")]
    HashBufferTooSmall,

    // HMAC errors
    /// Data was written to or read from an HMAC handle before keying it.
    #[error("HMAC key not set")]
    HmacKeyNotSet,

    // Random number generation errors
    /// An entropy endpoint could not be opened, read or closed.
    #[error("Random source failed")]
    RandomSourceError,

    // Signature codec errors
    /// The DER input is not a `SEQUENCE` of two non-negative `INTEGER`s.
    #[error("Malformed DER signature")]
    MalformedSignature,
    /// A signature component is empty.
    #[error("Invalid signature component")]
    InvalidSignatureComponent,
    /// Failed to encode the ASN.1 DER structure.
    #[error("DER ASN.1 encode error")]
    DerEncodeError,
    /// Output buffer is too small for DER-encoded data.
    #[error("DER buffer too small")]
    DerBufferTooSmall,
}

/// Macro for defining backend-specific type aliases.
///
/// This macro creates a type alias resolving to the OpenSSL type when the
/// `use-openssl` feature is enabled and to the RustCrypto type otherwise.
macro_rules! define_type {
    ($vis:vis $name: ident, $ossl_type: ty, $rustcrypto_type: ty) => {
        /// Default type for the selected backend
        #[cfg(feature = "use-openssl")]
        $vis type $name = $ossl_type;

        /// Default type for the selected backend
        #[cfg(not(feature = "use-openssl"))]
        $vis type $name = $rustcrypto_type;
    };
}

pub(crate) use define_type;
