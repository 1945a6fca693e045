// Copyright (C) Microsoft Corporation. All rights reserved.

//! Primitive providers.
//!
//! A provider implements [`CipherBackend`], [`HashBackend`] and [`Backend`]
//! for a fixed, closed set of algorithms. The handle layer never touches the
//! math; it only asks a provider for schedules and states and threads data
//! through them.
//!
//! # Providers
//!
//! - [`RustCryptoBackend`]: always available
//! - `OsslBackend`: available with the `use-openssl` feature
//!
//! HMAC comes from each provider. RustCrypto uses the `hmac` crate. OpenSSL
//! has no duplicable MAC context, so it builds the RFC 2104 construction
//! from its own digest states in `pad_mac`.
//!
//! [`DefaultBackend`] resolves to OpenSSL when the feature is enabled and to
//! RustCrypto otherwise.

use super::*;

mod rustcrypto;

pub use rustcrypto::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "use-openssl")] {
        mod ossl;
        mod pad_mac;
        pub use ossl::*;
        pub use pad_mac::*;
    } else if #[cfg(test)] {
        mod pad_mac;
        pub use pad_mac::*;
    }
}

define_type!(pub DefaultBackend, OsslBackend, RustCryptoBackend);
