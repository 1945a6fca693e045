// Copyright (C) Microsoft Corporation. All rights reserved.

//! Complete primitive provider.

use super::*;

/// A complete primitive provider.
///
/// Bundles the cipher and hash providers with the process-wide, one-time
/// initialization the library runs before the first handle is opened.
pub trait Backend: CipherBackend + HashBackend + Sized + 'static {
    /// Human readable provider name used in diagnostics.
    const NAME: &'static str;

    /// Returns the version string reported by the underlying implementation.
    fn version() -> &'static str;

    /// Initializes the provider.
    ///
    /// Implementations run their setup at most once per process and return
    /// the memoized outcome on every later call.
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailure` if setup, the version check or the
    /// known-answer self test fails.
    fn initialize() -> Result<(), CryptoError>;
}
