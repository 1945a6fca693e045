// Copyright (C) Microsoft Corporation. All rights reserved.

//! Library lifecycle.
//!
//! A [`CryptoLibrary`] is the capability every allocating operation starts
//! from. Building one runs the backend's one-time initialization and the
//! optional minimum version check, and fixes the allocator and entropy
//! endpoints for its lifetime. Handles opened from it carry the allocator
//! with them and may outlive the library value itself.
//!
//! # Example
//!
//! ```no_run
//! use gc_crypto::*;
//!
//! # fn main() -> Result<(), CryptoError> {
//! let library = CryptoLibrary::builder().required_version("0.1").build()?;
//!
//! let digest = library.sha1(b"abc")?;
//! assert_eq!(digest.len(), 20);
//!
//! let mut key = [0u8; 16];
//! library.random(&mut key)?;
//! let mut aes = library.cipher_open(CipherAlgo::Aes128, CipherMode::Cbc)?;
//! aes.set_key(&key)?;
//! aes.set_iv(&[0u8; 16])?;
//!
//! library.done();
//! # Ok(())
//! # }
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::*;

/// Version of this library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// An initialized library instance bound to backend `B`.
///
/// # Thread Safety
///
/// The library is `Send + Sync`; handles opened from it are independent and
/// may be driven from different threads.
pub struct CryptoLibrary<B: Backend = DefaultBackend> {
    allocator: Arc<dyn Allocator>,
    random_sources: RandomSources,
    _backend: PhantomData<fn() -> B>,
}

/// Configuration for a [`CryptoLibrary`].
pub struct CryptoLibraryBuilder<B: Backend = DefaultBackend> {
    allocator: Arc<dyn Allocator>,
    random_sources: RandomSources,
    required_version: Option<String>,
    _backend: PhantomData<fn() -> B>,
}

impl<B: Backend> Default for CryptoLibraryBuilder<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> CryptoLibraryBuilder<B> {
    /// Creates a builder with the system allocator, the default entropy
    /// endpoints and no version requirement.
    pub fn new() -> Self {
        Self {
            allocator: Arc::new(SystemAllocator),
            random_sources: RandomSources::default(),
            required_version: None,
            _backend: PhantomData,
        }
    }

    /// Sets the allocator every handle is admitted through.
    pub fn allocator(mut self, allocator: Arc<dyn Allocator>) -> Self {
        self.allocator = allocator;
        self
    }

    /// Sets the entropy endpoints.
    pub fn random_sources(mut self, random_sources: RandomSources) -> Self {
        self.random_sources = random_sources;
        self
    }

    /// Requires at least `version` of this library.
    pub fn required_version(mut self, version: &str) -> Self {
        self.required_version = Some(version.to_owned());
        self
    }

    /// Checks the version requirement and initializes the backend.
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailure` if the library is older than the
    /// required version or the backend fails to initialize.
    pub fn build(self) -> Result<CryptoLibrary<B>, CryptoError> {
        if CryptoLibrary::check_version(self.required_version.as_deref()).is_none() {
            tracing::error!(
                required = ?self.required_version,
                available = VERSION,
                "Library version requirement not met"
            );
            Err(CryptoError::InitializationFailure)?;
        }

        B::initialize()?;

        tracing::debug!(backend = B::NAME, version = B::version(), "Crypto library initialized");

        Ok(CryptoLibrary {
            allocator: self.allocator,
            random_sources: self.random_sources,
            _backend: PhantomData,
        })
    }
}

impl CryptoLibrary {
    /// Returns a builder for the default backend.
    ///
    /// Other backends are configured through
    /// `CryptoLibraryBuilder::<B>::new()`.
    pub fn builder() -> CryptoLibraryBuilder {
        CryptoLibraryBuilder::new()
    }

    /// Checks this library against a minimum version.
    ///
    /// Versions are dotted decimal numbers compared component by component,
    /// missing components counting as zero.
    ///
    /// # Returns
    ///
    /// [`VERSION`] if `required` is `None` or not newer than it, otherwise
    /// `None`. A requirement that does not parse is never satisfied.
    pub fn check_version(required: Option<&str>) -> Option<&'static str> {
        let Some(required) = required else {
            return Some(VERSION);
        };

        let ordering = compare_versions(VERSION, required);
        match ordering {
            Some(Ordering::Greater | Ordering::Equal) => Some(VERSION),
            Some(Ordering::Less) => None,
            None => {
                tracing::warn!(required, "Unparsable version requirement");
                None
            }
        }
    }
}

impl<B: Backend> CryptoLibrary<B> {
    /// Returns the name of the backend.
    pub fn backend_name(&self) -> &'static str {
        B::NAME
    }

    /// Returns the allocator handles are admitted through.
    pub fn allocator(&self) -> &Arc<dyn Allocator> {
        &self.allocator
    }

    /// Returns the entropy endpoints.
    pub fn random_sources(&self) -> &RandomSources {
        &self.random_sources
    }

    /// Opens a cipher handle.
    ///
    /// # Errors
    ///
    /// See [`CipherHandle`]: `UnsupportedAlgorithm`, `UnsupportedMode` or
    /// `AllocationFailure`.
    pub fn cipher_open(
        &self,
        algo: CipherAlgo,
        mode: CipherMode,
    ) -> Result<CipherHandle<B>, CryptoError> {
        CipherHandle::open(&self.allocator, algo, mode)
    }

    /// Opens a hash or HMAC handle.
    ///
    /// # Errors
    ///
    /// `UnsupportedAlgorithm` or `AllocationFailure`.
    pub fn hash_open(&self, algo: HashAlgo, mode: HashMode) -> Result<HashHandle<B>, CryptoError> {
        HashHandle::open(&self.allocator, algo, mode)
    }

    /// Digests `data` in one call.
    ///
    /// # Errors
    ///
    /// Same as [`hash_open`](Self::hash_open).
    pub fn hash_buffer(&self, algo: HashAlgo, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut handle = self.hash_open(algo, HashMode::Plain)?;
        handle.write(data)?;
        let digest = handle.read()?.to_vec();
        handle.close();
        Ok(digest)
    }

    /// Computes the HMAC of `data` under `key` in one call.
    ///
    /// # Errors
    ///
    /// Same as [`hash_open`](Self::hash_open), or `HashError` if the backend
    /// rejects the key.
    pub fn hmac(&self, algo: HashAlgo, key: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut handle = self.hash_open(algo, HashMode::Hmac)?;
        handle.hmac_set_key(key)?;
        handle.write(data)?;
        let mac = handle.read()?.to_vec();
        handle.close();
        Ok(mac)
    }

    /// MD5 digest of `data`.
    ///
    /// # Errors
    ///
    /// Same as [`hash_buffer`](Self::hash_buffer); `UnsupportedAlgorithm` if
    /// the backend does not provide MD5.
    pub fn md5(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.hash_buffer(HashAlgo::Md5, data)
    }

    /// SHA-1 digest of `data`.
    ///
    /// # Errors
    ///
    /// Same as [`hash_buffer`](Self::hash_buffer).
    pub fn sha1(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.hash_buffer(HashAlgo::Sha1, data)
    }

    /// HMAC-MD5 of `data` under `key`.
    ///
    /// # Errors
    ///
    /// Same as [`hmac`](Self::hmac).
    pub fn hmac_md5(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.hmac(HashAlgo::Md5, key, data)
    }

    /// HMAC-SHA-1 of `data` under `key`.
    ///
    /// # Errors
    ///
    /// Same as [`hmac`](Self::hmac).
    pub fn hmac_sha1(&self, key: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.hmac(HashAlgo::Sha1, key, data)
    }

    /// Fills `buf` with bytes of the given entropy class.
    ///
    /// # Errors
    ///
    /// Returns `RandomSourceError` if the endpoint fails; `buf` is zeroed.
    pub fn randomize(&self, level: RandomLevel, buf: &mut [u8]) -> Result<(), CryptoError> {
        self.random_sources.fill(level, buf)
    }

    /// Returns `len` bytes of the given entropy class.
    ///
    /// # Errors
    ///
    /// Returns `RandomSourceError` if the endpoint fails.
    pub fn random_vec(&self, level: RandomLevel, len: usize) -> Result<Vec<u8>, CryptoError> {
        self.random_sources.random_vec(level, len)
    }

    /// Fills `buf` from the nonce endpoint.
    ///
    /// # Errors
    ///
    /// Returns `RandomSourceError` if the endpoint fails; `buf` is zeroed.
    pub fn nonce(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        self.randomize(RandomLevel::Nonce, buf)
    }

    /// Fills `buf` from the pseudo-random endpoint.
    ///
    /// # Errors
    ///
    /// Returns `RandomSourceError` if the endpoint fails; `buf` is zeroed.
    pub fn pseudo_random(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        self.randomize(RandomLevel::Pseudo, buf)
    }

    /// Fills `buf` from the strong-random endpoint.
    ///
    /// # Errors
    ///
    /// Returns `RandomSourceError` if the endpoint fails; `buf` is zeroed.
    pub fn random(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        self.randomize(RandomLevel::Strong, buf)
    }

    /// Tears the library down.
    ///
    /// Handles already opened stay usable; they keep their own reference to
    /// the allocator.
    pub fn done(self) {
        tracing::debug!(backend = B::NAME, "Crypto library done");
    }
}

impl<B: Backend> fmt::Debug for CryptoLibrary<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoLibrary")
            .field("backend", &B::NAME)
            .field("version", &VERSION)
            .field("random_sources", &self.random_sources)
            .finish_non_exhaustive()
    }
}

fn parse_version(version: &str) -> Option<Vec<u64>> {
    version
        .trim()
        .split('.')
        .map(|part| part.parse().ok())
        .collect()
}

fn compare_versions(have: &str, want: &str) -> Option<Ordering> {
    let have = parse_version(have)?;
    let want = parse_version(want)?;
    let len = have.len().max(want.len());
    let component = |v: &[u64], i: usize| v.get(i).copied().unwrap_or(0);

    Some(
        (0..len)
            .map(|i| component(&have, i).cmp(&component(&want, i)))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal),
    )
}
