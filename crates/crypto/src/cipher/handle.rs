// Copyright (C) Microsoft Corporation. All rights reserved.

//! Stateful cipher handle.

use std::fmt;
use std::mem::size_of;
use std::sync::Arc;

use zeroize::Zeroize;

use super::cbc::*;
use super::*;

/// Keyed state and chaining value for one direction.
struct Direction<B: CipherBackend> {
    schedule: Option<B::Schedule>,
    iv: [u8; MAX_BLOCK_SIZE],
    iv_set: bool,
    _allocation: Allocation,
}

impl<B: CipherBackend> Direction<B> {
    fn new(allocation: Allocation) -> Self {
        Self {
            schedule: None,
            iv: [0u8; MAX_BLOCK_SIZE],
            iv_set: false,
            _allocation: allocation,
        }
    }

    /// Validates a transform request before any byte of `data` is touched.
    fn ready(
        &mut self,
        algo: CipherAlgo,
        mode: CipherMode,
        len: usize,
    ) -> Result<(&mut B::Schedule, &mut [u8]), CryptoError> {
        let block_size = algo.block_size();
        if len % block_size != 0 {
            tracing::error!(len, block_size, ?algo, "Input is not block aligned");
            Err(CryptoError::InvalidInputSize)?;
        }
        if mode == CipherMode::Cbc && !self.iv_set {
            Err(CryptoError::CipherIvNotSet)?;
        }
        let schedule = self.schedule.as_mut().ok_or(CryptoError::CipherKeyNotSet)?;
        Ok((schedule, &mut self.iv[..block_size]))
    }
}

impl<B: CipherBackend> Drop for Direction<B> {
    fn drop(&mut self) {
        self.iv.zeroize();
    }
}

struct CipherState<B: CipherBackend> {
    algo: CipherAlgo,
    mode: CipherMode,
    encrypt: Direction<B>,
    decrypt: Direction<B>,
}

/// A symmetric cipher context.
///
/// Created by [`CryptoLibrary::cipher_open`]. The handle exclusively owns its
/// schedules and IVs; callers that share one across threads must add their
/// own locking, while distinct handles are fully independent.
///
/// # Lifecycle
///
/// 1. [`set_key`](Self::set_key) derives both schedules
/// 2. [`set_iv`](Self::set_iv) seeds both chains (CBC only)
/// 3. [`encrypt`](Self::encrypt) / [`decrypt`](Self::decrypt), repeatable
/// 4. [`close`](Self::close) or drop
///
/// `set_key` and `set_iv` may be called again at any point; each call
/// fully replaces the previous state for both directions.
pub struct CipherHandle<B: CipherBackend = DefaultBackend> {
    state: Owned<CipherState<B>>,
}

impl<B: CipherBackend> CipherHandle<B> {
    /// Opens a handle for `algo` in `mode`.
    ///
    /// Admits the handle, then the encrypt schedule, then the decrypt
    /// schedule. A refusal at any step releases the earlier admissions.
    ///
    /// # Errors
    ///
    /// * `UnsupportedAlgorithm` - The backend does not provide `algo`
    /// * `UnsupportedMode` - CBC was requested for a stream cipher
    /// * `AllocationFailure` - The allocator refused a buffer
    pub(crate) fn open(
        allocator: &Arc<dyn Allocator>,
        algo: CipherAlgo,
        mode: CipherMode,
    ) -> Result<Self, CryptoError> {
        if !B::is_supported(algo) {
            tracing::error!(?algo, "Cipher not provided by backend");
            Err(CryptoError::UnsupportedAlgorithm)?;
        }
        if mode == CipherMode::Cbc && algo.is_stream() {
            tracing::error!(?algo, ?mode, "Chaining requested for a stream cipher");
            Err(CryptoError::UnsupportedMode)?;
        }

        let handle = Allocation::new(
            allocator,
            size_of::<CipherState<B>>(),
            MemoryClass::Standard,
        )?;
        let schedule_size = B::schedule_size(algo);
        let encrypt = Allocation::new(allocator, schedule_size, MemoryClass::Secure)?;
        let decrypt = Allocation::new(allocator, schedule_size, MemoryClass::Secure)?;

        tracing::debug!(?algo, ?mode, "Cipher handle opened");

        Ok(Self {
            state: Owned::new(
                handle,
                CipherState {
                    algo,
                    mode,
                    encrypt: Direction::new(encrypt),
                    decrypt: Direction::new(decrypt),
                },
            ),
        })
    }

    /// Returns the cipher algorithm.
    pub fn algo(&self) -> CipherAlgo {
        self.state.algo
    }

    /// Returns the block mode.
    pub fn mode(&self) -> CipherMode {
        self.state.mode
    }

    /// Returns the block size in bytes; 1 for stream ciphers.
    pub fn block_size(&self) -> usize {
        self.state.algo.block_size()
    }

    /// Derives fresh encrypt and decrypt schedules from `key`.
    ///
    /// Stream ciphers restart their keystream.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKeyLength` if `key` does not match
    /// [`CipherAlgo::key_size`]; the previous schedules are kept.
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), CryptoError> {
        let algo = self.state.algo;
        if key.len() != algo.key_size() {
            tracing::error!(len = key.len(), ?algo, "Invalid cipher key length");
            Err(CryptoError::InvalidKeyLength)?;
        }

        let encrypt = B::schedule(algo, CipherDirection::Encrypt, key)?;
        let decrypt = B::schedule(algo, CipherDirection::Decrypt, key)?;
        self.state.encrypt.schedule = Some(encrypt);
        self.state.decrypt.schedule = Some(decrypt);
        Ok(())
    }

    /// Seeds both chaining values with `iv`.
    ///
    /// The encrypt and decrypt sides receive separate copies and advance
    /// independently afterwards.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIvLength` if `iv` is not exactly one block; the
    /// previous IVs are left unchanged.
    pub fn set_iv(&mut self, iv: &[u8]) -> Result<(), CryptoError> {
        let block_size = self.block_size();
        if iv.len() != block_size {
            tracing::error!(len = iv.len(), block_size, "Invalid IV length");
            Err(CryptoError::InvalidIvLength)?;
        }

        let state = &mut *self.state;
        for side in [&mut state.encrypt, &mut state.decrypt] {
            side.iv[..block_size].copy_from_slice(iv);
            side.iv_set = true;
        }
        Ok(())
    }

    /// Encrypts `data` in place.
    ///
    /// In CBC mode the encrypt-side IV advances to the last ciphertext
    /// block, so consecutive calls continue one chain.
    ///
    /// # Errors
    ///
    /// * `CipherKeyNotSet` - No key was set
    /// * `CipherIvNotSet` - CBC mode without an IV
    /// * `InvalidInputSize` - Block cipher input is not block aligned
    ///
    /// `data` is untouched when a precondition fails.
    pub fn encrypt(&mut self, data: &mut [u8]) -> Result<(), CryptoError> {
        tracing::trace!(len = data.len(), "Cipher encrypt");
        let CipherState {
            algo, mode, encrypt, ..
        } = &mut *self.state;
        let (schedule, iv) = encrypt.ready(*algo, *mode, data.len())?;
        match mode {
            CipherMode::Cbc => cbc_encrypt(iv, data, |block| B::encrypt(schedule, block)),
            CipherMode::Ecb | CipherMode::Stream => B::encrypt(schedule, data),
        }
    }

    /// Decrypts `data` in place.
    ///
    /// Mirrors [`encrypt`](Self::encrypt) with the decrypt-side schedule and
    /// IV.
    ///
    /// # Errors
    ///
    /// Same as [`encrypt`](Self::encrypt).
    pub fn decrypt(&mut self, data: &mut [u8]) -> Result<(), CryptoError> {
        tracing::trace!(len = data.len(), "Cipher decrypt");
        let CipherState {
            algo, mode, decrypt, ..
        } = &mut *self.state;
        let (schedule, iv) = decrypt.ready(*algo, *mode, data.len())?;
        match mode {
            CipherMode::Cbc => cbc_decrypt(iv, data, |block| B::decrypt(schedule, block)),
            CipherMode::Ecb | CipherMode::Stream => B::decrypt(schedule, data),
        }
    }

    /// Encrypts `data` into a new buffer of the same length.
    ///
    /// # Errors
    ///
    /// Same as [`encrypt`](Self::encrypt).
    pub fn encrypt_vec(&mut self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut out = data.to_vec();
        self.encrypt(&mut out)?;
        Ok(out)
    }

    /// Decrypts `data` into a new buffer of the same length.
    ///
    /// # Errors
    ///
    /// Same as [`encrypt`](Self::encrypt).
    pub fn decrypt_vec(&mut self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut out = data.to_vec();
        self.decrypt(&mut out)?;
        Ok(out)
    }

    /// Releases both schedules and the handle.
    pub fn close(self) {
        tracing::debug!(algo = ?self.state.algo, "Cipher handle closed");
    }
}

impl<B: CipherBackend> fmt::Debug for CipherHandle<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherHandle")
            .field("algo", &self.state.algo)
            .field("mode", &self.state.mode)
            .field("keyed", &self.state.encrypt.schedule.is_some())
            .field("allocation", self.state.allocation())
            .finish()
    }
}
