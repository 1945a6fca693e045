// Copyright (C) Microsoft Corporation. All rights reserved.

//! Stateful hash and HMAC handle.

use std::fmt;
use std::mem::size_of;
use std::sync::Arc;

use zeroize::Zeroize;

use super::*;

/// Running state of either handle mode.
enum Context<B: HashBackend> {
    Digest(B::State),
    Mac(B::Mac),
}

impl<B: HashBackend> Clone for Context<B> {
    fn clone(&self) -> Self {
        match self {
            Self::Digest(state) => Self::Digest(state.clone()),
            Self::Mac(mac) => Self::Mac(mac.clone()),
        }
    }
}

/// A backend state together with the admission that pays for it.
struct Slot<S> {
    value: Option<S>,
    allocation: Allocation,
}

impl<S: Clone> Slot<S> {
    fn empty(allocation: Allocation) -> Self {
        Self {
            value: None,
            allocation,
        }
    }

    /// Deep copy into a freshly admitted slot of the same size and class.
    fn duplicate(&self, allocator: &Arc<dyn Allocator>) -> Result<Self, CryptoError> {
        let allocation =
            Allocation::new(allocator, self.allocation.size(), self.allocation.class())?;
        Ok(Self {
            value: self.value.clone(),
            allocation,
        })
    }
}

/// The freshly keyed MAC, kept to restart messages.
///
/// The backend state holds both pad states, so it is admitted as an inner
/// and an outer secure buffer.
struct KeySlots<M> {
    keyed: Slot<M>,
    outer: Allocation,
}

impl<M: Clone> KeySlots<M> {
    fn duplicate(&self, allocator: &Arc<dyn Allocator>) -> Result<Self, CryptoError> {
        let keyed = self.keyed.duplicate(allocator)?;
        let outer = Allocation::new(allocator, self.outer.size(), self.outer.class())?;
        Ok(Self { keyed, outer })
    }
}

struct HashState<B: HashBackend> {
    algo: HashAlgo,
    mode: HashMode,
    context: Slot<Context<B>>,
    key: Option<KeySlots<B::Mac>>,
    digest: [u8; MAX_DIGEST_SIZE],
    digest_len: usize,
}

impl<B: HashBackend> Drop for HashState<B> {
    fn drop(&mut self) {
        self.digest.zeroize();
    }
}

/// A message digest or HMAC context.
///
/// Created by [`CryptoLibrary::hash_open`]. In [`HashMode::Hmac`] the handle
/// must be keyed with [`hmac_set_key`](Self::hmac_set_key) before any data is
/// written.
///
/// # Thread Safety
///
/// Operations take `&mut self`; distinct handles share nothing and may be
/// used from different threads at once.
pub struct HashHandle<B: HashBackend = DefaultBackend> {
    allocator: Arc<dyn Allocator>,
    state: Owned<HashState<B>>,
}

impl<B: HashBackend> HashHandle<B> {
    /// Opens a handle for `algo` in `mode`.
    ///
    /// Admits the handle and the running state, plus the inner and outer pad
    /// states in HMAC mode. A refusal at any step releases the earlier
    /// admissions.
    ///
    /// # Errors
    ///
    /// * `UnsupportedAlgorithm` - The backend does not provide `algo`
    /// * `AllocationFailure` - The allocator refused a buffer
    pub(crate) fn open(
        allocator: &Arc<dyn Allocator>,
        algo: HashAlgo,
        mode: HashMode,
    ) -> Result<Self, CryptoError> {
        if !B::is_supported(algo) {
            tracing::error!(?algo, "Hash not provided by backend");
            Err(CryptoError::UnsupportedAlgorithm)?;
        }

        let state_size = B::state_size(algo);
        let handle = Allocation::new(
            allocator,
            size_of::<HashState<B>>(),
            MemoryClass::Standard,
        )?;
        let context_class = match mode {
            HashMode::Plain => MemoryClass::Standard,
            HashMode::Hmac => MemoryClass::Secure,
        };
        let mut context = Slot::empty(Allocation::new(allocator, state_size, context_class)?);
        let key = match mode {
            HashMode::Plain => {
                context.value = Some(Context::Digest(B::init(algo)?));
                None
            }
            HashMode::Hmac => {
                let inner = Allocation::new(allocator, state_size, MemoryClass::Secure)?;
                let outer = Allocation::new(allocator, state_size, MemoryClass::Secure)?;
                Some(KeySlots {
                    keyed: Slot::empty(inner),
                    outer,
                })
            }
        };

        tracing::debug!(?algo, ?mode, "Hash handle opened");

        Ok(Self {
            allocator: Arc::clone(allocator),
            state: Owned::new(
                handle,
                HashState {
                    algo,
                    mode,
                    context,
                    key,
                    digest: [0u8; MAX_DIGEST_SIZE],
                    digest_len: 0,
                },
            ),
        })
    }

    /// Returns an independent deep copy of this handle.
    ///
    /// The running state, the keyed MAC state and the last digest are all
    /// copied; both handles evolve separately afterwards.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailure` if the allocator refuses a buffer; any
    /// buffer admitted earlier in the call is released.
    pub fn try_clone(&self) -> Result<Self, CryptoError> {
        let handle = Allocation::new(
            &self.allocator,
            self.state.allocation().size(),
            MemoryClass::Standard,
        )?;
        let context = self.state.context.duplicate(&self.allocator)?;
        let key = match &self.state.key {
            Some(key) => Some(key.duplicate(&self.allocator)?),
            None => None,
        };

        tracing::debug!(algo = ?self.state.algo, "Hash handle cloned");

        Ok(Self {
            allocator: Arc::clone(&self.allocator),
            state: Owned::new(
                handle,
                HashState {
                    algo: self.state.algo,
                    mode: self.state.mode,
                    context,
                    key,
                    digest: self.state.digest,
                    digest_len: self.state.digest_len,
                },
            ),
        })
    }

    /// Returns the hash algorithm.
    pub fn algo(&self) -> HashAlgo {
        self.state.algo
    }

    /// Returns the handle mode.
    pub fn mode(&self) -> HashMode {
        self.state.mode
    }

    /// Returns the digest length in bytes.
    pub fn digest_length(&self) -> usize {
        self.state.algo.digest_size()
    }

    /// Keys an HMAC handle.
    ///
    /// The backend derives the pad states from `key`. The message restarts:
    /// data written before this call is discarded.
    ///
    /// # Errors
    ///
    /// * `HashInvalidMode` - The handle is a plain digest handle
    /// * `HashError` - The backend rejected the key
    pub fn hmac_set_key(&mut self, key: &[u8]) -> Result<(), CryptoError> {
        let state = &mut *self.state;
        let Some(slots) = state.key.as_mut() else {
            tracing::error!(algo = ?state.algo, "HMAC key set on a plain digest handle");
            return Err(CryptoError::HashInvalidMode);
        };

        let keyed = B::hmac_init(state.algo, key)?;
        state.context.value = Some(Context::Mac(keyed.clone()));
        slots.keyed.value = Some(keyed);
        Ok(())
    }

    /// Absorbs `data` into the running state.
    ///
    /// # Errors
    ///
    /// Returns `HmacKeyNotSet` on an HMAC handle that was never keyed.
    pub fn write(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        tracing::trace!(len = data.len(), "Hash write");
        let context = self
            .state
            .context
            .value
            .as_mut()
            .ok_or(CryptoError::HmacKeyNotSet)?;
        match context {
            Context::Digest(state) => B::update(state, data),
            Context::Mac(mac) => B::hmac_update(mac, data),
        }
    }

    /// Finalizes the message written so far.
    ///
    /// The running state itself is not consumed: a copy is finalized, so
    /// repeated reads return the same digest and later writes extend the
    /// same message.
    ///
    /// # Returns
    ///
    /// The digest, borrowed from the handle's digest buffer.
    ///
    /// # Errors
    ///
    /// Returns `HmacKeyNotSet` on an HMAC handle that was never keyed.
    pub fn read(&mut self) -> Result<&[u8], CryptoError> {
        let state = &mut *self.state;
        let context = state
            .context
            .value
            .clone()
            .ok_or(CryptoError::HmacKeyNotSet)?;

        let len = match context {
            Context::Digest(digest) => B::finish(digest, &mut state.digest)?,
            Context::Mac(mac) => B::hmac_finish(mac, &mut state.digest)?,
        };
        state.digest_len = len;
        Ok(&state.digest[..len])
    }

    /// Releases the keyed state, the running state and the handle.
    pub fn close(self) {
        tracing::debug!(algo = ?self.state.algo, "Hash handle closed");
    }
}

impl<B: HashBackend> fmt::Debug for HashHandle<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashHandle")
            .field("algo", &self.state.algo)
            .field("mode", &self.state.mode)
            .field("ready", &self.state.context.value.is_some())
            .field("allocation", self.state.allocation())
            .finish()
    }
}
