// Copyright (C) Microsoft Corporation. All rights reserved.

//! Allocator capability for handle buffers.
//!
//! Every buffer a cipher or hash handle owns (the handle itself, key
//! schedules, running digest states, HMAC pad states) is admitted through an
//! [`Allocator`] before it is created and handed back when the handle is
//! dropped. The allocator is fixed when a [`CryptoLibrary`] is built and is
//! carried by every handle opened from it, so it can never change under a
//! live handle.
//!
//! # Mapping
//!
//! | Hook            | Rust counterpart                          |
//! |-----------------|-------------------------------------------|
//! | `malloc`        | [`Allocator::allocate`] with `Standard`   |
//! | `secure_malloc` | [`Allocator::allocate`] with `Secure`     |
//! | `secure_check`  | [`Allocation::is_secure`]                 |
//! | `free`          | [`Allocator::release`], run on drop       |
//!
//! Handle buffers never grow, so there is no `realloc` counterpart.
//!
//! # Failure Handling
//!
//! Admissions are RAII guards. When a multi-step construction fails, the
//! guards acquired earlier in the same call are dropped on the way out and
//! released, so a failed `open` or `try_clone` leaves nothing outstanding.

use std::fmt;
use std::ops::Deref;
use std::ops::DerefMut;
use std::sync::Arc;

use super::*;

/// Memory class requested for a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryClass {
    /// Ordinary memory for bookkeeping and message state.
    Standard,
    /// Memory holding key material (schedules, HMAC pads).
    Secure,
}

/// Allocation hooks consulted by handle constructors.
///
/// Implementations must be thread safe: handles opened from the same library
/// on different threads share one allocator.
pub trait Allocator: Send + Sync {
    /// Admits a buffer of `size` bytes of the given class.
    ///
    /// # Errors
    ///
    /// Any error refuses the request; the caller reports it as
    /// `AllocationFailure`.
    fn allocate(&self, size: usize, class: MemoryClass) -> Result<(), CryptoError>;

    /// Returns a buffer previously admitted by [`Allocator::allocate`].
    fn release(&self, size: usize, class: MemoryClass);
}

/// Allocator backed by the process global allocator.
///
/// Admits every request; buffers are served by Rust's global allocator.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl Allocator for SystemAllocator {
    fn allocate(&self, _size: usize, _class: MemoryClass) -> Result<(), CryptoError> {
        Ok(())
    }

    fn release(&self, _size: usize, _class: MemoryClass) {}
}

/// An admitted allocation, released when dropped.
pub struct Allocation {
    allocator: Arc<dyn Allocator>,
    size: usize,
    class: MemoryClass,
}

impl Allocation {
    /// Requests `size` bytes of `class` from `allocator`.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailure` if the allocator refuses the request.
    pub(crate) fn new(
        allocator: &Arc<dyn Allocator>,
        size: usize,
        class: MemoryClass,
    ) -> Result<Self, CryptoError> {
        allocator.allocate(size, class).map_err(|e| {
            tracing::error!(?e, size, ?class, "Allocator refused request");
            CryptoError::AllocationFailure
        })?;

        Ok(Self {
            allocator: Arc::clone(allocator),
            size,
            class,
        })
    }

    /// Returns the admitted size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the memory class of the allocation.
    pub fn class(&self) -> MemoryClass {
        self.class
    }

    /// Returns whether the allocation lives in secure memory.
    pub fn is_secure(&self) -> bool {
        self.class == MemoryClass::Secure
    }
}

impl fmt::Debug for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocation")
            .field("size", &self.size)
            .field("class", &self.class)
            .finish()
    }
}

impl Drop for Allocation {
    fn drop(&mut self) {
        self.allocator.release(self.size, self.class);
    }
}

/// A boxed value whose memory was admitted by an [`Allocator`].
pub(crate) struct Owned<T> {
    value: Box<T>,
    allocation: Allocation,
}

impl<T> Owned<T> {
    /// Boxes `value` into memory already admitted by `allocation`.
    pub(crate) fn new(allocation: Allocation, value: T) -> Self {
        Self {
            value: Box::new(value),
            allocation,
        }
    }

    /// Returns the allocation backing this value.
    pub(crate) fn allocation(&self) -> &Allocation {
        &self.allocation
    }
}

impl<T> Deref for Owned<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for Owned<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}
