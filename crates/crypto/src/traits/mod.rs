// Copyright (C) Microsoft Corporation. All rights reserved.

//! Primitive provider traits.
//!
//! The handle managers never implement cryptographic math themselves. They
//! orchestrate calls into a provider that supplies, per algorithm, key
//! schedules and block/stream transforms ([`CipherBackend`]) or running digest
//! states ([`HashBackend`]). A [`Backend`] bundles both together with the
//! one-time initialization the library performs before handing out handles.
//!
//! # Design
//!
//! Providers are zero-sized marker types with associated state types. Each
//! provider maps the closed set of algorithm identifiers onto a tagged union
//! of concrete states, so dispatch is static and exhaustively matched.
//!
//! # Thread Safety
//!
//! Provider states are mutated in place by every call. The handles that own
//! them are not meant to be shared between threads without external locking.

mod backend;
mod cipher;
mod hasher;

pub use backend::*;
pub use cipher::*;
pub use hasher::*;

use super::*;
