// Copyright (C) Microsoft Corporation. All rights reserved.

//! DER (Distinguished Encoding Rules) codec for DSA/ECDSA signature values.
//!
//! DSA and ECDSA signatures travel as the ASN.1 structure
//!
//! ```text
//! Dss-Sig-Value ::= SEQUENCE {
//!   r  INTEGER,
//!   s  INTEGER
//! }
//! ```
//!
//! while signing primitives produce and consume `r` and `s` as unsigned
//! big-endian magnitudes. DER integers are two's complement, so a magnitude
//! whose top bit is set needs a leading 0x00 sign guard on the wire, and a
//! decoder must drop that guard again. This module owns that conversion.
//!
//! # Canonical Form
//!
//! - Encoding strips redundant leading zeros from each magnitude, keeps a
//!   single zero byte for the value zero, and adds the guard only when the
//!   top bit of the first remaining byte is set
//! - Decoding is strict DER: non-minimal integers, negative integers, wrong
//!   tags, extra elements and trailing bytes are all rejected
//! - Lengths use the short form when they fit and the long form otherwise
//!
//! The codec is stateless and safe to call from any thread.

mod signature;

pub use signature::*;

use super::*;

#[cfg(test)]
mod tests;
