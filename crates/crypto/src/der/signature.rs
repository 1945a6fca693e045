// Copyright (C) Microsoft Corporation. All rights reserved.

//! `SEQUENCE { INTEGER r, INTEGER s }` signature values.

use super::*;

/// ASN.1 structure for DSA and ECDSA signature values (RFC 3279).
///
/// ```text
/// Dss-Sig-Value ::= SEQUENCE {
///   r  INTEGER,
///   s  INTEGER
/// }
/// ```
#[derive(asn1::Asn1Read, asn1::Asn1Write)]
struct RsSignature {
    r: asn1::OwnedBigInt,
    s: asn1::OwnedBigInt,
}

/// A DSA/ECDSA signature as two non-negative integers.
///
/// Both components are held as minimal big-endian magnitudes: no leading
/// zero bytes, except the single zero byte of the value zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerRsSignature {
    r: Vec<u8>,
    s: Vec<u8>,
}

impl DerRsSignature {
    /// Creates a signature from big-endian magnitudes.
    ///
    /// Leading zero bytes, including a sign guard already present, are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSignatureComponent` if `r` or `s` is empty.
    pub fn new(r: &[u8], s: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self {
            r: minimal_magnitude(r)?,
            s: minimal_magnitude(s)?,
        })
    }

    /// Returns the `r` magnitude.
    pub fn r(&self) -> &[u8] {
        &self.r
    }

    /// Returns the `s` magnitude.
    pub fn s(&self) -> &[u8] {
        &self.s
    }

    /// Splits the signature into its `(r, s)` magnitudes.
    pub fn into_parts(self) -> (Vec<u8>, Vec<u8>) {
        (self.r, self.s)
    }

    /// Decodes a DER signature value.
    ///
    /// A sign guard byte in front of either integer is removed; all other
    /// bytes are returned as encoded.
    ///
    /// # Errors
    ///
    /// Returns `MalformedSignature` if `bytes` is not exactly one DER
    /// `SEQUENCE` of two non-negative, minimally encoded `INTEGER`s.
    pub fn from_der(bytes: &[u8]) -> Result<Self, CryptoError> {
        let sig: RsSignature = asn1::parse_single(bytes).map_err(|e| {
            tracing::error!(?e, len = bytes.len(), "Malformed DER signature");
            CryptoError::MalformedSignature
        })?;

        Ok(Self {
            r: strip_sign_guard(&sig.r)?.to_vec(),
            s: strip_sign_guard(&sig.s)?.to_vec(),
        })
    }

    /// Encodes the signature as DER.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Optional output buffer. If `None`, only calculates the required size.
    ///
    /// # Returns
    ///
    /// The number of bytes written (or required if `bytes` is `None`).
    ///
    /// # Errors
    ///
    /// * `DerEncodeError` - Failed to encode the ASN.1 structure
    /// * `DerBufferTooSmall` - Output buffer is too small
    pub fn to_der(&self, bytes: Option<&mut [u8]>) -> Result<usize, CryptoError> {
        let sig = RsSignature {
            r: signed_integer(&self.r)?,
            s: signed_integer(&self.s)?,
        };

        let der = asn1::write_single(&sig).map_err(|e| {
            tracing::error!(?e, "DER signature encoding failed");
            CryptoError::DerEncodeError
        })?;

        if let Some(bytes) = bytes {
            if bytes.len() < der.len() {
                return Err(CryptoError::DerBufferTooSmall);
            }
            bytes[..der.len()].copy_from_slice(&der);
        }

        Ok(der.len())
    }

    /// Encodes the signature into a new vector.
    ///
    /// # Errors
    ///
    /// Returns an error if DER encoding fails.
    pub fn to_der_vec(&self) -> Result<Vec<u8>, CryptoError> {
        let der_len = self.to_der(None)?;
        let mut der_bytes = vec![0u8; der_len];
        self.to_der(Some(&mut der_bytes))?;
        Ok(der_bytes)
    }
}

/// Decodes a DER signature value into its `(r, s)` magnitudes.
///
/// # Errors
///
/// Same as [`DerRsSignature::from_der`].
pub fn decode_rs_value(der: &[u8]) -> Result<(Vec<u8>, Vec<u8>), CryptoError> {
    DerRsSignature::from_der(der).map(DerRsSignature::into_parts)
}

/// Encodes `(r, s)` magnitudes as a DER signature value.
///
/// # Errors
///
/// Returns `InvalidSignatureComponent` if `r` or `s` is empty, or
/// `DerEncodeError` if encoding fails.
pub fn encode_rs_value(r: &[u8], s: &[u8]) -> Result<Vec<u8>, CryptoError> {
    DerRsSignature::new(r, s)?.to_der_vec()
}

fn minimal_magnitude(bytes: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if bytes.is_empty() {
        return Err(CryptoError::InvalidSignatureComponent);
    }
    // Keep the last byte so zero stays one 0x00.
    let start = bytes
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(bytes.len() - 1);
    Ok(bytes[start..].to_vec())
}

/// Adds the sign guard when the magnitude's top bit is set.
fn signed_integer(magnitude: &[u8]) -> Result<asn1::OwnedBigInt, CryptoError> {
    let needs_padding = magnitude.first().is_some_and(|&b| b & 0x80 == 0x80);

    let mut vec = Vec::with_capacity(magnitude.len() + needs_padding as usize);
    if needs_padding {
        vec.push(0);
    }
    vec.extend_from_slice(magnitude);

    asn1::OwnedBigInt::new(vec).ok_or(CryptoError::DerEncodeError)
}

/// Returns the magnitude of a non-negative DER integer.
fn strip_sign_guard(int: &asn1::OwnedBigInt) -> Result<&[u8], CryptoError> {
    match int.as_bytes() {
        [first, ..] if first & 0x80 != 0 => {
            tracing::error!("Negative integer in DER signature");
            Err(CryptoError::MalformedSignature)
        }
        [0, rest @ ..] if !rest.is_empty() => Ok(rest),
        bytes => Ok(bytes),
    }
}
