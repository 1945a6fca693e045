// Copyright (C) Microsoft Corporation. All rights reserved.

#![allow(clippy::unwrap_used)]


use ::rand::rngs::StdRng;
use ::rand::Rng;
use ::rand::SeedableRng;
pub(crate) use fixtures::*;
use test_log::test;

use super::*;

/// Magnitude of a fixture integer: the contents without the sign guard.
fn magnitude(hex_int: &str) -> Vec<u8> {
    let bytes = hex::decode(hex_int).unwrap();
    match bytes.as_slice() {
        [0, rest @ ..] if !rest.is_empty() => rest.to_vec(),
        _ => bytes,
    }
}

#[test]
fn test_fixture_encode() {
    for fixture in SIGNATURE_FIXTURES {
        let r = hex::decode(fixture.r).unwrap();
        let s = hex::decode(fixture.s).unwrap();
        let der = encode_rs_value(&r, &s).unwrap();
        assert_eq!(hex::encode(der), fixture.sig);
    }
}

#[test]
fn test_fixture_encode_from_magnitudes() {
    for fixture in SIGNATURE_FIXTURES {
        let der = encode_rs_value(&magnitude(fixture.r), &magnitude(fixture.s)).unwrap();
        assert_eq!(hex::encode(der), fixture.sig);
    }
}

#[test]
fn test_fixture_decode() {
    for fixture in SIGNATURE_FIXTURES {
        let der = hex::decode(fixture.sig).unwrap();
        let (r, s) = decode_rs_value(&der).unwrap();
        assert_eq!(r, magnitude(fixture.r), "{}", fixture.sig);
        assert_eq!(s, magnitude(fixture.s), "{}", fixture.sig);
    }
}

#[test]
fn test_random_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0001);
    for _ in 0..1000 {
        let mut r = vec![0u8; rng.gen_range(1..80)];
        let mut s = vec![0u8; rng.gen_range(1..80)];
        rng.fill(&mut r[..]);
        rng.fill(&mut s[..]);
        r[0] = rng.gen_range(1..=0xff);
        s[0] = rng.gen_range(1..=0xff);

        let der = encode_rs_value(&r, &s).unwrap();
        let guards = usize::from(r[0] >= 0x80) + usize::from(s[0] >= 0x80);
        assert!(der.len() >= r.len() + s.len() + guards + 6);

        let (r2, s2) = decode_rs_value(&der).unwrap();
        assert_eq!(r2, r);
        assert_eq!(s2, s);
    }
}

#[test]
fn test_sign_guard() {
    let der = encode_rs_value(&[0x80], &[0x7f]).unwrap();
    assert_eq!(der, [0x30, 0x07, 0x02, 0x02, 0x00, 0x80, 0x02, 0x01, 0x7f]);
    assert_eq!(decode_rs_value(&der).unwrap(), (vec![0x80], vec![0x7f]));
}

#[test]
fn test_leading_zeros_stripped() {
    let der = encode_rs_value(&[0, 0, 0x01, 0x02], &[0, 0x90]).unwrap();
    assert_eq!(
        der,
        [0x30, 0x08, 0x02, 0x02, 0x01, 0x02, 0x02, 0x02, 0x00, 0x90]
    );
}

#[test]
fn test_round_trip_returns_minimal_magnitude() {
    // Redundant leading zeros are not preserved through encode and decode.
    let der = encode_rs_value(&[0, 0x01, 0x02], &[0, 0, 0x7f]).unwrap();
    assert_eq!(
        decode_rs_value(&der).unwrap(),
        (vec![0x01, 0x02], vec![0x7f])
    );

    // A high-bit magnitude keeps no guard byte after decode.
    let der = encode_rs_value(&[0x00, 0x90], &[0x90]).unwrap();
    assert_eq!(decode_rs_value(&der).unwrap(), (vec![0x90], vec![0x90]));
}

#[test]
fn test_zero_components() {
    let der = encode_rs_value(&[0, 0, 0], &[0]).unwrap();
    assert_eq!(der, [0x30, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00]);
    assert_eq!(decode_rs_value(&der).unwrap(), (vec![0], vec![0]));
}

#[test]
fn test_long_form_lengths() {
    let mut r = vec![0x5a; 200];
    r[0] = 0x01;
    let der = encode_rs_value(&r, &[0x05]).unwrap();

    // 3 + 200 bytes for r and 3 bytes for s.
    assert_eq!(&der[..3], &[0x30, 0x81, 0xce]);
    assert_eq!(&der[3..6], &[0x02, 0x81, 0xc8]);
    assert_eq!(&der[der.len() - 3..], &[0x02, 0x01, 0x05]);
    assert_eq!(der.len(), 209);

    let (r2, s2) = decode_rs_value(&der).unwrap();
    assert_eq!(r2, r);
    assert_eq!(s2, [0x05]);
}

#[test]
fn test_guarded_long_form() {
    let r = vec![0xff; 128];
    let der = encode_rs_value(&r, &r).unwrap();
    assert_eq!(&der[..3], &[0x30, 0x82, 0x01]);
    assert_eq!(&der[4..8], &[0x02, 0x81, 0x81, 0x00]);
    assert_eq!(decode_rs_value(&der).unwrap(), (r.clone(), r));
}

#[test]
fn test_malformed_inputs() {
    let cases: &[(&str, &[u8])] = &[
        ("empty", &[]),
        ("set tag", &[0x31, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01]),
        (
            "three integers",
            &[0x30, 0x09, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01],
        ),
        ("one integer", &[0x30, 0x03, 0x02, 0x01, 0x01]),
        (
            "trailing data",
            &[0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01, 0x00],
        ),
        ("truncated", &[0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01]),
        (
            "non-minimal integer",
            &[0x30, 0x07, 0x02, 0x02, 0x00, 0x7f, 0x02, 0x01, 0x01],
        ),
        ("negative r", &[0x30, 0x06, 0x02, 0x01, 0x80, 0x02, 0x01, 0x01]),
        ("negative s", &[0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0xff]),
        ("octet string", &[0x30, 0x06, 0x04, 0x01, 0x01, 0x02, 0x01, 0x01]),
        ("empty integer", &[0x30, 0x05, 0x02, 0x00, 0x02, 0x01, 0x01]),
        (
            "non-minimal length",
            &[0x30, 0x81, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01],
        ),
    ];

    for (name, der) in cases {
        assert_eq!(
            decode_rs_value(der),
            Err(CryptoError::MalformedSignature),
            "{name}"
        );
    }
}

#[test]
fn test_empty_component() {
    assert_eq!(
        encode_rs_value(&[], &[1]),
        Err(CryptoError::InvalidSignatureComponent)
    );
    assert_eq!(
        encode_rs_value(&[1], &[]),
        Err(CryptoError::InvalidSignatureComponent)
    );
}

#[test]
fn test_to_der_buffer() {
    let sig = DerRsSignature::new(&[0x80, 0x01], &[0x01]).unwrap();
    let len = sig.to_der(None).unwrap();
    assert_eq!(len, 10);

    let mut small = [0u8; 9];
    assert_eq!(
        sig.to_der(Some(&mut small)),
        Err(CryptoError::DerBufferTooSmall)
    );

    let mut large = [0xaau8; 16];
    assert_eq!(sig.to_der(Some(&mut large)).unwrap(), len);
    assert_eq!(&large[..len], &sig.to_der_vec().unwrap()[..]);
    assert_eq!(large[len], 0xaa);
}

#[test]
fn test_accessors() {
    let sig = DerRsSignature::new(&[0, 0x80, 0x01], &[0, 0, 0x07]).unwrap();
    assert_eq!(sig.r(), [0x80, 0x01]);
    assert_eq!(sig.s(), [0x07]);

    let decoded = DerRsSignature::from_der(&sig.to_der_vec().unwrap()).unwrap();
    assert_eq!(decoded, sig);
    assert_eq!(decoded.into_parts(), (vec![0x80, 0x01], vec![0x07]));
}
