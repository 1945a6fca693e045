// Copyright (C) Microsoft Corporation. All rights reserved.

#![allow(clippy::unwrap_used)]

mod testvectors;

use std::sync::Arc;

use test_log::test;
pub(crate) use testvectors::*;

use super::*;
use crate::memory::tests::CountingAllocator;

type Handle = HashHandle<RustCryptoBackend>;

fn system() -> Arc<dyn Allocator> {
    Arc::new(SystemAllocator)
}

fn open(algo: HashAlgo) -> Handle {
    Handle::open(&system(), algo, HashMode::Plain).unwrap()
}

fn digest_of(algo: HashAlgo, chunks: &[&[u8]]) -> String {
    let mut handle = open(algo);
    for chunk in chunks {
        handle.write(chunk).unwrap();
    }
    hex::encode(handle.read().unwrap())
}

#[test]
fn test_known_answers() {
    for vector in HASH_TEST_VECTORS {
        assert_eq!(
            digest_of(vector.algo, &[vector.msg]),
            vector.digest,
            "{:?} {:?}",
            vector.algo,
            vector.msg
        );
    }
}

#[test]
fn test_byte_at_a_time_matches_single_write() {
    for vector in HASH_TEST_VECTORS {
        let chunks: Vec<&[u8]> = vector.msg.chunks(1).collect();
        assert_eq!(digest_of(vector.algo, &chunks), vector.digest);
    }
}

#[test]
fn test_sha1_streaming_1k() {
    const DATA: [u8; 1024] = [1u8; 1024];
    assert_eq!(
        digest_of(HashAlgo::Sha1, &[&DATA[..512], &DATA[512..]]),
        "376f19001dc171e2eb9c56962ca32478caaa7e39"
    );
}

#[test]
fn test_sha1_big_endian_data() {
    // 1024 bytes, filled with repeated 0x11223344 in big endian
    let mut data = [0u8; 1024];
    for word in data.chunks_exact_mut(4) {
        word.copy_from_slice(&0x11223344u32.to_be_bytes());
    }
    assert_eq!(
        digest_of(HashAlgo::Sha1, &[&data[..]]),
        "a3fb5e211918ea794b654d83afa5339a91110eb7"
    );
}

#[test]
fn test_ids_and_lengths() {
    assert_eq!(hash_digest_length(0), 16);
    assert_eq!(hash_digest_length(1), 20);
    assert_eq!(hash_digest_length(2), 20);
    assert_eq!(hash_digest_length(3), 0);
    assert_eq!(hash_digest_length(u32::MAX), 0);
    assert_eq!(HashAlgo::try_from(1), Ok(HashAlgo::Sha1));
    assert_eq!(HashMode::try_from(1), Ok(HashMode::Hmac));
    assert_eq!(HashMode::try_from(2), Err(CryptoError::HashInvalidMode));
    assert_eq!(open(HashAlgo::Md5).digest_length(), 16);
}

#[test]
fn test_rmd160_reserved() {
    let counting = CountingAllocator::new();
    let allocator: Arc<dyn Allocator> = counting.clone();
    let result = Handle::open(&allocator, HashAlgo::Rmd160, HashMode::Plain);
    assert_eq!(result.err(), Some(CryptoError::UnsupportedAlgorithm));
    assert_eq!(counting.requests(), 0);
}

#[test]
fn test_open_close_releases_everything() {
    let counting = CountingAllocator::new();
    let allocator: Arc<dyn Allocator> = counting.clone();

    let plain = Handle::open(&allocator, HashAlgo::Md5, HashMode::Plain).unwrap();
    assert_eq!(counting.live(MemoryClass::Standard), 2);
    assert_eq!(counting.live(MemoryClass::Secure), 0);
    plain.close();
    assert_eq!(counting.live_total(), 0);

    let keyed = Handle::open(&allocator, HashAlgo::Sha1, HashMode::Hmac).unwrap();
    assert_eq!(counting.live(MemoryClass::Standard), 1);
    assert_eq!(counting.live(MemoryClass::Secure), 3);
    keyed.close();
    assert_eq!(counting.live_total(), 0);
}

#[test]
fn test_open_fault_injection() {
    for (mode, steps) in [(HashMode::Plain, 2), (HashMode::Hmac, 4)] {
        for step in 1..=steps {
            let counting = CountingAllocator::failing_at(step);
            let allocator: Arc<dyn Allocator> = counting.clone();

            let result = Handle::open(&allocator, HashAlgo::Sha1, mode);
            assert_eq!(result.err(), Some(CryptoError::AllocationFailure));
            assert_eq!(counting.requests(), step);
            assert_eq!(counting.live_total(), 0, "{mode:?} leak at step {step}");
        }
    }
}

#[test]
fn test_clone_fault_injection() {
    // Opening an HMAC handle takes four requests; cloning takes four more.
    for step in 5..=8 {
        let counting = CountingAllocator::failing_at(step);
        let allocator: Arc<dyn Allocator> = counting.clone();

        let mut handle = Handle::open(&allocator, HashAlgo::Md5, HashMode::Hmac).unwrap();
        handle.hmac_set_key(b"key").unwrap();
        handle.write(b"prefix").unwrap();
        let live = counting.live_total();

        assert_eq!(handle.try_clone().err(), Some(CryptoError::AllocationFailure));
        assert_eq!(counting.live_total(), live, "leak at clone step {step}");

        // The original is still usable.
        handle.write(b"suffix").unwrap();
        assert_eq!(handle.read().unwrap().len(), 16);
    }
}

#[test]
fn test_clone_diverges() {
    let prefix = b"The quick brown fox ";
    let suffix_a = b"jumps over the lazy dog";
    let suffix_b = b"naps";

    for algo in [HashAlgo::Md5, HashAlgo::Sha1] {
        let mut original = open(algo);
        original.write(prefix).unwrap();
        let mut copy = original.try_clone().unwrap();

        original.write(suffix_a).unwrap();
        copy.write(suffix_b).unwrap();

        assert_eq!(
            hex::encode(original.read().unwrap()),
            digest_of(algo, &[&prefix[..], &suffix_a[..]])
        );
        assert_eq!(
            hex::encode(copy.read().unwrap()),
            digest_of(algo, &[&prefix[..], &suffix_b[..]])
        );
    }
}

#[test]
fn test_clone_allocation_classes() {
    let counting = CountingAllocator::new();
    let allocator: Arc<dyn Allocator> = counting.clone();

    let mut handle = Handle::open(&allocator, HashAlgo::Sha1, HashMode::Hmac).unwrap();
    handle.hmac_set_key(b"k").unwrap();
    let copy = handle.try_clone().unwrap();
    assert_eq!(counting.live(MemoryClass::Standard), 2);
    assert_eq!(counting.live(MemoryClass::Secure), 6);

    drop(handle);
    drop(copy);
    assert_eq!(counting.live_total(), 0);
}

#[test]
fn test_repeated_read_is_idempotent() {
    let mut handle = open(HashAlgo::Md5);
    handle.write(b"abc").unwrap();
    let first = handle.read().unwrap().to_vec();
    let second = handle.read().unwrap().to_vec();
    assert_eq!(first, second);
    assert_eq!(hex::encode(first), "900150983cd24fb0d6963f7d28e17f72");
}

#[test]
fn test_read_then_write_extends_message() {
    let mut handle = open(HashAlgo::Sha1);
    handle.write(b"ab").unwrap();
    handle.read().unwrap();
    handle.write(b"c").unwrap();
    assert_eq!(
        hex::encode(handle.read().unwrap()),
        "a9993e364706816aba3e25717850c26c9cd0d89d"
    );
}

#[test]
fn test_plain_handle_rejects_hmac_key() {
    let mut handle = open(HashAlgo::Sha1);
    assert_eq!(handle.hmac_set_key(b"key"), Err(CryptoError::HashInvalidMode));
}

#[test]
fn test_hmac_handle_requires_key() {
    let mut handle = Handle::open(&system(), HashAlgo::Md5, HashMode::Hmac).unwrap();
    assert_eq!(handle.write(b"data"), Err(CryptoError::HmacKeyNotSet));
    assert_eq!(handle.read().err(), Some(CryptoError::HmacKeyNotSet));
}

#[test]
fn test_independent_handles_across_threads() {
    let allocator = system();
    std::thread::scope(|scope| {
        for worker in 0..4u8 {
            let allocator = &allocator;
            scope.spawn(move || {
                let msg = [worker; 100];
                let mut handle = Handle::open(allocator, HashAlgo::Sha1, HashMode::Plain).unwrap();
                for chunk in msg.chunks(7) {
                    handle.write(chunk).unwrap();
                }
                let streamed = handle.read().unwrap().to_vec();
                assert_eq!(hex::encode(streamed), digest_of(HashAlgo::Sha1, &[&msg[..]]));
            });
        }
    });
}
