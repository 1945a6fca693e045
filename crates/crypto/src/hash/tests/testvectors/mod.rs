// Copyright (C) Microsoft Corporation. All rights reserved.

use super::*;

/// Known-answer digest vector.
#[derive(Debug, Clone)]
pub struct HashTestVector {
    pub algo: HashAlgo,
    pub msg: &'static [u8],
    pub digest: &'static str,
}

/// RFC 1321 appendix A.5 and FIPS 180 example vectors.
pub(crate) const HASH_TEST_VECTORS: &[HashTestVector] = &[
    HashTestVector {
        algo: HashAlgo::Md5,
        msg: b"",
        digest: "d41d8cd98f00b204e9800998ecf8427e",
    },
    HashTestVector {
        algo: HashAlgo::Md5,
        msg: b"a",
        digest: "0cc175b9c0f1b6a831c399e269772661",
    },
    HashTestVector {
        algo: HashAlgo::Md5,
        msg: b"abc",
        digest: "900150983cd24fb0d6963f7d28e17f72",
    },
    HashTestVector {
        algo: HashAlgo::Md5,
        msg: b"message digest",
        digest: "f96b697d7cb7938d525a2f31aaf161d0",
    },
    HashTestVector {
        algo: HashAlgo::Md5,
        msg: b"abcdefghijklmnopqrstuvwxyz",
        digest: "c3fcd3d76192e4007dfb496cca67e13b",
    },
    HashTestVector {
        algo: HashAlgo::Sha1,
        msg: b"",
        digest: "da39a3ee5e6b4b0d3255bfef95601890afd80709",
    },
    HashTestVector {
        algo: HashAlgo::Sha1,
        msg: b"abc",
        digest: "a9993e364706816aba3e25717850c26c9cd0d89d",
    },
    HashTestVector {
        algo: HashAlgo::Sha1,
        msg: b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq",
        digest: "84983e441c3bd26ebaae4aa1f95129e5e54670f1",
    },
];

/// Keyed known-answer vector.
#[derive(Debug, Clone)]
pub struct HmacTestVector {
    // Matches the RFC 2202 test case number.
    pub test_case: u32,
    pub algo: HashAlgo,
    pub key: &'static [u8],
    pub msg: &'static [u8],
    pub mac: &'static str,
}

/// RFC 2202 cases 1, 2, 6 and 7 for HMAC-MD5 and HMAC-SHA-1.
pub(crate) const HMAC_TEST_VECTORS: &[HmacTestVector] = &[
    HmacTestVector {
        test_case: 1,
        algo: HashAlgo::Md5,
        key: &[0x0b; 16],
        msg: b"Hi There",
        mac: "9294727a3638bb1c13f48ef8158bfc9d",
    },
    HmacTestVector {
        test_case: 2,
        algo: HashAlgo::Md5,
        key: b"Jefe",
        msg: b"what do ya want for nothing?",
        mac: "750c783e6ab0b503eaa86e310a5db738",
    },
    HmacTestVector {
        test_case: 6,
        algo: HashAlgo::Md5,
        key: &[0xaa; 80],
        msg: b"Test Using Larger Than Block-Size Key - Hash Key First",
        mac: "6b1ab7fe4bd7bf8f0b62e6ce61b9d0cd",
    },
    HmacTestVector {
        test_case: 7,
        algo: HashAlgo::Md5,
        key: &[0xaa; 80],
        msg: b"Test Using Larger Than Block-Size Key and Larger Than One Block-Size Data",
        mac: "6f630fad67cda0ee1fb1f562db3aa53e",
    },
    HmacTestVector {
        test_case: 1,
        algo: HashAlgo::Sha1,
        key: &[0x0b; 20],
        msg: b"Hi There",
        mac: "b617318655057264e28bc0b6fb378c8ef146be00",
    },
    HmacTestVector {
        test_case: 2,
        algo: HashAlgo::Sha1,
        key: b"Jefe",
        msg: b"what do ya want for nothing?",
        mac: "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79",
    },
    HmacTestVector {
        test_case: 6,
        algo: HashAlgo::Sha1,
        key: &[0xaa; 80],
        msg: b"Test Using Larger Than Block-Size Key - Hash Key First",
        mac: "aa4ae5e15272d00e95705637ce8a3b55ed402112",
    },
    HmacTestVector {
        test_case: 7,
        algo: HashAlgo::Sha1,
        key: &[0xaa; 80],
        msg: b"Test Using Larger Than Block-Size Key and Larger Than One Block-Size Data",
        mac: "e8e99d0f45237d786d6bbaa7965c7808bbff1a91",
    },
];
