// Copyright (C) Microsoft Corporation. All rights reserved.

//! Pure Rust primitives from the RustCrypto project.
//!
//! This backend is always built and needs no system library. Algorithms map
//! onto a closed set of schedule and state variants, so dispatch is a single
//! `match` per call with no dynamic dispatch.
//!
//! # Supported Algorithms
//!
//! - **AES-128 / AES-256**: `aes` crate
//! - **DES / 3DES (EDE3)**: `des` crate
//! - **ARCFOUR-40 / ARCFOUR-128**: `rc4` crate
//! - **ARCTWO-40**: `rc2` crate with 40 effective key bits
//! - **MD5**: `md-5` crate
//! - **SHA-1**: `sha1` crate
//! - **HMAC**: `hmac` crate over MD5 and SHA-1
//!
//! Cipher schedules wipe their round keys and keystream state on drop
//! (the `zeroize` feature of each cipher crate). Digest and HMAC states
//! have no such support upstream.
//!
//! RMD160 keeps its identifier but is not provided.

use std::mem::size_of;
use std::sync::OnceLock;

use ::cipher::consts::U16;
use ::cipher::consts::U5;
use ::cipher::generic_array::GenericArray;
use ::cipher::BlockDecrypt;
use ::cipher::BlockEncrypt;
use ::cipher::KeyInit;
use ::cipher::StreamCipher;
use aes::Aes128;
use aes::Aes256;
use des::Des;
use des::TdesEde3;
use hmac::Hmac;
use hmac::Mac;
use md5::Digest;
use md5::Md5;
use rc2::Rc2;
use rc4::Rc4;
use sha1::Sha1;

use super::*;

/// Effective key length, in bits, of the ARCTWO-40 schedule.
const RC2_EFFECTIVE_BITS: usize = 40;

/// RustCrypto primitive provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoBackend;

/// Keyed cipher state of the RustCrypto backend.
///
/// Block cipher schedules are direction independent; the stream cipher
/// variants carry their keystream position. Every variant is zeroized on
/// drop.
pub enum RustCryptoSchedule {
    /// AES with a 256-bit key.
    Aes256(Aes256),
    /// AES with a 128-bit key.
    Aes128(Aes128),
    /// Triple DES, three independent keys.
    Des3(TdesEde3),
    /// Single DES.
    Des(Des),
    /// ARCFOUR with a 128-bit key.
    Arcfour128(Rc4<U16>),
    /// ARCFOUR with a 40-bit key.
    Arcfour40(Rc4<U5>),
    /// ARCTWO with 40 effective key bits.
    Arctwo40(Rc2),
}

/// Running digest state of the RustCrypto backend.
#[derive(Clone)]
pub enum RustCryptoHashState {
    /// MD5 running state.
    Md5(Md5),
    /// SHA-1 running state.
    Sha1(Sha1),
}

/// Keyed HMAC state of the RustCrypto backend.
///
/// The `hmac` crate absorbs the key pads at construction, so a clone
/// carries the precomputed inner and outer states.
#[derive(Clone)]
pub enum RustCryptoMac {
    /// HMAC-MD5.
    Md5(Hmac<Md5>),
    /// HMAC-SHA-1.
    Sha1(Hmac<Sha1>),
}

fn ecb_encrypt<C: BlockEncrypt>(cipher: &C, data: &mut [u8]) -> Result<(), CryptoError> {
    let block_size = C::block_size();
    if data.len() % block_size != 0 {
        Err(CryptoError::InvalidInputSize)?;
    }
    for block in data.chunks_exact_mut(block_size) {
        cipher.encrypt_block(GenericArray::from_mut_slice(block));
    }
    Ok(())
}

fn ecb_decrypt<C: BlockDecrypt>(cipher: &C, data: &mut [u8]) -> Result<(), CryptoError> {
    let block_size = C::block_size();
    if data.len() % block_size != 0 {
        Err(CryptoError::InvalidInputSize)?;
    }
    for block in data.chunks_exact_mut(block_size) {
        cipher.decrypt_block(GenericArray::from_mut_slice(block));
    }
    Ok(())
}

fn keyed_mac<M: KeyInit>(key: &[u8]) -> Result<M, CryptoError> {
    <M as KeyInit>::new_from_slice(key).map_err(|e| {
        tracing::error!(?e, "HMAC key rejected");
        CryptoError::HashError
    })
}

fn copy_digest(digest: &[u8], out: &mut [u8]) -> Result<usize, CryptoError> {
    let out = out
        .get_mut(..digest.len())
        .ok_or(CryptoError::HashBufferTooSmall)?;
    out.copy_from_slice(digest);
    Ok(digest.len())
}

fn new_keyed<C: KeyInit>(key: &[u8]) -> Result<C, CryptoError> {
    C::new_from_slice(key).map_err(|e| {
        tracing::error!(?e, "Key rejected by cipher");
        CryptoError::InvalidKeyLength
    })
}

impl CipherBackend for RustCryptoBackend {
    type Schedule = RustCryptoSchedule;

    fn is_supported(_algo: CipherAlgo) -> bool {
        true
    }

    fn schedule_size(algo: CipherAlgo) -> usize {
        match algo {
            CipherAlgo::Aes256 => size_of::<Aes256>(),
            CipherAlgo::Aes128 => size_of::<Aes128>(),
            CipherAlgo::Des3 => size_of::<TdesEde3>(),
            CipherAlgo::Des => size_of::<Des>(),
            CipherAlgo::Arcfour128 => size_of::<Rc4<U16>>(),
            CipherAlgo::Arcfour40 => size_of::<Rc4<U5>>(),
            CipherAlgo::Arctwo40 => size_of::<Rc2>(),
        }
    }

    fn schedule(
        algo: CipherAlgo,
        _direction: CipherDirection,
        key: &[u8],
    ) -> Result<Self::Schedule, CryptoError> {
        if key.len() != algo.key_size() {
            Err(CryptoError::InvalidKeyLength)?;
        }

        let schedule = match algo {
            CipherAlgo::Aes256 => RustCryptoSchedule::Aes256(new_keyed(key)?),
            CipherAlgo::Aes128 => RustCryptoSchedule::Aes128(new_keyed(key)?),
            CipherAlgo::Des3 => RustCryptoSchedule::Des3(new_keyed(key)?),
            CipherAlgo::Des => RustCryptoSchedule::Des(new_keyed(key)?),
            CipherAlgo::Arcfour128 => RustCryptoSchedule::Arcfour128(new_keyed(key)?),
            CipherAlgo::Arcfour40 => RustCryptoSchedule::Arcfour40(new_keyed(key)?),
            CipherAlgo::Arctwo40 => {
                RustCryptoSchedule::Arctwo40(Rc2::new_with_eff_key_len(key, RC2_EFFECTIVE_BITS))
            }
        };
        Ok(schedule)
    }

    fn encrypt(schedule: &mut Self::Schedule, data: &mut [u8]) -> Result<(), CryptoError> {
        match schedule {
            RustCryptoSchedule::Aes256(c) => ecb_encrypt(c, data),
            RustCryptoSchedule::Aes128(c) => ecb_encrypt(c, data),
            RustCryptoSchedule::Des3(c) => ecb_encrypt(c, data),
            RustCryptoSchedule::Des(c) => ecb_encrypt(c, data),
            RustCryptoSchedule::Arctwo40(c) => ecb_encrypt(c, data),
            RustCryptoSchedule::Arcfour128(c) => {
                c.apply_keystream(data);
                Ok(())
            }
            RustCryptoSchedule::Arcfour40(c) => {
                c.apply_keystream(data);
                Ok(())
            }
        }
    }

    fn decrypt(schedule: &mut Self::Schedule, data: &mut [u8]) -> Result<(), CryptoError> {
        match schedule {
            RustCryptoSchedule::Aes256(c) => ecb_decrypt(c, data),
            RustCryptoSchedule::Aes128(c) => ecb_decrypt(c, data),
            RustCryptoSchedule::Des3(c) => ecb_decrypt(c, data),
            RustCryptoSchedule::Des(c) => ecb_decrypt(c, data),
            RustCryptoSchedule::Arctwo40(c) => ecb_decrypt(c, data),
            // ARCFOUR is symmetric.
            RustCryptoSchedule::Arcfour128(c) => {
                c.apply_keystream(data);
                Ok(())
            }
            RustCryptoSchedule::Arcfour40(c) => {
                c.apply_keystream(data);
                Ok(())
            }
        }
    }
}

impl HashBackend for RustCryptoBackend {
    type State = RustCryptoHashState;
    type Mac = RustCryptoMac;

    fn is_supported(algo: HashAlgo) -> bool {
        algo != HashAlgo::Rmd160
    }

    fn state_size(algo: HashAlgo) -> usize {
        match algo {
            HashAlgo::Md5 => size_of::<Md5>(),
            HashAlgo::Sha1 | HashAlgo::Rmd160 => size_of::<Sha1>(),
        }
    }

    fn init(algo: HashAlgo) -> Result<Self::State, CryptoError> {
        match algo {
            HashAlgo::Md5 => Ok(RustCryptoHashState::Md5(Md5::new())),
            HashAlgo::Sha1 => Ok(RustCryptoHashState::Sha1(Sha1::new())),
            HashAlgo::Rmd160 => Err(CryptoError::UnsupportedAlgorithm),
        }
    }

    fn update(state: &mut Self::State, data: &[u8]) -> Result<(), CryptoError> {
        match state {
            RustCryptoHashState::Md5(h) => Digest::update(h, data),
            RustCryptoHashState::Sha1(h) => Digest::update(h, data),
        }
        Ok(())
    }

    fn finish(state: Self::State, out: &mut [u8]) -> Result<usize, CryptoError> {
        match state {
            RustCryptoHashState::Md5(h) => copy_digest(&Digest::finalize(h), out),
            RustCryptoHashState::Sha1(h) => copy_digest(&Digest::finalize(h), out),
        }
    }

    fn hmac_init(algo: HashAlgo, key: &[u8]) -> Result<Self::Mac, CryptoError> {
        match algo {
            HashAlgo::Md5 => Ok(RustCryptoMac::Md5(keyed_mac(key)?)),
            HashAlgo::Sha1 => Ok(RustCryptoMac::Sha1(keyed_mac(key)?)),
            HashAlgo::Rmd160 => Err(CryptoError::UnsupportedAlgorithm),
        }
    }

    fn hmac_update(mac: &mut Self::Mac, data: &[u8]) -> Result<(), CryptoError> {
        match mac {
            RustCryptoMac::Md5(h) => Mac::update(h, data),
            RustCryptoMac::Sha1(h) => Mac::update(h, data),
        }
        Ok(())
    }

    fn hmac_finish(mac: Self::Mac, out: &mut [u8]) -> Result<usize, CryptoError> {
        match mac {
            RustCryptoMac::Md5(h) => copy_digest(&Mac::finalize(h).into_bytes(), out),
            RustCryptoMac::Sha1(h) => copy_digest(&Mac::finalize(h).into_bytes(), out),
        }
    }
}

/// MD5("abc"), RFC 1321.
const SELF_TEST_MD5: [u8; 16] = [
    0x90, 0x01, 0x50, 0x98, 0x3c, 0xd2, 0x4f, 0xb0, 0xd6, 0x96, 0x3f, 0x7d, 0x28, 0xe1, 0x7f, 0x72,
];

/// AES-128 example vector, FIPS-197 appendix C.1.
const SELF_TEST_AES_KEY: [u8; 16] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f,
];
const SELF_TEST_AES_PT: [u8; 16] = [
    0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff,
];
const SELF_TEST_AES_CT: [u8; 16] = [
    0x69, 0xc4, 0xe0, 0xd8, 0x6a, 0x7b, 0x04, 0x30, 0xd8, 0xcd, 0xb7, 0x80, 0x70, 0xb4, 0xc5, 0x5a,
];

fn self_test() -> Result<(), CryptoError> {
    let mut state = RustCryptoBackend::init(HashAlgo::Md5)?;
    RustCryptoBackend::update(&mut state, b"abc")?;
    let mut digest = [0u8; MAX_DIGEST_SIZE];
    let len = RustCryptoBackend::finish(state, &mut digest)?;
    if digest[..len] != SELF_TEST_MD5 {
        tracing::error!("MD5 known-answer test failed");
        Err(CryptoError::InitializationFailure)?;
    }

    let mut schedule = RustCryptoBackend::schedule(
        CipherAlgo::Aes128,
        CipherDirection::Encrypt,
        &SELF_TEST_AES_KEY,
    )?;
    let mut block = SELF_TEST_AES_PT;
    <RustCryptoBackend as CipherBackend>::encrypt(&mut schedule, &mut block)?;
    if block != SELF_TEST_AES_CT {
        tracing::error!("AES-128 known-answer test failed");
        Err(CryptoError::InitializationFailure)?;
    }

    Ok(())
}

impl Backend for RustCryptoBackend {
    const NAME: &'static str = "RustCrypto";

    fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn initialize() -> Result<(), CryptoError> {
        static INIT: OnceLock<Result<(), CryptoError>> = OnceLock::new();

        *INIT.get_or_init(|| {
            self_test().map_err(|e| {
                tracing::error!(?e, backend = Self::NAME, "Backend self test failed");
                CryptoError::InitializationFailure
            })
        })
    }
}
