// Copyright (C) Microsoft Corporation. All rights reserved.

//! OpenSSL primitive provider.
//!
//! Ciphers run through `EVP` contexts configured for the raw transform (ECB
//! for block ciphers, the bare keystream for ARCFOUR) with padding disabled;
//! chaining is done by the handle layer. Digests use `EVP_MD` contexts, which
//! duplicate cheaply for handle cloning. HMAC is the [`PadMac`] construction
//! over those digest states, since `EVP_MAC` contexts cannot be duplicated
//! through the safe bindings.
//!
//! DES, ARCFOUR and MD5 may require the legacy provider on OpenSSL 3.
//! ARCTWO-40 is not provided: the safe bindings cannot set the 40-bit
//! effective key length.

use std::mem::size_of;
use std::sync::OnceLock;

use openssl::hash::Hasher;
use openssl::hash::MessageDigest;
use openssl::symm::Cipher;
use openssl::symm::Crypter;
use openssl::symm::Mode;

use super::*;

/// Oldest OpenSSL release accepted at initialization (1.1.0).
const MIN_OPENSSL_VERSION: i64 = 0x1010_0000;

/// OpenSSL primitive provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsslBackend;

/// Keyed `EVP_CIPHER_CTX` for one direction.
pub struct OsslSchedule {
    crypter: Crypter,
    block_size: usize,
}

fn ossl_cipher(algo: CipherAlgo) -> Result<Cipher, CryptoError> {
    match algo {
        CipherAlgo::Aes256 => Ok(Cipher::aes_256_ecb()),
        CipherAlgo::Aes128 => Ok(Cipher::aes_128_ecb()),
        CipherAlgo::Des3 => Ok(Cipher::des_ede3()),
        CipherAlgo::Des => Ok(Cipher::des_ecb()),
        CipherAlgo::Arcfour128 | CipherAlgo::Arcfour40 => Ok(Cipher::rc4()),
        CipherAlgo::Arctwo40 => Err(CryptoError::UnsupportedAlgorithm),
    }
}

fn ossl_digest(algo: HashAlgo) -> Result<MessageDigest, CryptoError> {
    match algo {
        HashAlgo::Md5 => Ok(MessageDigest::md5()),
        HashAlgo::Sha1 => Ok(MessageDigest::sha1()),
        HashAlgo::Rmd160 => Err(CryptoError::UnsupportedAlgorithm),
    }
}

fn transform(schedule: &mut OsslSchedule, data: &mut [u8]) -> Result<(), CryptoError> {
    if data.len() % schedule.block_size != 0 {
        Err(CryptoError::InvalidInputSize)?;
    }
    if data.is_empty() {
        return Ok(());
    }

    // EVP needs one spare block of output room and cannot run in place.
    let input = data.to_vec();
    let mut output = vec![0u8; input.len() + schedule.block_size];
    let count = schedule
        .crypter
        .update(&input, &mut output)
        .map_err(|e| {
            tracing::error!(?e, "EVP cipher update failed");
            CryptoError::CipherError
        })?;
    if count != data.len() {
        tracing::error!(count, expected = data.len(), "EVP cipher returned short output");
        Err(CryptoError::CipherError)?;
    }
    data.copy_from_slice(&output[..count]);
    Ok(())
}

impl CipherBackend for OsslBackend {
    type Schedule = OsslSchedule;

    fn is_supported(algo: CipherAlgo) -> bool {
        ossl_cipher(algo).is_ok()
    }

    fn schedule_size(_algo: CipherAlgo) -> usize {
        size_of::<OsslSchedule>()
    }

    fn schedule(
        algo: CipherAlgo,
        direction: CipherDirection,
        key: &[u8],
    ) -> Result<Self::Schedule, CryptoError> {
        let cipher = ossl_cipher(algo)?;
        if key.len() != algo.key_size() {
            Err(CryptoError::InvalidKeyLength)?;
        }

        let mode = match direction {
            CipherDirection::Encrypt => Mode::Encrypt,
            CipherDirection::Decrypt => Mode::Decrypt,
        };
        let mut crypter = Crypter::new(cipher, mode, key, None).map_err(|e| {
            tracing::error!(?e, ?algo, "EVP cipher init failed");
            CryptoError::CipherError
        })?;
        crypter.pad(false);

        Ok(OsslSchedule {
            crypter,
            block_size: algo.block_size(),
        })
    }

    fn encrypt(schedule: &mut Self::Schedule, data: &mut [u8]) -> Result<(), CryptoError> {
        transform(schedule, data)
    }

    fn decrypt(schedule: &mut Self::Schedule, data: &mut [u8]) -> Result<(), CryptoError> {
        transform(schedule, data)
    }
}

impl HashBackend for OsslBackend {
    type State = Hasher;
    type Mac = PadMac<Hasher>;

    fn is_supported(algo: HashAlgo) -> bool {
        ossl_digest(algo).is_ok()
    }

    fn state_size(_algo: HashAlgo) -> usize {
        size_of::<Hasher>()
    }

    fn init(algo: HashAlgo) -> Result<Self::State, CryptoError> {
        let md = ossl_digest(algo)?;
        Hasher::new(md).map_err(|e| {
            tracing::error!(?e, ?algo, "EVP digest init failed");
            CryptoError::HashError
        })
    }

    fn update(state: &mut Self::State, data: &[u8]) -> Result<(), CryptoError> {
        state.update(data).map_err(|e| {
            tracing::error!(?e, "EVP digest update failed");
            CryptoError::HashError
        })
    }

    fn finish(mut state: Self::State, out: &mut [u8]) -> Result<usize, CryptoError> {
        let digest = state.finish().map_err(|e| {
            tracing::error!(?e, "EVP digest final failed");
            CryptoError::HashError
        })?;
        let out = out
            .get_mut(..digest.len())
            .ok_or(CryptoError::HashBufferTooSmall)?;
        out.copy_from_slice(&digest);
        Ok(digest.len())
    }

    fn hmac_init(algo: HashAlgo, key: &[u8]) -> Result<Self::Mac, CryptoError> {
        pad_mac_init::<Self>(algo, key)
    }

    fn hmac_update(mac: &mut Self::Mac, data: &[u8]) -> Result<(), CryptoError> {
        pad_mac_update::<Self>(mac, data)
    }

    fn hmac_finish(mac: Self::Mac, out: &mut [u8]) -> Result<usize, CryptoError> {
        pad_mac_finish::<Self>(mac, out)
    }
}

impl Backend for OsslBackend {
    const NAME: &'static str = "OpenSSL";

    fn version() -> &'static str {
        openssl::version::version()
    }

    fn initialize() -> Result<(), CryptoError> {
        static INIT: OnceLock<Result<(), CryptoError>> = OnceLock::new();

        *INIT.get_or_init(|| {
            openssl::init();
            let number = openssl::version::number();
            if number < MIN_OPENSSL_VERSION {
                tracing::error!(
                    version = Self::version(),
                    "OpenSSL release is older than the supported minimum"
                );
                return Err(CryptoError::InitializationFailure);
            }
            tracing::debug!(version = Self::version(), "OpenSSL initialized");
            Ok(())
        })
    }
}
