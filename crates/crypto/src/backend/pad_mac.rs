// Copyright (C) Microsoft Corporation. All rights reserved.

//! RFC 2104 HMAC assembled from a provider's own digest states.
//!
//! Used by providers whose native MAC context cannot be duplicated. The key
//! is hashed first when longer than the block, zero padded to the block and
//! XORed with the ipad and opad constants. Each padded block is absorbed
//! into a fresh digest state once; cloning the resulting [`PadMac`] reuses
//! both states for the next message.
//!
//! Key blocks and the intermediate inner digest are zeroized on drop.

use zeroize::Zeroizing;

use super::*;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// Inner and outer digest states with the key pads already absorbed.
#[derive(Clone)]
pub struct PadMac<S> {
    inner: S,
    outer: S,
}

/// Keys a [`PadMac`] over `B`'s digest states.
pub(crate) fn pad_mac_init<B: HashBackend>(
    algo: HashAlgo,
    key: &[u8],
) -> Result<PadMac<B::State>, CryptoError> {
    let block_size = algo.block_size();
    let mut block = Zeroizing::new([0u8; HASH_BLOCK_SIZE]);
    if key.len() > block_size {
        let mut state = B::init(algo)?;
        B::update(&mut state, key)?;
        B::finish(state, &mut block[..])?;
    } else {
        block[..key.len()].copy_from_slice(key);
    }

    let padded = |pad: u8| -> Result<B::State, CryptoError> {
        let mut xored = Zeroizing::new([0u8; HASH_BLOCK_SIZE]);
        xored
            .iter_mut()
            .zip(block.iter())
            .for_each(|(x, k)| *x = k ^ pad);
        let mut state = B::init(algo)?;
        B::update(&mut state, &xored[..block_size])?;
        Ok(state)
    };

    Ok(PadMac {
        inner: padded(IPAD)?,
        outer: padded(OPAD)?,
    })
}

/// Absorbs message bytes into the inner state.
pub(crate) fn pad_mac_update<B: HashBackend>(
    mac: &mut PadMac<B::State>,
    data: &[u8],
) -> Result<(), CryptoError> {
    B::update(&mut mac.inner, data)
}

/// Completes the MAC: `outer(inner(message))`.
pub(crate) fn pad_mac_finish<B: HashBackend>(
    mac: PadMac<B::State>,
    out: &mut [u8],
) -> Result<usize, CryptoError> {
    let PadMac { inner, mut outer } = mac;
    let mut inner_digest = Zeroizing::new([0u8; MAX_DIGEST_SIZE]);
    let len = B::finish(inner, &mut inner_digest[..])?;
    B::update(&mut outer, &inner_digest[..len])?;
    B::finish(outer, out)
}
