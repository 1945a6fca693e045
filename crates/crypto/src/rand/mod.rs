// Copyright (C) Microsoft Corporation. All rights reserved.

//! Entropy sources.
//!
//! Random bytes come from three entropy classes, each read from its own OS
//! endpoint. An endpoint is opened per request, read until the caller's
//! buffer is full and closed again; a short read is not an error, but any
//! I/O failure, including a failed close, fails the whole request. A failed
//! request never returns partial output: the buffer is wiped.
//!
//! Reads may block on the endpoint and carry no timeout.

use std::fs::File;
use std::io::ErrorKind;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use zeroize::Zeroize;

use super::*;

/// Entropy class of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RandomLevel {
    /// Unpredictable but not secret values, such as nonces.
    Nonce,
    /// General purpose pseudo-random bytes.
    Pseudo,
    /// Key material.
    Strong,
}

/// Endpoint paths for the three entropy classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomSources {
    /// Endpoint for [`RandomLevel::Nonce`].
    pub nonce: PathBuf,
    /// Endpoint for [`RandomLevel::Pseudo`].
    pub pseudo: PathBuf,
    /// Endpoint for [`RandomLevel::Strong`].
    pub strong: PathBuf,
}

impl Default for RandomSources {
    fn default() -> Self {
        Self {
            nonce: PathBuf::from("/dev/urandom"),
            pseudo: PathBuf::from("/dev/urandom"),
            strong: PathBuf::from("/dev/random"),
        }
    }
}

impl RandomSources {
    /// Returns the endpoint bound to `level`.
    pub fn path(&self, level: RandomLevel) -> &Path {
        match level {
            RandomLevel::Nonce => &self.nonce,
            RandomLevel::Pseudo => &self.pseudo,
            RandomLevel::Strong => &self.strong,
        }
    }

    /// Fills `buf` from the endpoint bound to `level`.
    ///
    /// # Errors
    ///
    /// Returns `RandomSourceError` if the endpoint cannot be opened, read or
    /// closed, or ends before `buf` is full. `buf` is zeroed on error.
    pub fn fill(&self, level: RandomLevel, buf: &mut [u8]) -> Result<(), CryptoError> {
        let path = self.path(level);
        tracing::trace!(?level, len = buf.len(), "Entropy request");

        let result = read_endpoint(path, buf);
        if result.is_err() {
            buf.zeroize();
        }
        result
    }

    /// Returns `len` bytes from the endpoint bound to `level`.
    ///
    /// # Errors
    ///
    /// Same as [`fill`](Self::fill).
    pub fn random_vec(&self, level: RandomLevel, len: usize) -> Result<Vec<u8>, CryptoError> {
        let mut buf = vec![0u8; len];
        self.fill(level, &mut buf)?;
        Ok(buf)
    }
}

fn read_endpoint(path: &Path, buf: &mut [u8]) -> Result<(), CryptoError> {
    let mut file = File::open(path).map_err(|e| {
        tracing::error!(?e, path = %path.display(), "Failed to open entropy source");
        CryptoError::RandomSourceError
    })?;

    let filled = read_full(&mut file, buf);
    let closed = close_endpoint(file).map_err(|e| {
        tracing::error!(?e, path = %path.display(), "Failed to close entropy source");
        CryptoError::RandomSourceError
    });
    filled?;
    closed
}

/// Reads until `buf` is full, retrying interrupted reads.
pub(crate) fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), CryptoError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                tracing::error!(filled, wanted = buf.len(), "Entropy source ended early");
                Err(CryptoError::RandomSourceError)?;
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {
                tracing::warn!(filled, "Entropy read interrupted, retrying");
            }
            Err(e) => {
                tracing::error!(?e, filled, "Entropy source read failed");
                Err(CryptoError::RandomSourceError)?;
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
fn close_endpoint(file: File) -> std::io::Result<()> {
    use std::os::fd::IntoRawFd;

    let fd = file.into_raw_fd();
    // SAFETY: `fd` was just released by `into_raw_fd`, so this is its only
    // owner and it is closed exactly once.
    #[allow(unsafe_code)]
    let rc = unsafe { libc::close(fd) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn close_endpoint(file: File) -> std::io::Result<()> {
    drop(file);
    Ok(())
}
