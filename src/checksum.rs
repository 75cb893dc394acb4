//! Content digests used to verify byte-exact round trips.

use core::fmt::{self, Display};
use core::str::FromStr;
use std::fs::File;
use std::io::Read;

use blake3::Hasher;
use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Hex-encoded BLAKE3 digest of a byte sequence.
///
/// Digests exist only to compare content for equality; the hex rendering
/// keeps mismatches printable in assertion and error output.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest(String);

/// Errors raised while computing a digest from the filesystem.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ChecksumError {
    /// Raised when the file cannot be opened or read.
    #[error("failed to read {path}: {message}")]
    Io {
        /// Path that could not be read.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
}

impl Digest {
    /// Computes the digest of the given bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize().as_bytes()))
    }

    /// Computes the digest of a file's content without loading it whole.
    ///
    /// # Errors
    ///
    /// Returns [`ChecksumError::Io`] when the file cannot be opened or read.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ChecksumError> {
        let io_error = |err: std::io::Error| ChecksumError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        };

        let mut file = File::open(path).map_err(io_error)?;
        let mut hasher = Hasher::new();
        let mut buffer = vec![0_u8; READ_BUFFER_SIZE];
        loop {
            let bytes_read = file.read(&mut buffer).map_err(io_error)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(buffer.get(..bytes_read).unwrap_or_default());
        }
        Ok(Self(hex::encode(hasher.finalize().as_bytes())))
    }

    /// Returns the lowercase hex rendering of the digest.
    #[must_use]
    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Digest {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = hex::decode(s)?;
        if decoded.len() != blake3::OUT_LEN {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        Ok(Self(hex::encode(decoded)))
    }
}
