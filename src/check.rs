//! Device verification procedure: byte-exact round trips and honest absence.
//!
//! [`DeviceCheck`] runs two sequential probes against any [`Device`]. The
//! round-trip phase pushes a local file and pulls it back, comparing digests
//! of the two byte streams. The missing-file phase deletes a path that must
//! not exist and confirms that pulling it reports absence rather than an
//! error or fabricated content. Both phases fail loudly with printable
//! digests so mismatches can be eyeballed.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::checksum::{ChecksumError, Digest};
use crate::device::{Device, RemotePathBuf};

/// Remote name used by the missing-file phase.
pub const MISSING_PROBE_NAME: &str = "doesnotexist";

/// Errors surfaced while verifying a device.
#[derive(Debug, Error)]
pub enum CheckError<DeviceError>
where
    DeviceError: std::error::Error + 'static,
{
    /// Raised when a device operation fails outright.
    #[error("device operation failed: {0}")]
    Device(#[source] DeviceError),
    /// Raised when the local file cannot be used as round-trip input.
    #[error("local file {path} is not usable: {message}")]
    Local {
        /// Local path that could not be used.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when the file just pushed cannot be pulled back.
    #[error("pushed file vanished: pull of {remote} found nothing")]
    MissingPull {
        /// Remote path that unexpectedly reported absence.
        remote: RemotePathBuf,
    },
    /// Raised when the pulled bytes differ from the pushed bytes.
    #[error("round trip corrupted content: pushed {expected}, pulled {actual}")]
    DigestMismatch {
        /// Digest of the local file.
        expected: Digest,
        /// Digest of the pulled content.
        actual: Digest,
    },
    /// Raised when pulling an absent path yields content instead of `None`.
    #[error("pull of absent {remote} returned {len} bytes instead of nothing")]
    UnexpectedContent {
        /// Remote path that should have been absent.
        remote: RemotePathBuf,
        /// Length of the fabricated content.
        len: usize,
    },
}

/// Outcome of a successful verification run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CheckReport {
    /// Remote path the round-trip file was pushed to. The file is left in
    /// place after a successful run.
    pub remote: RemotePathBuf,
    /// Digest both sides agreed on.
    pub digest: Digest,
}

/// Runs the verification procedure against a device.
#[derive(Debug)]
pub struct DeviceCheck<D: Device> {
    device: D,
}

impl<D: Device> DeviceCheck<D> {
    /// Wraps the device to verify.
    #[must_use]
    pub const fn new(device: D) -> Self {
        Self { device }
    }

    /// Returns a reference to the wrapped device.
    #[must_use]
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Runs both phases: the binary round trip, then the missing-file probe.
    ///
    /// # Errors
    ///
    /// Returns the first [`CheckError`] encountered; a passing run implies
    /// both phases held.
    pub fn run(&self, local: &Utf8Path) -> Result<CheckReport, CheckError<D::Error>> {
        let report = self.round_trip(local)?;
        self.missing_file()?;
        Ok(report)
    }

    /// Pushes `local` to the device root and pulls it back, comparing
    /// digests of the two byte streams.
    ///
    /// Any stale remote copy is deleted before the push so the pull cannot
    /// observe leftovers from an earlier run.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Local`] when the local file is unreadable or has
    /// no file name, [`CheckError::Device`] for transport failures,
    /// [`CheckError::MissingPull`] when the pushed file cannot be pulled, and
    /// [`CheckError::DigestMismatch`] when content differs.
    pub fn round_trip(&self, local: &Utf8Path) -> Result<CheckReport, CheckError<D::Error>> {
        let file_name = local.file_name().ok_or_else(|| CheckError::Local {
            path: local.to_path_buf(),
            message: String::from("path has no file name"),
        })?;
        let expected = Digest::from_path(local).map_err(|err| match err {
            ChecksumError::Io { path, message } => CheckError::Local { path, message },
        })?;

        let root = self.device.device_root().map_err(CheckError::Device)?;
        let remote = root.join(file_name);

        self.device
            .remove_file(&remote)
            .map_err(CheckError::Device)?;
        self.device
            .push_file(local, &remote)
            .map_err(CheckError::Device)?;

        let pulled = self
            .device
            .pull_file(&remote)
            .map_err(CheckError::Device)?
            .ok_or_else(|| CheckError::MissingPull {
                remote: remote.clone(),
            })?;

        let actual = Digest::from_bytes(&pulled);
        if actual != expected {
            return Err(CheckError::DigestMismatch { expected, actual });
        }

        Ok(CheckReport {
            remote,
            digest: actual,
        })
    }

    /// Confirms that pulling a path known not to exist reports absence.
    ///
    /// The path is deleted first, just to be sure, relying on tolerant
    /// delete semantics.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Device`] for transport failures and
    /// [`CheckError::UnexpectedContent`] when the pull fabricates content.
    pub fn missing_file(&self) -> Result<(), CheckError<D::Error>> {
        let root = self.device.device_root().map_err(CheckError::Device)?;
        let remote = root.join(MISSING_PROBE_NAME);

        self.device
            .remove_file(&remote)
            .map_err(CheckError::Device)?;

        match self.device.pull_file(&remote).map_err(CheckError::Device)? {
            None => Ok(()),
            Some(content) => Err(CheckError::UnexpectedContent {
                remote,
                len: content.len(),
            }),
        }
    }
}
