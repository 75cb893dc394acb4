//! Directory-backed device used for tests and offline runs.
//!
//! [`LocalDevice`] implements the [`Device`] contract against a host
//! directory opened through a cap-std capability, so remote paths can never
//! resolve outside the chosen root. It plays the same role for this crate
//! that a loopback destination plays for a network transport: every
//! behavioural property of the device contract can be exercised without
//! hardware attached.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use thiserror::Error;

use crate::device::{Device, RemotePathBuf};

/// Base path reported by [`LocalDevice::device_root`].
pub const LOCAL_DEVICE_ROOT: &str = "/tether-tests";

/// Errors raised by the directory-backed device.
#[derive(Debug, Error)]
pub enum LocalDeviceError {
    /// Raised when the host directory cannot be opened.
    #[error("failed to open local device root {path}: {message}")]
    Open {
        /// Host directory that could not be opened.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when the local file to push cannot be read.
    #[error("failed to read local file {path}: {message}")]
    LocalRead {
        /// Local file that could not be read.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when a filesystem operation inside the device root fails.
    #[error("failed to access {path} on the device: {message}")]
    Remote {
        /// Remote path that could not be accessed.
        path: RemotePathBuf,
        /// Human-readable error message.
        message: String,
    },
}

/// Device backed by a host directory instead of attached hardware.
#[derive(Debug)]
pub struct LocalDevice {
    root: Dir,
}

impl LocalDevice {
    /// Opens a device rooted at the given host directory.
    ///
    /// # Errors
    ///
    /// Returns [`LocalDeviceError::Open`] when the directory does not exist
    /// or cannot be opened.
    pub fn open(host_root: &Utf8Path) -> Result<Self, LocalDeviceError> {
        let root = Dir::open_ambient_dir(host_root, ambient_authority()).map_err(|err| {
            LocalDeviceError::Open {
                path: host_root.to_path_buf(),
                message: err.to_string(),
            }
        })?;
        Ok(Self { root })
    }

    /// Maps a remote path to a path relative to the capability root.
    fn relative(remote: &RemotePathBuf) -> Utf8PathBuf {
        let trimmed = remote.as_str().trim_start_matches('/');
        if trimmed.is_empty() {
            Utf8PathBuf::from(".")
        } else {
            Utf8PathBuf::from(trimmed)
        }
    }

    fn remote_error(remote: &RemotePathBuf, err: &std::io::Error) -> LocalDeviceError {
        LocalDeviceError::Remote {
            path: remote.clone(),
            message: err.to_string(),
        }
    }
}

impl Device for LocalDevice {
    type Error = LocalDeviceError;

    fn device_root(&self) -> Result<RemotePathBuf, Self::Error> {
        let root = RemotePathBuf::new(LOCAL_DEVICE_ROOT);
        self.root
            .create_dir_all(Self::relative(&root))
            .map_err(|err| Self::remote_error(&root, &err))?;
        Ok(root)
    }

    fn push_file(&self, local: &Utf8Path, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        let bytes = std::fs::read(local).map_err(|err| LocalDeviceError::LocalRead {
            path: local.to_path_buf(),
            message: err.to_string(),
        })?;

        if let Some(parent) = remote.parent() {
            let rel_parent = Self::relative(&parent);
            if rel_parent != Utf8Path::new(".") {
                self.root
                    .create_dir_all(&rel_parent)
                    .map_err(|err| Self::remote_error(remote, &err))?;
            }
        }

        self.root
            .write(Self::relative(remote), &bytes)
            .map_err(|err| Self::remote_error(remote, &err))
    }

    fn pull_file(&self, remote: &RemotePathBuf) -> Result<Option<Vec<u8>>, Self::Error> {
        match self.root.read(Self::relative(remote)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::remote_error(remote, &err)),
        }
    }

    fn remove_file(&self, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        match self.root.remove_file(Self::relative(remote)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::remote_error(remote, &err)),
        }
    }

    fn file_exists(&self, remote: &RemotePathBuf) -> Result<bool, Self::Error> {
        match self.root.metadata(Self::relative(remote)) {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(Self::remote_error(remote, &err)),
        }
    }

    fn make_dirs(&self, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        self.root
            .create_dir_all(Self::relative(remote))
            .map_err(|err| Self::remote_error(remote, &err))
    }

    fn remove_dir(&self, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        match self.root.remove_dir_all(Self::relative(remote)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::remote_error(remote, &err)),
        }
    }

    fn list_files(&self, remote: &RemotePathBuf) -> Result<Vec<String>, Self::Error> {
        let entries = self
            .root
            .read_dir(Self::relative(remote))
            .map_err(|err| Self::remote_error(remote, &err))?;

        let mut names = Vec::new();
        for entry_result in entries {
            let entry = entry_result.map_err(|err| Self::remote_error(remote, &err))?;
            let name = entry
                .file_name()
                .map_err(|err| Self::remote_error(remote, &err))?;
            names.push(name);
        }
        names.sort_unstable();
        Ok(names)
    }
}
