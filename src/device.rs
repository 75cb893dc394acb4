//! Device-manager abstraction for file transfer to a tethered test target.
//!
//! A [`Device`] moves files between the host and a remote target under test.
//! Implementations own the transport; callers only see blocking operations
//! with explicit absence semantics: pulling a missing file yields `Ok(None)`
//! and deleting a missing file succeeds silently, so probing for absence
//! never requires catching an error.

use camino::Utf8Path;

mod path;

pub use path::RemotePathBuf;

/// Blocking file-transfer interface to a target device.
pub trait Device {
    /// Transport specific error type returned by the device.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the base path on the target under which test artifacts are
    /// placed, creating it when it does not yet exist.
    fn device_root(&self) -> Result<RemotePathBuf, Self::Error>;

    /// Transfers the local file's bytes to `remote`, fully overwriting any
    /// prior content at that path.
    fn push_file(&self, local: &Utf8Path, remote: &RemotePathBuf) -> Result<(), Self::Error>;

    /// Fetches the full content of the remote file.
    ///
    /// Returns `Ok(None)` when `remote` does not exist. A zero-length file
    /// yields `Ok(Some(vec![]))`, which callers must treat as distinct from
    /// absence.
    fn pull_file(&self, remote: &RemotePathBuf) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Deletes the file at `remote`, succeeding silently when it does not
    /// exist.
    fn remove_file(&self, remote: &RemotePathBuf) -> Result<(), Self::Error>;

    /// Returns `true` when `remote` names an existing regular file.
    fn file_exists(&self, remote: &RemotePathBuf) -> Result<bool, Self::Error>;

    /// Creates the directory at `remote` together with any missing parents.
    fn make_dirs(&self, remote: &RemotePathBuf) -> Result<(), Self::Error>;

    /// Recursively deletes the directory at `remote`, succeeding silently
    /// when it does not exist.
    fn remove_dir(&self, remote: &RemotePathBuf) -> Result<(), Self::Error>;

    /// Lists the entry names of the remote directory.
    fn list_files(&self, remote: &RemotePathBuf) -> Result<Vec<String>, Self::Error>;
}
