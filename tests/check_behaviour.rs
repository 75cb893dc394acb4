//! Behavioural coverage for the device verification harness.
//!
//! In-memory devices stand in for transports with specific defects so each
//! failure mode of the check is observable: corrupted content, fabricated
//! content for missing paths, and files that vanish after a push.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use rstest::{fixture, rstest};
use tempfile::TempDir;
use tether::check::{CheckError, DeviceCheck, MISSING_PROBE_NAME};
use tether::device::{Device, RemotePathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
enum MemoryError {
    #[error("failed to read local file {path}: {message}")]
    LocalRead { path: Utf8PathBuf, message: String },
    #[error("no such directory: {0}")]
    NoSuchDirectory(RemotePathBuf),
}

/// Honest in-memory device.
#[derive(Debug, Default)]
struct MemoryDevice {
    files: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryDevice {
    fn contains(&self, remote: &RemotePathBuf) -> bool {
        self.files.borrow().contains_key(remote.as_str())
    }
}

impl Device for MemoryDevice {
    type Error = MemoryError;

    fn device_root(&self) -> Result<RemotePathBuf, Self::Error> {
        Ok(RemotePathBuf::new("/memory"))
    }

    fn push_file(&self, local: &Utf8Path, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        let bytes = fs::read(local).map_err(|err| MemoryError::LocalRead {
            path: local.to_path_buf(),
            message: err.to_string(),
        })?;
        self.files
            .borrow_mut()
            .insert(remote.as_str().to_owned(), bytes);
        Ok(())
    }

    fn pull_file(&self, remote: &RemotePathBuf) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.files.borrow().get(remote.as_str()).cloned())
    }

    fn remove_file(&self, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        self.files.borrow_mut().remove(remote.as_str());
        Ok(())
    }

    fn file_exists(&self, remote: &RemotePathBuf) -> Result<bool, Self::Error> {
        Ok(self.contains(remote))
    }

    fn make_dirs(&self, _remote: &RemotePathBuf) -> Result<(), Self::Error> {
        Ok(())
    }

    fn remove_dir(&self, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        let prefix = format!("{}/", remote.as_str());
        self.files
            .borrow_mut()
            .retain(|path, _| !path.starts_with(&prefix));
        Ok(())
    }

    fn list_files(&self, remote: &RemotePathBuf) -> Result<Vec<String>, Self::Error> {
        let prefix = format!("{}/", remote.as_str());
        let names: Vec<String> = self
            .files
            .borrow()
            .keys()
            .filter_map(|path| path.strip_prefix(&prefix))
            .map(str::to_owned)
            .collect();
        if names.is_empty() && !self.contains(remote) {
            return Err(MemoryError::NoSuchDirectory(remote.clone()));
        }
        Ok(names)
    }
}

/// Device whose pulls flip the first byte of real content.
#[derive(Debug, Default)]
struct CorruptingDevice {
    inner: MemoryDevice,
}

impl Device for CorruptingDevice {
    type Error = MemoryError;

    fn device_root(&self) -> Result<RemotePathBuf, Self::Error> {
        self.inner.device_root()
    }

    fn push_file(&self, local: &Utf8Path, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        self.inner.push_file(local, remote)
    }

    fn pull_file(&self, remote: &RemotePathBuf) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.inner.pull_file(remote)?.map(|mut bytes| {
            if let Some(first) = bytes.first_mut() {
                *first ^= 0xFF;
            }
            bytes
        }))
    }

    fn remove_file(&self, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        self.inner.remove_file(remote)
    }

    fn file_exists(&self, remote: &RemotePathBuf) -> Result<bool, Self::Error> {
        self.inner.file_exists(remote)
    }

    fn make_dirs(&self, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        self.inner.make_dirs(remote)
    }

    fn remove_dir(&self, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        self.inner.remove_dir(remote)
    }

    fn list_files(&self, remote: &RemotePathBuf) -> Result<Vec<String>, Self::Error> {
        self.inner.list_files(remote)
    }
}

/// Device that fabricates content when pulling missing paths, and drops
/// pushed files entirely.
#[derive(Debug, Default)]
struct FabricatingDevice {
    inner: MemoryDevice,
    fabricate: bool,
}

impl Device for FabricatingDevice {
    type Error = MemoryError;

    fn device_root(&self) -> Result<RemotePathBuf, Self::Error> {
        self.inner.device_root()
    }

    fn push_file(&self, _local: &Utf8Path, _remote: &RemotePathBuf) -> Result<(), Self::Error> {
        // Pretends to succeed while writing nothing.
        Ok(())
    }

    fn pull_file(&self, remote: &RemotePathBuf) -> Result<Option<Vec<u8>>, Self::Error> {
        if self.fabricate {
            return Ok(Some(b"ghost content".to_vec()));
        }
        self.inner.pull_file(remote)
    }

    fn remove_file(&self, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        self.inner.remove_file(remote)
    }

    fn file_exists(&self, remote: &RemotePathBuf) -> Result<bool, Self::Error> {
        self.inner.file_exists(remote)
    }

    fn make_dirs(&self, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        self.inner.make_dirs(remote)
    }

    fn remove_dir(&self, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        self.inner.remove_dir(remote)
    }

    fn list_files(&self, remote: &RemotePathBuf) -> Result<Vec<String>, Self::Error> {
        self.inner.list_files(remote)
    }
}

struct Payload {
    path: Utf8PathBuf,
    _tmp: TempDir,
}

#[fixture]
fn payload() -> Payload {
    let tmp = TempDir::new().expect("create temp directory");
    let dir = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf())
        .expect("temp path should be valid UTF-8");
    let path = dir.join("mybinary.zip");
    fs::write(&path, b"PK\x03\x04\x00\xFFround trip body\r\n").expect("write payload");
    Payload { path, _tmp: tmp }
}

#[rstest]
fn check_passes_on_a_faithful_device(payload: Payload) {
    let check = DeviceCheck::new(MemoryDevice::default());

    let report = check.run(&payload.path).expect("verification should pass");

    assert_eq!(report.remote.as_str(), "/memory/mybinary.zip");
    // The round-trip artifact stays behind on success.
    assert!(check.device().contains(&report.remote));
    // The missing-file probe left nothing behind either.
    let probe = RemotePathBuf::new("/memory").join(MISSING_PROBE_NAME);
    assert!(!check.device().contains(&probe));
}

#[rstest]
fn corrupted_pulls_are_reported_with_both_digests(payload: Payload) {
    let check = DeviceCheck::new(CorruptingDevice::default());

    let err = check
        .run(&payload.path)
        .expect_err("corruption should fail the check");

    let CheckError::DigestMismatch { expected, actual } = err else {
        panic!("expected DigestMismatch, got {err:?}");
    };
    assert_ne!(expected, actual);
}

#[rstest]
fn fabricated_content_for_missing_paths_is_rejected() {
    let device = FabricatingDevice {
        fabricate: true,
        ..FabricatingDevice::default()
    };
    // Probe the missing-file phase directly; the round trip would already
    // trip over the fabricated pull.
    let check = DeviceCheck::new(device);
    let err = check
        .missing_file()
        .expect_err("fabricated content should fail the check");

    let CheckError::UnexpectedContent { remote, len } = err else {
        panic!("expected UnexpectedContent, got {err:?}");
    };
    assert_eq!(remote.as_str(), "/memory/doesnotexist");
    assert_eq!(len, b"ghost content".len());
}

#[rstest]
fn vanished_pushes_are_reported(payload: Payload) {
    // fabricate = false: pushes are dropped and pulls honestly report absence.
    let check = DeviceCheck::new(FabricatingDevice::default());

    let err = check
        .run(&payload.path)
        .expect_err("a vanished push should fail the check");

    assert!(
        matches!(err, CheckError::MissingPull { ref remote } if remote.as_str() == "/memory/mybinary.zip"),
        "got {err:?}"
    );
}

#[rstest]
fn unusable_local_paths_are_reported() {
    let check = DeviceCheck::new(MemoryDevice::default());

    let err = check
        .run(Utf8Path::new("/"))
        .expect_err("a rootless path should fail");
    assert!(matches!(err, CheckError::Local { .. }), "got {err:?}");

    let missing = check
        .run(Utf8Path::new("/no/such/payload.bin"))
        .expect_err("a missing local file should fail");
    assert!(matches!(missing, CheckError::Local { .. }), "got {missing:?}");
}
