//! Core library for the tether device file-transfer tool.
//!
//! The crate exposes a blocking device-manager abstraction for moving files
//! to and from a target under test, two implementations of it (the system
//! `adb` client and a sandboxed host directory), and a verification harness
//! that checks any device for byte-exact round trips and honest missing-file
//! reporting.

pub mod adb;
pub mod check;
pub mod checksum;
pub mod device;
pub mod local;
pub mod runner;
pub mod test_support;

pub use adb::{AdbConfig, AdbConfigLoadError, AdbDevice, AdbError, DEFAULT_REMOTE_ROOT};
pub use check::{CheckError, CheckReport, DeviceCheck, MISSING_PROBE_NAME};
pub use checksum::{ChecksumError, Digest};
pub use device::{Device, RemotePathBuf};
pub use local::{LOCAL_DEVICE_ROOT, LocalDevice, LocalDeviceError};
pub use runner::{CommandOutput, CommandRunner, ProcessCommandRunner, RunnerError};
