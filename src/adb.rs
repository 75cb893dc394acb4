//! Device implementation backed by the system `adb` client.
//!
//! All transport work is delegated to the external `adb` binary through a
//! [`CommandRunner`], the same way the host would drive it by hand: `adb
//! push`/`adb pull` for content transfer and `adb shell` one-liners for
//! probes and deletion. Remote paths embedded in shell command lines are
//! quoted before interpolation.

use std::borrow::Cow;
use std::ffi::OsString;
use std::sync::OnceLock;

use camino::{Utf8Path, Utf8PathBuf};
use shell_escape::unix::escape;
use thiserror::Error;
use uuid::Uuid;

use crate::device::{Device, RemotePathBuf};
use crate::runner::{CommandOutput, CommandRunner, ProcessCommandRunner, RunnerError};

mod config;

pub use config::{AdbConfig, AdbConfigLoadError, DEFAULT_REMOTE_ROOT};

/// Errors raised by the adb-backed device.
#[derive(Debug, Error)]
pub enum AdbError {
    /// Raised when a configuration field is missing or empty.
    #[error("missing or empty configuration field: {field}")]
    InvalidConfig {
        /// Name of the offending field.
        field: String,
    },
    /// Raised when the local file to push does not exist.
    #[error("local file not found: {path}")]
    MissingLocal {
        /// Local path that could not be found.
        path: Utf8PathBuf,
    },
    /// Raised when the `adb` client cannot be started.
    #[error(transparent)]
    Runner(#[from] RunnerError),
    /// Raised when an adb invocation exits unsuccessfully.
    #[error("{command} failed with status {status_text}: {stderr}")]
    CommandFailure {
        /// Invocation that failed, for example `adb push`.
        command: String,
        /// Exit code, when the process terminated normally.
        status: Option<i32>,
        /// Printable form of the exit status.
        status_text: String,
        /// Captured standard error.
        stderr: String,
    },
    /// Raised when the host-side staging area for a pull cannot be used.
    #[error("failed to stage pulled file: {message}")]
    Stage {
        /// Human-readable error message.
        message: String,
    },
}

/// Device driven through the system `adb` client.
#[derive(Debug)]
pub struct AdbDevice<R: CommandRunner> {
    config: AdbConfig,
    runner: R,
    resolved_root: OnceLock<RemotePathBuf>,
}

impl AdbDevice<ProcessCommandRunner> {
    /// Convenience constructor that wires the real process runner.
    ///
    /// # Errors
    ///
    /// Returns [`AdbError::InvalidConfig`] when validation fails.
    pub fn with_process_runner(config: AdbConfig) -> Result<Self, AdbError> {
        Self::new(config, ProcessCommandRunner)
    }
}

impl<R: CommandRunner> AdbDevice<R> {
    /// Creates a new device using the provided runner and configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdbError::InvalidConfig`] when configuration validation
    /// fails.
    pub fn new(config: AdbConfig, runner: R) -> Result<Self, AdbError> {
        config.validate()?;
        Ok(Self {
            config,
            runner,
            resolved_root: OnceLock::new(),
        })
    }

    /// Returns a reference to the underlying configuration.
    #[must_use]
    pub const fn config(&self) -> &AdbConfig {
        &self.config
    }

    fn base_args(&self) -> Vec<OsString> {
        let mut args = Vec::new();
        if let Some(ref serial) = self.config.serial {
            args.push(OsString::from("-s"));
            args.push(OsString::from(serial));
        }
        args
    }

    fn run_adb(&self, args: Vec<OsString>, label: &str) -> Result<CommandOutput, AdbError> {
        let output = self.runner.run(&self.config.adb_bin, &args)?;
        if output.is_success() {
            return Ok(output);
        }
        Err(Self::command_failure(label, &output))
    }

    /// Runs `command` through `adb shell` without checking the exit status.
    fn run_shell_raw(&self, command: String) -> Result<CommandOutput, AdbError> {
        let mut args = self.base_args();
        args.push(OsString::from("shell"));
        args.push(OsString::from(command));
        Ok(self.runner.run(&self.config.adb_bin, &args)?)
    }

    /// Runs `command` through `adb shell`, requiring a zero exit status.
    fn run_shell(&self, command: String, label: &str) -> Result<CommandOutput, AdbError> {
        let output = self.run_shell_raw(command)?;
        if output.is_success() {
            return Ok(output);
        }
        Err(Self::command_failure(label, &output))
    }

    fn command_failure(label: &str, output: &CommandOutput) -> AdbError {
        let status_text = output
            .code
            .map_or_else(|| String::from("unknown"), |code| code.to_string());
        AdbError::CommandFailure {
            command: label.to_owned(),
            status: output.code,
            status_text,
            stderr: output.stderr.clone(),
        }
    }

    fn quote(remote: &RemotePathBuf) -> String {
        escape(Cow::Borrowed(remote.as_str())).into_owned()
    }
}

impl<R: CommandRunner> Device for AdbDevice<R> {
    type Error = AdbError;

    fn device_root(&self) -> Result<RemotePathBuf, Self::Error> {
        if let Some(root) = self.resolved_root.get() {
            return Ok(root.clone());
        }

        let base = RemotePathBuf::new(self.config.remote_root.as_str());
        let root = if self.config.unique_root {
            base.join(&Uuid::new_v4().simple().to_string())
        } else {
            base
        };
        self.make_dirs(&root)?;
        Ok(self.resolved_root.get_or_init(|| root).clone())
    }

    fn push_file(&self, local: &Utf8Path, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        if !local.is_file() {
            return Err(AdbError::MissingLocal {
                path: local.to_path_buf(),
            });
        }

        if let Some(parent) = remote.parent() {
            self.make_dirs(&parent)?;
        }

        let mut args = self.base_args();
        args.push(OsString::from("push"));
        args.push(OsString::from(local.as_str()));
        args.push(OsString::from(remote.as_str()));
        self.run_adb(args, "adb push").map(|_| ())
    }

    fn pull_file(&self, remote: &RemotePathBuf) -> Result<Option<Vec<u8>>, Self::Error> {
        if !self.file_exists(remote)? {
            return Ok(None);
        }

        let staging = tempfile::tempdir().map_err(|err| AdbError::Stage {
            message: err.to_string(),
        })?;
        let staged = staging.path().join("pulled.bin");

        let mut args = self.base_args();
        args.push(OsString::from("pull"));
        args.push(OsString::from(remote.as_str()));
        args.push(staged.clone().into_os_string());
        self.run_adb(args, "adb pull")?;

        let bytes = std::fs::read(&staged).map_err(|err| AdbError::Stage {
            message: err.to_string(),
        })?;
        Ok(Some(bytes))
    }

    fn remove_file(&self, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        // rm -f exits successfully when the target is already absent.
        self.run_shell(format!("rm -f {}", Self::quote(remote)), "adb shell rm -f")
            .map(|_| ())
    }

    fn file_exists(&self, remote: &RemotePathBuf) -> Result<bool, Self::Error> {
        let output = self.run_shell_raw(format!("test -f {}", Self::quote(remote)))?;
        match output.code {
            Some(0) => Ok(true),
            // test -f exits 1 silently for a missing file; the adb client
            // reports its own failures (no device attached, device offline)
            // with the same exit code but a diagnostic on stderr.
            Some(1) if output.stderr.trim().is_empty() => Ok(false),
            _ => Err(Self::command_failure("adb shell test -f", &output)),
        }
    }

    fn make_dirs(&self, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        self.run_shell(
            format!("mkdir -p {}", Self::quote(remote)),
            "adb shell mkdir -p",
        )
        .map(|_| ())
    }

    fn remove_dir(&self, remote: &RemotePathBuf) -> Result<(), Self::Error> {
        self.run_shell(format!("rm -rf {}", Self::quote(remote)), "adb shell rm -rf")
            .map(|_| ())
    }

    fn list_files(&self, remote: &RemotePathBuf) -> Result<Vec<String>, Self::Error> {
        let output = self.run_shell(format!("ls -A {}", Self::quote(remote)), "adb shell ls -A")?;
        let names = output
            .stdout
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        Ok(names)
    }
}
