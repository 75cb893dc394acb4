//! Binary entry point for the tether CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use thiserror::Error;

use tether::{AdbConfig, AdbDevice, Device, DeviceCheck, LocalDevice, RemotePathBuf};

mod cli;

use cli::{CheckCommand, Cli, DeviceCommand, LsCommand, PullCommand, PushCommand, RmCommand};

/// Errors surfaced to the user by the CLI.
#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("device error: {0}")]
    DeviceOp(String),
    #[error("remote file not found: {0}")]
    NotFound(String),
    #[error("verification failed: {0}")]
    Verify(String),
    #[error("failed to write output: {0}")]
    Output(String),
}

impl CliError {
    /// Missing remote files exit with 2 so scripts can tell absence from
    /// transport failures.
    const fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) => 2,
            Self::Config(_) | Self::DeviceOp(_) | Self::Verify(_) | Self::Output(_) => 1,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            report_error(&err);
            err.exit_code()
        }
    };

    process::exit(exit_code);
}

fn dispatch(cli: Cli) -> Result<i32, CliError> {
    match cli.local_root {
        Some(ref root) => {
            let device =
                LocalDevice::open(root).map_err(|err| CliError::Config(err.to_string()))?;
            run_command(device, cli.command)
        }
        None => {
            let config =
                AdbConfig::load_from_sources().map_err(|err| CliError::Config(err.to_string()))?;
            let device = AdbDevice::with_process_runner(config)
                .map_err(|err| CliError::Config(err.to_string()))?;
            run_command(device, cli.command)
        }
    }
}

fn run_command<D: Device>(device: D, command: DeviceCommand) -> Result<i32, CliError> {
    match command {
        DeviceCommand::Root => {
            let root = device.device_root().map_err(device_error)?;
            write_line(&root.to_string())?;
        }
        DeviceCommand::Push(PushCommand { local, remote }) => {
            let target = resolve_remote(&device, &remote)?;
            device.push_file(&local, &target).map_err(device_error)?;
        }
        DeviceCommand::Pull(PullCommand { remote, local }) => {
            let target = resolve_remote(&device, &remote)?;
            let bytes = device
                .pull_file(&target)
                .map_err(device_error)?
                .ok_or_else(|| CliError::NotFound(target.to_string()))?;
            deliver_pulled(local.as_deref(), &bytes)?;
        }
        DeviceCommand::Rm(RmCommand { remote }) => {
            let target = resolve_remote(&device, &remote)?;
            device.remove_file(&target).map_err(device_error)?;
        }
        DeviceCommand::Ls(LsCommand { remote }) => {
            let target = match remote {
                Some(ref path) => resolve_remote(&device, path)?,
                None => device.device_root().map_err(device_error)?,
            };
            let names = device.list_files(&target).map_err(device_error)?;
            for name in names {
                write_line(&name)?;
            }
        }
        DeviceCommand::Check(CheckCommand { local }) => {
            let check = DeviceCheck::new(device);
            let report = check
                .run(&local)
                .map_err(|err| CliError::Verify(err.to_string()))?;
            write_line(&format!(
                "round trip verified: {} ({})",
                report.remote, report.digest
            ))?;
        }
    }

    Ok(0)
}

/// Resolves a user-supplied remote path, joining relative paths under the
/// device root.
fn resolve_remote<D: Device>(device: &D, remote: &str) -> Result<RemotePathBuf, CliError> {
    let path = RemotePathBuf::new(remote);
    if path.is_absolute() {
        return Ok(path);
    }
    let root = device.device_root().map_err(device_error)?;
    Ok(root.join(remote))
}

fn deliver_pulled(local: Option<&camino::Utf8Path>, bytes: &[u8]) -> Result<(), CliError> {
    match local {
        Some(path) => {
            std::fs::write(path, bytes).map_err(|err| CliError::Output(err.to_string()))
        }
        None => io::stdout()
            .write_all(bytes)
            .map_err(|err| CliError::Output(err.to_string())),
    }
}

fn device_error<E: std::error::Error>(err: E) -> CliError {
    CliError::DeviceOp(err.to_string())
}

fn write_line(line: &str) -> Result<(), CliError> {
    writeln!(io::stdout(), "{line}").map_err(|err| CliError::Output(err.to_string()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
