//! Command-line interface definitions for the `tether` binary.
//!
//! This module centralises the clap parser structures so both the main
//! binary and the build script can reuse them when generating the manual
//! page.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Top-level CLI for the `tether` binary.
#[derive(Debug, Parser)]
#[command(
    name = "tether",
    about = "Push, pull, and verify files on a tethered test device",
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    /// Use a host directory as the device instead of the adb client.
    ///
    /// Remote paths are then resolved inside this directory, which is useful
    /// for dry runs and for exercising workflows without hardware attached.
    #[arg(long, value_name = "DIR", global = true)]
    pub(crate) local_root: Option<Utf8PathBuf>,
    /// Operation to perform against the device.
    #[command(subcommand)]
    pub(crate) command: DeviceCommand,
}

/// Subcommands operating on the selected device.
#[derive(Debug, Subcommand)]
pub(crate) enum DeviceCommand {
    /// Print the base path for test artifacts on the device.
    #[command(name = "root", about = "Print the device root path")]
    Root,
    /// Push a local file to the device.
    #[command(name = "push", about = "Push a local file to the device")]
    Push(PushCommand),
    /// Pull a remote file from the device.
    #[command(name = "pull", about = "Pull a remote file from the device")]
    Pull(PullCommand),
    /// Remove a remote file.
    #[command(name = "rm", about = "Remove a remote file, tolerating absence")]
    Rm(RmCommand),
    /// List a remote directory.
    #[command(name = "ls", about = "List entries of a remote directory")]
    Ls(LsCommand),
    /// Verify the device with a round trip and a missing-file probe.
    #[command(
        name = "check",
        about = "Verify push/pull round trips and missing-file reporting"
    )]
    Check(CheckCommand),
}

/// Arguments for the `tether push` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct PushCommand {
    /// Local file whose bytes are transferred.
    #[arg(value_name = "LOCAL")]
    pub(crate) local: Utf8PathBuf,
    /// Destination path on the device; relative paths resolve under the
    /// device root.
    #[arg(value_name = "REMOTE")]
    pub(crate) remote: String,
}

/// Arguments for the `tether pull` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct PullCommand {
    /// Path on the device to fetch; relative paths resolve under the device
    /// root.
    #[arg(value_name = "REMOTE")]
    pub(crate) remote: String,
    /// Local file to write; the raw bytes go to stdout when omitted.
    #[arg(value_name = "LOCAL")]
    pub(crate) local: Option<Utf8PathBuf>,
}

/// Arguments for the `tether rm` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct RmCommand {
    /// Path on the device to delete; succeeds even when already absent.
    #[arg(value_name = "REMOTE")]
    pub(crate) remote: String,
}

/// Arguments for the `tether ls` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct LsCommand {
    /// Directory on the device to list; defaults to the device root.
    #[arg(value_name = "REMOTE")]
    pub(crate) remote: Option<String>,
}

/// Arguments for the `tether check` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct CheckCommand {
    /// Local file used as the round-trip payload.
    #[arg(value_name = "LOCAL")]
    pub(crate) local: Utf8PathBuf,
}
