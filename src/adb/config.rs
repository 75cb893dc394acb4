//! Configuration for the adb-backed device.
//!
//! Values merge defaults, configuration files, and environment variables via
//! `ortho-config`, mirroring the layering used for every other configurable
//! surface of the crate.

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use super::AdbError;

/// Default base path on the device for test artifacts.
pub const DEFAULT_REMOTE_ROOT: &str = "/data/local/tmp/tether-tests";

/// Settings for driving the system `adb` client.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "TETHER_ADB",
    discovery(
        app_name = "tether",
        env_var = "TETHER_CONFIG_PATH",
        config_file_name = "tether.toml",
        dotfile_name = ".tether.toml",
        project_file_name = "tether.toml"
    )
)]
pub struct AdbConfig {
    /// Path to the `adb` executable.
    #[ortho_config(default = "adb".to_owned())]
    pub adb_bin: String,
    /// Serial of the device to target (`adb -s`). Optional; when absent, adb
    /// picks the sole attached device and fails when several are attached.
    pub serial: Option<String>,
    /// Base path on the device under which test artifacts are placed.
    #[ortho_config(default = DEFAULT_REMOTE_ROOT.to_owned())]
    pub remote_root: String,
    /// Whether to nest a fresh uniquely named subdirectory under
    /// `remote_root` for the lifetime of the device handle, isolating
    /// concurrent runs that share a device.
    #[ortho_config(default = false)]
    pub unique_root: bool,
}

/// Errors raised when loading the adb configuration from layered sources.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum AdbConfigLoadError {
    /// Indicates that parsing or merging configuration layers failed.
    #[error("adb configuration parsing failed: {0}")]
    Parse(String),
}

impl AdbConfig {
    /// Loads configuration from defaults, discovered files, and environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns [`AdbConfigLoadError::Parse`] when the loader fails to merge
    /// sources.
    pub fn load_from_sources() -> Result<Self, AdbConfigLoadError> {
        Self::load_from_iter([std::ffi::OsString::from("tether")])
            .map_err(|err| AdbConfigLoadError::Parse(err.to_string()))
    }

    /// Ensures configuration values are present after trimming whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`AdbError::InvalidConfig`] when any required field is empty,
    /// or when `serial` is present but blank.
    pub fn validate(&self) -> Result<(), AdbError> {
        Self::require_value(&self.adb_bin, "adb_bin")?;
        Self::require_value(&self.remote_root, "remote_root")?;
        if let Some(ref serial) = self.serial {
            Self::require_value(serial, "serial")?;
        }
        Ok(())
    }

    fn require_value(value: &str, field: &str) -> Result<(), AdbError> {
        if value.trim().is_empty() {
            return Err(AdbError::InvalidConfig {
                field: field.to_owned(),
            });
        }
        Ok(())
    }
}
