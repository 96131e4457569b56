//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{clipped, ConfigError, Error, Result};

use super::DriveConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
///
/// ```rust,ignore
/// use stepper_runner::load_config;
///
/// let config = load_config("drive.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DriveConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = clipped(&e.to_string());
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<DriveConfig> {
    let config: DriveConfig = toml::from_str(content).map_err(|e| {
        Error::Config(ConfigError::ParseError(clipped(e.message())))
    })?;

    super::validation::validate_config(&config)?;

    Ok(config)
}
