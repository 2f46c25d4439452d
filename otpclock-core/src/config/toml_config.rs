//! TOML configuration file I/O
//!
//! Handles loading and saving OTP configuration to/from TOML files
//! in the user's configuration directory.

use crate::config::{OtpConfig, SchedulerConfig};
use crate::error::{ConfigError, OtpClockError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Complete TOML configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// OTP generation settings
    #[serde(default)]
    pub otp: OtpConfig,

    /// Live view settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl TomlConfig {
    /// Create a new TOML configuration
    pub fn new(otp: OtpConfig, scheduler: SchedulerConfig) -> Self {
        Self { otp, scheduler }
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), OtpClockError> {
        self.otp
            .validate()
            .map_err(|message| OtpClockError::Config(ConfigError::ValidationError { message }))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, OtpClockError> {
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => OtpClockError::Config(ConfigError::LoadFailed {
                path: path.to_string_lossy().to_string(),
            }),
            _ => OtpClockError::Config(ConfigError::IoError {
                message: format!("Failed to read config file: {}", e),
            }),
        })?;

        let config: TomlConfig = toml::from_str(&contents)?;
        config.validate()?;

        debug!(
            algorithm = %config.otp.algorithm,
            digits = config.otp.digits,
            period = config.otp.period,
            cadence = ?config.scheduler.cadence,
            "Loaded configuration from {:?}",
            path
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<(), OtpClockError> {
        self.validate()?;

        let contents = toml::to_string_pretty(self)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                OtpClockError::Config(ConfigError::IoError {
                    message: format!("Failed to create config directory: {}", e),
                })
            })?;
        }

        std::fs::write(path, contents).map_err(|_| {
            OtpClockError::Config(ConfigError::SaveFailed {
                path: path.to_string_lossy().to_string(),
            })
        })?;

        info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

/// Default configuration file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the configuration directory
///
/// Returns `OTPCLOCK_CONFIG_DIR` if set, otherwise `~/.config/otpclock`
pub fn get_config_dir() -> Result<PathBuf, OtpClockError> {
    if let Ok(config_dir) = std::env::var("OTPCLOCK_CONFIG_DIR") {
        return Ok(PathBuf::from(config_dir));
    }

    let home = std::env::var("HOME").map_err(|_| {
        OtpClockError::Config(ConfigError::IoError {
            message: "HOME environment variable not set".to_string(),
        })
    })?;

    Ok(PathBuf::from(home).join(".config").join("otpclock"))
}

/// Get the default configuration file path
pub fn get_config_path() -> Result<PathBuf, OtpClockError> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from the default file, falling back to defaults when
/// the file does not exist
pub fn load_config_or_default() -> Result<TomlConfig, OtpClockError> {
    let path = get_config_path()?;
    if !path.exists() {
        debug!("No configuration at {:?}, using defaults", path);
        return Ok(TomlConfig::default());
    }
    TomlConfig::from_file(&path)
}

/// Save configuration to the default file
pub fn save_config(config: &TomlConfig) -> Result<PathBuf, OtpClockError> {
    let path = get_config_path()?;
    config.to_file(&path)?;
    Ok(path)
}
