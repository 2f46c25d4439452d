//! Configuration module
//!
//! Handles loading and saving OTP parameters from TOML files.
//! The shared secret is never part of the configuration.

use crate::otp::base32::Base32Mode;
use crate::otp::hmac::DigestAlgorithm;
use crate::otp::totp::TotpParams;
use crate::sync::state::Cadence;
use crate::types::{DEFAULT_DIGITS, DEFAULT_PERIOD};
use serde::{Deserialize, Serialize};

pub mod toml_config;

/// OTP generation parameters
///
/// Every field has a default, so an empty `[otp]` table is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpConfig {
    /// HMAC hash function (default: SHA1)
    #[serde(default)]
    pub algorithm: DigestAlgorithm,

    /// Number of code digits (default: 6)
    #[serde(default = "default_digits")]
    pub digits: u32,

    /// Time step in seconds (default: 30)
    #[serde(default = "default_period")]
    pub period: u32,

    /// Issuer shown by authenticator apps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Account label shown by authenticator apps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Require complete 8-symbol Base32 groups when decoding secrets
    #[serde(default)]
    pub strict_base32: bool,
}

fn default_digits() -> u32 {
    DEFAULT_DIGITS
}
fn default_period() -> u32 {
    DEFAULT_PERIOD
}

impl OtpConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.params().validate().map_err(|e| e.to_string())?;

        if let Some(issuer) = &self.issuer {
            if issuer.trim().is_empty() {
                return Err("Issuer cannot be empty when set".to_string());
            }
        }

        if let Some(label) = &self.label {
            if label.trim().is_empty() {
                return Err("Label cannot be empty when set".to_string());
            }
        }

        Ok(())
    }

    /// Algorithm, digits and period as engine parameters
    pub fn params(&self) -> TotpParams {
        TotpParams {
            algorithm: self.algorithm,
            digits: self.digits,
            period: self.period,
        }
    }

    /// Base32 decoding mode for secrets
    pub fn base32_mode(&self) -> Base32Mode {
        if self.strict_base32 {
            Base32Mode::Strict
        } else {
            Base32Mode::Lenient
        }
    }
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::default(),
            digits: DEFAULT_DIGITS,
            period: DEFAULT_PERIOD,
            issuer: None,
            label: None,
            strict_base32: false,
        }
    }
}

/// Live view settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// How often the window is republished
    #[serde(default)]
    pub cadence: Cadence,
}
