//! CLI command implementations
//!
//! This module contains the implementation of all CLI subcommands and the
//! options they share for locating the secret and OTP parameters.

use clap::Args;
use otpclock_core::config::toml_config::TomlConfig;
use otpclock_core::error::{ConfigError, OtpClockError};
use otpclock_core::otp::{DigestAlgorithm, ProvisioningUri, TotpParams};
use otpclock_core::sync::{Clock, SystemClock};
use otpclock_core::types::Secret;

pub mod code;
pub mod config;
pub mod secret;
pub mod watch;

/// Options shared by every command that computes codes
#[derive(Args, Debug, Default)]
pub struct OtpArgs {
    /// Base32 shared secret
    #[arg(long, global = true, env = "OTPCLOCK_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// otpauth:// provisioning URI to take the secret and parameters from
    #[arg(long, global = true, conflicts_with = "secret")]
    pub uri: Option<String>,

    /// HMAC algorithm (SHA1, SHA256, SHA512)
    #[arg(long, global = true)]
    pub algorithm: Option<DigestAlgorithm>,

    /// Number of digits (4-10)
    #[arg(long, global = true)]
    pub digits: Option<u32>,

    /// Time step in seconds
    #[arg(long, global = true)]
    pub period: Option<u32>,
}

/// Secret and parameters resolved from arguments, URI and configuration
#[derive(Debug)]
pub struct Session {
    pub secret: Secret,
    pub params: TotpParams,
    pub label: Option<String>,
    pub issuer: Option<String>,
}

impl OtpArgs {
    /// Parameters from the config file with command-line overrides applied
    ///
    /// Precedence: command-line flags, then the provisioning URI, then the
    /// configuration file.
    pub fn params(&self, base: TotpParams) -> Result<TotpParams, OtpClockError> {
        let params = TotpParams {
            algorithm: self.algorithm.unwrap_or(base.algorithm),
            digits: self.digits.unwrap_or(base.digits),
            period: self.period.unwrap_or(base.period),
        };
        params.validate()?;
        Ok(params)
    }

    /// Resolve the secret and effective parameters
    pub fn session(&self, config: &TomlConfig) -> Result<Session, OtpClockError> {
        let mode = config.otp.base32_mode();

        if let Some(uri) = &self.uri {
            let parsed = ProvisioningUri::parse(uri, mode)?;
            return Ok(Session {
                params: self.params(parsed.params)?,
                secret: parsed.secret,
                label: Some(parsed.label),
                issuer: parsed.issuer.or_else(|| config.otp.issuer.clone()),
            });
        }

        let text = self.secret.as_deref().ok_or_else(|| {
            OtpClockError::Config(ConfigError::MissingField {
                field: "secret (use --secret, --uri or OTPCLOCK_SECRET)".to_string(),
            })
        })?;

        Ok(Session {
            secret: Secret::from_base32_with(text, mode)?,
            params: self.params(config.otp.params())?,
            label: config.otp.label.clone(),
            issuer: config.otp.issuer.clone(),
        })
    }
}

/// Explicit `--time` or the current system time
pub fn unix_time(time: Option<u64>) -> u64 {
    time.unwrap_or_else(|| SystemClock.now().unix_seconds)
}
