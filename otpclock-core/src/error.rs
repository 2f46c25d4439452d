//! Error types for the otpclock OTP engine
//!
//! This module defines all error types used throughout the crate. Engine
//! failures are local and recoverable: they are returned to the caller,
//! never logged or retried by the engine itself.

use thiserror::Error;

/// Main error type for the otpclock application
#[derive(Error, Debug)]
pub enum OtpClockError {
    /// Errors related to configuration loading/parsing
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors related to OTP generation, encoding and provisioning
    #[error("OTP error: {0}")]
    Otp(#[from] OtpError),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {path}")]
    LoadFailed { path: String },

    #[error("Failed to save configuration file: {path}")]
    SaveFailed { path: String },

    #[error("Missing required configuration field: {field}")]
    MissingField { field: String },

    #[error("Configuration validation error: {message}")]
    ValidationError { message: String },

    #[error("I/O error: {message}")]
    IoError { message: String },
}

/// OTP engine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Invalid Base32 character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("Base32 input is not made of complete 8-symbol groups")]
    IncompleteGroup,

    #[error("Secret must not be empty")]
    EmptySecret,

    #[error("Digest output of {length} bytes is too short for dynamic truncation")]
    InvalidDigestLength { length: usize },

    #[error("HMAC computation failed")]
    HmacFailed,

    #[error("Invalid period: must be greater than zero")]
    InvalidPeriod,

    #[error("Invalid digit count {digits}: must be between 4 and 10")]
    InvalidDigits { digits: u32 },

    #[error("Invalid label: label and issuer must not be empty")]
    InvalidLabel,

    #[error("Unknown digest algorithm: {name}")]
    UnknownAlgorithm { name: String },

    #[error("Invalid provisioning URI: {reason}")]
    InvalidUri { reason: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, OtpClockError>;
