//! Type definitions and wrappers for secure data handling
//!
//! This module provides type-safe wrappers for the shared secret (using the
//! secrecy crate so it never leaks through debug output) and the values the
//! engine hands back to its consumers.

use crate::error::OtpError;
use crate::otp::base32::{self, Base32Mode};
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretVec};
use serde::Serialize;

/// RFC 6238 default time step in seconds
pub const DEFAULT_PERIOD: u32 = 30;

/// Default number of digits in a generated code
pub const DEFAULT_DIGITS: u32 = 6;

/// Smallest supported digit count
pub const MIN_DIGITS: u32 = 4;

/// Largest supported digit count
pub const MAX_DIGITS: u32 = 10;

/// Default length of a freshly generated secret (160 bits, as recommended by RFC 4226)
pub const DEFAULT_SECRET_BYTES: usize = 20;

/// Shared HMAC key for HOTP/TOTP generation
///
/// The bytes are immutable once created and every copy is zeroized when
/// dropped. `Debug` output never shows the key material.
pub struct Secret(SecretVec<u8>);

impl Clone for Secret {
    fn clone(&self) -> Self {
        Self(SecretVec::new(self.0.expose_secret().clone()))
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret([REDACTED {} bytes])", self.expose().len())
    }
}

impl Secret {
    /// Wrap raw key bytes
    ///
    /// # Errors
    ///
    /// Returns `OtpError::EmptySecret` if `bytes` is empty
    pub fn new(bytes: Vec<u8>) -> Result<Self, OtpError> {
        if bytes.is_empty() {
            return Err(OtpError::EmptySecret);
        }
        Ok(Self(SecretVec::new(bytes)))
    }

    /// Decode a secret from its Base32 text form (lenient decoding)
    pub fn from_base32(text: &str) -> Result<Self, OtpError> {
        Self::from_base32_with(text, Base32Mode::Lenient)
    }

    /// Decode a secret from Base32 text with an explicit decoding mode
    pub fn from_base32_with(text: &str, mode: Base32Mode) -> Result<Self, OtpError> {
        Self::new(base32::decode_with(text, mode)?)
    }

    /// Generate a random secret of `length` bytes from the OS random source
    pub fn generate(length: usize) -> Result<Self, OtpError> {
        let mut bytes = vec![0u8; length];
        OsRng.fill_bytes(&mut bytes);
        Self::new(bytes)
    }

    /// Base32 (unpadded) text form, as shown to users and embedded in URIs
    pub fn to_base32(&self) -> String {
        base32::encode(self.expose())
    }

    /// Expose the key bytes (use with caution!)
    ///
    /// This should only be called when passing the key to the HMAC.
    pub fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }

    /// Key length in bits
    pub fn bits(&self) -> usize {
        self.expose().len() * 8
    }
}

/// A generated one-time password
///
/// Always exactly as many ASCII digits as requested, left-padded with zeros.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OtpCode(String);

impl OtpCode {
    /// Render `value` as a zero-padded code of `digits` characters
    pub(crate) fn from_value(value: u64, digits: u32) -> Self {
        Self(format!("{:0width$}", value, width = digits as usize))
    }

    /// The code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of digits in the code
    pub fn digits(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Display for OtpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OtpCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Snapshot of the codes around a point in time
///
/// `previous` is `None` when the current counter is 0 and `next` is `None`
/// when the counter is already `u64::MAX`; neither happens for real clocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TotpWindow {
    /// Code for `counter - 1`
    pub previous: Option<OtpCode>,
    /// Code valid at `unix_seconds`
    pub current: OtpCode,
    /// Code for `counter + 1`
    pub next: Option<OtpCode>,
    /// Seconds until `current` expires, always in `1..=period`
    pub seconds_remaining: u32,
    /// Time-step counter the window was computed for
    pub counter: u64,
    /// Unix time the window was computed at
    pub unix_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_rejects_empty() {
        assert_eq!(Secret::new(Vec::new()).unwrap_err(), OtpError::EmptySecret);
    }

    #[test]
    fn test_secret_debug_hides_bytes() {
        let secret = Secret::new(b"12345678901234567890".to_vec()).unwrap();
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("49, 50"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_secret_clone_keeps_bytes() {
        let secret = Secret::new(b"12345678901234567890".to_vec()).unwrap();
        let copy = secret.clone();
        drop(secret);
        assert_eq!(copy.expose(), b"12345678901234567890");
    }

    #[test]
    fn test_generate_secret_length() {
        let secret = Secret::generate(DEFAULT_SECRET_BYTES).unwrap();
        assert_eq!(secret.expose().len(), 20);
        assert_eq!(secret.bits(), 160);
        assert_eq!(secret.to_base32().len(), 32);
    }

    #[test]
    fn test_generate_secrets_differ() {
        let a = Secret::generate(20).unwrap();
        let b = Secret::generate(20).unwrap();
        assert_ne!(a.expose(), b.expose());
    }

    #[test]
    fn test_generate_zero_length_fails() {
        assert!(matches!(Secret::generate(0), Err(OtpError::EmptySecret)));
    }

    #[test]
    fn test_otp_code_padding() {
        assert_eq!(OtpCode::from_value(42, 6).as_str(), "000042");
        assert_eq!(OtpCode::from_value(0, 8).as_str(), "00000000");
        assert_eq!(OtpCode::from_value(123456, 6).to_string(), "123456");
        assert_eq!(OtpCode::from_value(7, 4).digits(), 4);
    }

    #[test]
    fn test_window_serializes_codes_as_strings() {
        let window = TotpWindow {
            previous: None,
            current: OtpCode::from_value(755224, 6),
            next: Some(OtpCode::from_value(287082, 6)),
            seconds_remaining: 30,
            counter: 0,
            unix_seconds: 0,
        };

        let value = serde_json::to_value(&window).unwrap();
        assert_eq!(value["previous"], serde_json::Value::Null);
        assert_eq!(value["current"], "755224");
        assert_eq!(value["next"], "287082");
        assert_eq!(value["seconds_remaining"], 30);
    }
}
