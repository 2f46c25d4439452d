//! HMAC computation for HOTP/TOTP
//!
//! Selects the RFC 2104 HMAC hash function by `DigestAlgorithm`. SHA1 is
//! the default; SHA256 and SHA512 are the RFC 6238 alternatives.

use crate::error::OtpError;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

/// Hash function used inside the HMAC
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    #[default]
    #[serde(rename = "SHA1", alias = "sha1")]
    Sha1,
    #[serde(rename = "SHA256", alias = "sha256")]
    Sha256,
    #[serde(rename = "SHA512", alias = "sha512")]
    Sha512,
}

impl DigestAlgorithm {
    /// Name used in provisioning URIs (`SHA1`, `SHA256`, `SHA512`)
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "SHA1",
            DigestAlgorithm::Sha256 => "SHA256",
            DigestAlgorithm::Sha512 => "SHA512",
        }
    }

    /// Length of the HMAC output in bytes
    pub fn output_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha512 => 64,
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DigestAlgorithm {
    type Err = OtpError;

    /// Parse `SHA1`/`SHA256`/`SHA512`, ignoring case and an optional dash
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "").as_str() {
            "SHA1" => Ok(DigestAlgorithm::Sha1),
            "SHA256" => Ok(DigestAlgorithm::Sha256),
            "SHA512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(OtpError::UnknownAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

/// Compute `HMAC(algorithm, key, message)`
pub fn hmac(algorithm: DigestAlgorithm, key: &[u8], message: &[u8]) -> Result<Vec<u8>, OtpError> {
    match algorithm {
        DigestAlgorithm::Sha1 => compute::<Hmac<Sha1>>(key, message),
        DigestAlgorithm::Sha256 => compute::<Hmac<Sha256>>(key, message),
        DigestAlgorithm::Sha512 => compute::<Hmac<Sha512>>(key, message),
    }
}

fn compute<M: Mac + hmac::digest::KeyInit>(key: &[u8], message: &[u8]) -> Result<Vec<u8>, OtpError> {
    let mut mac = <M as Mac>::new_from_slice(key).map_err(|_| OtpError::HmacFailed)?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}
