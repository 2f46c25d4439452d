//! One-time password engine
//!
//! Handles Base32 secret encoding, HOTP/TOTP generation and provisioning URIs.

pub mod base32;
pub mod hmac;
pub mod hotp;
pub mod totp;
pub mod uri;

// Public re-exports
pub use base32::Base32Mode;
pub use hmac::DigestAlgorithm;
pub use totp::TotpParams;
pub use uri::ProvisioningUri;
