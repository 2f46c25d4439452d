//! HOTP (HMAC-based One-Time Password) generation
//!
//! Implements RFC 4226 section 5.3: HMAC over the big-endian counter,
//! dynamic truncation to a 31-bit integer, and reduction modulo 10^digits.

use crate::error::OtpError;
use crate::otp::hmac::{self, DigestAlgorithm};
use crate::types::{OtpCode, MAX_DIGITS, MIN_DIGITS};

/// Shortest MAC that dynamic truncation can read for every offset (15 + 4)
const MIN_DIGEST_LEN: usize = 20;

/// Generate the HOTP code for `counter`
///
/// # Errors
///
/// - `OtpError::EmptySecret` if `secret` is empty
/// - `OtpError::InvalidDigits` if `digits` is outside 4..=10
/// - `OtpError::InvalidDigestLength` if the MAC is shorter than 20 bytes
pub fn generate(
    secret: &[u8],
    counter: u64,
    algorithm: DigestAlgorithm,
    digits: u32,
) -> Result<OtpCode, OtpError> {
    if secret.is_empty() {
        return Err(OtpError::EmptySecret);
    }
    validate_digits(digits)?;

    let digest = hmac::hmac(algorithm, secret, &counter.to_be_bytes())?;
    let truncated = dynamic_truncate(&digest)?;

    Ok(OtpCode::from_value(
        u64::from(truncated) % 10u64.pow(digits),
        digits,
    ))
}

/// Check `code` against counters `counter..=counter + look_ahead`
///
/// Returns the counter that produced the code, so the caller can resume
/// from the one after it. Comparison time does not depend on where the
/// codes differ.
pub fn verify(
    secret: &[u8],
    code: &str,
    counter: u64,
    look_ahead: u64,
    algorithm: DigestAlgorithm,
    digits: u32,
) -> Result<Option<u64>, OtpError> {
    let candidate = code.trim();

    for offset in 0..=look_ahead {
        let Some(check) = counter.checked_add(offset) else {
            break;
        };
        let expected = generate(secret, check, algorithm, digits)?;
        if constant_time_eq(candidate.as_bytes(), expected.as_str().as_bytes()) {
            return Ok(Some(check));
        }
    }

    Ok(None)
}

/// Validate a digit count against the supported 4..=10 range
pub fn validate_digits(digits: u32) -> Result<(), OtpError> {
    if (MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
        Ok(())
    } else {
        Err(OtpError::InvalidDigits { digits })
    }
}

/// RFC 4226 dynamic truncation
///
/// The low nibble of the last byte selects a 4-byte big-endian window whose
/// top bit is cleared.
fn dynamic_truncate(digest: &[u8]) -> Result<u32, OtpError> {
    if digest.len() < MIN_DIGEST_LEN {
        return Err(OtpError::InvalidDigestLength {
            length: digest.len(),
        });
    }

    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let window = [
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ];

    Ok(u32::from_be_bytes(window))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
