//! TOTP (Time-based One-Time Password) generation
//!
//! Implements RFC 6238: HOTP with a counter derived from Unix time and a
//! time step. Time is always an explicit argument, so every function here
//! is a pure function of its inputs.

use crate::error::OtpError;
use crate::otp::hmac::DigestAlgorithm;
use crate::otp::hotp;
use crate::types::{OtpCode, Secret, TotpWindow, DEFAULT_DIGITS, DEFAULT_PERIOD};
use serde::{Deserialize, Serialize};

/// Time-step counter for `unix_seconds`: `floor(unix_seconds / period)`
///
/// # Errors
///
/// Returns `OtpError::InvalidPeriod` if `period` is zero
pub fn counter_for_time(unix_seconds: u64, period: u32) -> Result<u64, OtpError> {
    if period == 0 {
        return Err(OtpError::InvalidPeriod);
    }
    Ok(unix_seconds / u64::from(period))
}

/// Seconds until the step containing `unix_seconds` ends, in `1..=period`
pub fn seconds_remaining(unix_seconds: u64, period: u32) -> Result<u32, OtpError> {
    if period == 0 {
        return Err(OtpError::InvalidPeriod);
    }
    // The remainder is below `period`, so it fits in u32
    Ok(period - (unix_seconds % u64::from(period)) as u32)
}

/// Generate the TOTP code valid at `unix_seconds`
pub fn generate(
    secret: &[u8],
    unix_seconds: u64,
    period: u32,
    algorithm: DigestAlgorithm,
    digits: u32,
) -> Result<OtpCode, OtpError> {
    let counter = counter_for_time(unix_seconds, period)?;
    hotp::generate(secret, counter, algorithm, digits)
}

/// Compute the previous, current and next codes around `unix_seconds`
pub fn window(
    secret: &[u8],
    unix_seconds: u64,
    period: u32,
    algorithm: DigestAlgorithm,
    digits: u32,
) -> Result<TotpWindow, OtpError> {
    let counter = counter_for_time(unix_seconds, period)?;
    let code_at = |counter: Option<u64>| -> Result<Option<OtpCode>, OtpError> {
        counter
            .map(|c| hotp::generate(secret, c, algorithm, digits))
            .transpose()
    };

    Ok(TotpWindow {
        previous: code_at(counter.checked_sub(1))?,
        current: hotp::generate(secret, counter, algorithm, digits)?,
        next: code_at(counter.checked_add(1))?,
        seconds_remaining: seconds_remaining(unix_seconds, period)?,
        counter,
        unix_seconds,
    })
}

/// Check `code` against the steps within `skew` periods of `unix_seconds`
///
/// Returns the matching time-step counter. The current step is tried
/// first, then steps further away in both directions.
pub fn verify(
    secret: &[u8],
    code: &str,
    unix_seconds: u64,
    skew: u64,
    period: u32,
    algorithm: DigestAlgorithm,
    digits: u32,
) -> Result<Option<u64>, OtpError> {
    let counter = counter_for_time(unix_seconds, period)?;

    if let Some(found) = hotp::verify(secret, code, counter, 0, algorithm, digits)? {
        return Ok(Some(found));
    }

    for distance in 1..=skew {
        for candidate in [counter.checked_sub(distance), counter.checked_add(distance)]
            .into_iter()
            .flatten()
        {
            if let Some(found) = hotp::verify(secret, code, candidate, 0, algorithm, digits)? {
                return Ok(Some(found));
            }
        }
    }

    Ok(None)
}

/// TOTP parameters shared by every code computed for one secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotpParams {
    pub algorithm: DigestAlgorithm,
    pub digits: u32,
    pub period: u32,
}

impl Default for TotpParams {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::Sha1,
            digits: DEFAULT_DIGITS,
            period: DEFAULT_PERIOD,
        }
    }
}

impl TotpParams {
    /// Create a new parameter set, validating digits and period
    pub fn new(algorithm: DigestAlgorithm, digits: u32, period: u32) -> Result<Self, OtpError> {
        let params = Self {
            algorithm,
            digits,
            period,
        };
        params.validate()?;
        Ok(params)
    }

    /// Validate the parameter set
    pub fn validate(&self) -> Result<(), OtpError> {
        hotp::validate_digits(self.digits)?;
        if self.period == 0 {
            return Err(OtpError::InvalidPeriod);
        }
        Ok(())
    }

    /// Code valid at `unix_seconds`
    pub fn generate(&self, secret: &Secret, unix_seconds: u64) -> Result<OtpCode, OtpError> {
        generate(
            secret.expose(),
            unix_seconds,
            self.period,
            self.algorithm,
            self.digits,
        )
    }

    /// Window around `unix_seconds`
    pub fn window(&self, secret: &Secret, unix_seconds: u64) -> Result<TotpWindow, OtpError> {
        window(
            secret.expose(),
            unix_seconds,
            self.period,
            self.algorithm,
            self.digits,
        )
    }

    /// Verify `code` at `unix_seconds` with `skew` steps of tolerance
    pub fn verify(
        &self,
        secret: &Secret,
        code: &str,
        unix_seconds: u64,
        skew: u64,
    ) -> Result<Option<u64>, OtpError> {
        verify(
            secret.expose(),
            code,
            unix_seconds,
            skew,
            self.period,
            self.algorithm,
            self.digits,
        )
    }
}
