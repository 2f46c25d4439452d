//! Secret provisioning commands
//!
//! `new-secret` creates a random shared secret and `uri` formats the
//! provisioning URI for it, ready to be rendered as a QR code.

use crate::cli::OtpArgs;
use otpclock_core::config::toml_config::load_config_or_default;
use otpclock_core::error::OtpClockError;
use otpclock_core::otp::uri;
use otpclock_core::types::Secret;
use tracing::debug;

/// Print a random Base32 secret of `bytes` bytes
pub fn run_new_secret(bytes: usize) -> Result<(), OtpClockError> {
    let secret = Secret::generate(bytes)?;
    debug!(bits = secret.bits(), "Generated new secret");

    println!("{}", secret.to_base32());
    Ok(())
}

/// Print the provisioning URI for the configured secret
///
/// `label` and `issuer` fall back to the provisioning URI and then the
/// configuration file.
pub fn run_uri(
    args: &OtpArgs,
    label: Option<String>,
    issuer: Option<String>,
) -> Result<(), OtpClockError> {
    let config = load_config_or_default()?;
    let session = args.session(&config)?;

    let label = label.or(session.label).unwrap_or_default();
    let issuer = issuer.or(session.issuer).unwrap_or_default();

    let uri = uri::build(
        &label,
        &session.secret.to_base32(),
        &issuer,
        session.params.algorithm,
        session.params.digits,
        session.params.period,
    )?;
    println!("{}", uri);

    Ok(())
}
