//! Core library for the otpclock CLI tool
//!
//! This crate provides HOTP (RFC 4226) and TOTP (RFC 6238) generation,
//! Base32 secret handling, `otpauth://` provisioning URIs, and a scheduler
//! that keeps a previous/current/next code window in sync with the clock.

pub mod error;
pub mod types;

pub mod config;
pub mod otp;
pub mod sync;

/// Initialize logging infrastructure
///
/// Sets up tracing with systemd journal logging when running under systemd.
/// Otherwise logs to stderr, keeping stdout free for codes. The level is
/// taken from `RUST_LOG` and defaults to `warn`.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Try to use systemd journal logging if available
    #[cfg(target_os = "linux")]
    {
        if std::env::var("JOURNAL_STREAM").is_ok() {
            let journal_layer = tracing_journald::layer()?;
            tracing_subscriber::registry()
                .with(journal_layer)
                .with(filter)
                .init();
            return Ok(());
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}
