//! Code generation commands
//!
//! `code`, `window`, `hotp` and `check` print machine-parsable output to
//! stdout. Errors go to stderr via `main`.

use crate::cli::{unix_time, OtpArgs};
use otpclock_core::config::toml_config::load_config_or_default;
use otpclock_core::error::OtpClockError;
use otpclock_core::otp::hotp;
use otpclock_core::types::TotpWindow;

/// Print the TOTP code valid at `time` (default: now)
pub fn run_code(args: &OtpArgs, time: Option<u64>) -> Result<(), OtpClockError> {
    let config = load_config_or_default()?;
    let session = args.session(&config)?;

    let code = session.params.generate(&session.secret, unix_time(time))?;
    println!("{}", code);

    Ok(())
}

/// Print the previous, current and next codes around `time`
pub fn run_window(args: &OtpArgs, time: Option<u64>, json: bool) -> Result<(), OtpClockError> {
    let config = load_config_or_default()?;
    let session = args.session(&config)?;

    let window = session.params.window(&session.secret, unix_time(time))?;

    if json {
        let rendered = serde_json::to_string_pretty(&window)
            .map_err(|e| OtpClockError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        println!("{}", rendered);
    } else {
        print!("{}", format_window(&window));
    }

    Ok(())
}

/// Print the HOTP code for an explicit counter
pub fn run_hotp(args: &OtpArgs, counter: u64) -> Result<(), OtpClockError> {
    let config = load_config_or_default()?;
    let session = args.session(&config)?;

    let code = hotp::generate(
        session.secret.expose(),
        counter,
        session.params.algorithm,
        session.params.digits,
    )?;
    println!("{}", code);

    Ok(())
}

/// Verify a TOTP code; returns whether it matched
pub fn run_check(
    args: &OtpArgs,
    code: &str,
    time: Option<u64>,
    skew: u64,
) -> Result<bool, OtpClockError> {
    let config = load_config_or_default()?;
    let session = args.session(&config)?;

    match session
        .params
        .verify(&session.secret, code, unix_time(time), skew)?
    {
        Some(counter) => {
            println!("valid (time step {})", counter);
            Ok(true)
        }
        None => {
            println!("invalid");
            Ok(false)
        }
    }
}

fn format_window(window: &TotpWindow) -> String {
    let placeholder = "-".repeat(window.current.digits());
    let or_placeholder = |code: &Option<otpclock_core::types::OtpCode>| {
        code.as_ref()
            .map(|c| c.to_string())
            .unwrap_or_else(|| placeholder.clone())
    };

    format!(
        "previous  {}\ncurrent   {}  ({}s remaining)\nnext      {}\n",
        or_placeholder(&window.previous),
        window.current,
        window.seconds_remaining,
        or_placeholder(&window.next),
    )
}
