//! Live TOTP view
//!
//! Runs a `SyncScheduler` and redraws the previous/current/next codes each
//! time it publishes, until interrupted with Ctrl-C.

use crate::cli::OtpArgs;
use chrono::{DateTime, Local};
use colored::Colorize;
use otpclock_core::config::toml_config::load_config_or_default;
use otpclock_core::error::OtpClockError;
use otpclock_core::sync::{Cadence, SyncScheduler};
use otpclock_core::types::{OtpCode, TotpWindow};
use std::io::{IsTerminal, Write};
use tracing::debug;

/// Width of the countdown bar in characters
const BAR_WIDTH: u32 = 20;

/// Run the live view
pub fn run_watch(args: &OtpArgs, cadence: Option<Cadence>) -> Result<(), OtpClockError> {
    let config = load_config_or_default()?;
    let session = args.session(&config)?;
    let cadence = cadence.unwrap_or(config.scheduler.cadence);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let mut scheduler = SyncScheduler::new(session.secret, session.params, cadence)?;
        let mut windows = scheduler.subscribe();
        scheduler.start()?;

        let period = session.params.period;
        let interactive = std::io::stdout().is_terminal();
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            let latest = windows.borrow_and_update().clone();
            if let Some(window) = latest {
                draw(&window, period, interactive)?;
            }

            tokio::select! {
                changed = windows.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = &mut shutdown => {
                    debug!("Interrupted, stopping live view");
                    break;
                }
            }
        }

        scheduler.stop();
        if interactive {
            println!();
        }
        Ok::<(), OtpClockError>(())
    })
}

fn draw(window: &TotpWindow, period: u32, interactive: bool) -> Result<(), OtpClockError> {
    let line = render(window, period);
    let mut stdout = std::io::stdout().lock();

    if interactive {
        // Clear the line and redraw in place
        write!(stdout, "\r\x1b[2K{}", line)?;
    } else {
        writeln!(stdout, "{}", line)?;
    }
    stdout.flush()?;

    Ok(())
}

fn render(window: &TotpWindow, period: u32) -> String {
    let dim = |code: &Option<OtpCode>| match code {
        Some(code) => code.to_string().dimmed().to_string(),
        None => "-".repeat(window.current.digits()).dimmed().to_string(),
    };

    let remaining = format!("{:>2}s", window.seconds_remaining);
    let remaining = if window.seconds_remaining <= 5 {
        remaining.red().to_string()
    } else {
        remaining.normal().to_string()
    };

    format!(
        "{}  {}  {}  {} {}  until {}",
        dim(&window.previous),
        window.current.to_string().bold().green(),
        dim(&window.next),
        countdown_bar(window.seconds_remaining, period),
        remaining,
        expiry(window).format("%H:%M:%S"),
    )
}

fn countdown_bar(remaining: u32, period: u32) -> String {
    let filled = (u64::from(remaining) * u64::from(BAR_WIDTH) / u64::from(period.max(1))) as usize;
    let filled = filled.min(BAR_WIDTH as usize);
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH as usize - filled)
    )
}

/// Local time at which the current code expires
fn expiry(window: &TotpWindow) -> DateTime<Local> {
    let expires_at = window
        .unix_seconds
        .saturating_add(u64::from(window.seconds_remaining));
    i64::try_from(expires_at)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|utc| utc.with_timezone(&Local))
        .unwrap_or_else(Local::now)
}
