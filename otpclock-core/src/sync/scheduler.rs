//! Boundary-aligned TOTP window publishing
//!
//! `SyncScheduler` owns one tokio task that sleeps until the next wall-clock
//! boundary, recomputes the `TotpWindow` from the actual current time and
//! publishes it on a watch channel. Every sleep is recomputed from the
//! clock instead of ticking a fixed interval, so timer drift never
//! accumulates and a wake that arrives late (process suspended, runtime
//! busy) still publishes the code for "now".

use crate::error::OtpError;
use crate::otp::totp::TotpParams;
use crate::sync::clock::{Clock, SystemClock};
use crate::sync::state::{Cadence, SchedulerState};
use crate::types::{Secret, TotpWindow};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type WindowSender = Arc<watch::Sender<Option<TotpWindow>>>;

/// Publishing is allowed only while the gate is open
///
/// `stop()` closes the gate under the same lock the task publishes under,
/// so nothing is published once `stop()` has returned, even on a
/// multi-threaded runtime where the aborted task may still be mid-tick.
type PublishGate = Arc<Mutex<bool>>;

/// Recomputes and publishes TOTP windows at time-step boundaries
pub struct SyncScheduler {
    secret: Secret,
    params: TotpParams,
    cadence: Cadence,
    clock: Arc<dyn Clock>,
    window_tx: WindowSender,
    gate: PublishGate,
    task: Option<JoinHandle<()>>,
}

impl SyncScheduler {
    /// Create an idle scheduler reading the system clock
    ///
    /// # Errors
    ///
    /// Returns the validation error of `params` (`InvalidPeriod`,
    /// `InvalidDigits`)
    pub fn new(secret: Secret, params: TotpParams, cadence: Cadence) -> Result<Self, OtpError> {
        Self::with_clock(secret, params, cadence, Arc::new(SystemClock))
    }

    /// Create an idle scheduler reading an explicit clock
    pub fn with_clock(
        secret: Secret,
        params: TotpParams,
        cadence: Cadence,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, OtpError> {
        params.validate()?;
        let (window_tx, _) = watch::channel(None);

        Ok(Self {
            secret,
            params,
            cadence,
            clock,
            window_tx: Arc::new(window_tx),
            gate: Arc::new(Mutex::new(false)),
            task: None,
        })
    }

    /// Receiver for published windows
    ///
    /// Holds `None` until the first `start()`.
    pub fn subscribe(&self) -> watch::Receiver<Option<TotpWindow>> {
        self.window_tx.subscribe()
    }

    /// Most recently published window
    pub fn latest(&self) -> Option<TotpWindow> {
        self.window_tx.borrow().clone()
    }

    /// Current lifecycle state
    pub fn state(&self) -> SchedulerState {
        if self.task.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Idle
        }
    }

    /// Publish the window for now and start the boundary timer
    ///
    /// Calling `start()` while already running is a no-op. Must be called
    /// from within a tokio runtime.
    #[tracing::instrument(skip(self), fields(period = self.params.period, cadence = ?self.cadence))]
    pub fn start(&mut self) -> Result<(), OtpError> {
        if self.task.is_some() {
            debug!("Scheduler already running");
            return Ok(());
        }

        // Each run gets its own gate so a previously stopped task can never
        // reopen publishing
        let gate: PublishGate = Arc::new(Mutex::new(true));
        let now = self.clock.now();
        let window = self.params.window(&self.secret, now.unix_seconds)?;
        publish(&gate, &self.window_tx, window);

        let ticker = Ticker {
            secret: self.secret.clone(),
            params: self.params,
            step: self.cadence.step(self.params.period),
            clock: Arc::clone(&self.clock),
            window_tx: Arc::clone(&self.window_tx),
            gate: Arc::clone(&gate),
        };

        self.gate = gate;
        self.task = Some(tokio::spawn(ticker.run()));

        info!(
            until_boundary_ms = now.until_next_boundary(self.params.period).as_millis() as u64,
            "TOTP scheduler started"
        );
        Ok(())
    }

    /// Release the timer and stop publishing
    ///
    /// Idempotent: stopping an idle scheduler does nothing.
    pub fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        *self.gate.lock().unwrap_or_else(|e| e.into_inner()) = false;
        task.abort();

        info!("TOTP scheduler stopped");
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for SyncScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncScheduler")
            .field("params", &self.params)
            .field("cadence", &self.cadence)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// State moved into the spawned timer task
struct Ticker {
    secret: Secret,
    params: TotpParams,
    step: u32,
    clock: Arc<dyn Clock>,
    window_tx: WindowSender,
    gate: PublishGate,
}

impl Ticker {
    async fn run(self) {
        loop {
            let delay = self.clock.now().until_next_boundary(self.step);
            tokio::time::sleep(delay).await;

            let now = self.clock.now();
            match self.params.window(&self.secret, now.unix_seconds) {
                Ok(window) => {
                    debug!(
                        counter = window.counter,
                        seconds_remaining = window.seconds_remaining,
                        "Publishing TOTP window"
                    );
                    if !publish(&self.gate, &self.window_tx, window) {
                        break;
                    }
                }
                Err(e) => warn!("Failed to compute TOTP window: {}", e),
            }
        }
    }
}

/// Send `window` if the gate is open; returns whether it was open
fn publish(gate: &PublishGate, window_tx: &WindowSender, window: TotpWindow) -> bool {
    let open = gate.lock().unwrap_or_else(|e| e.into_inner());
    if *open {
        window_tx.send_replace(Some(window));
    }
    *open
}
