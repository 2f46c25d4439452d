//! Wall-clock access for the scheduler
//!
//! The engine never reads the clock itself; the scheduler asks a `Clock`
//! so tests can substitute a deterministic one.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A point in Unix time with millisecond resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    pub unix_seconds: u64,
    pub subsec_millis: u32,
}

impl Timestamp {
    /// Timestamp for a duration since the Unix epoch
    pub fn from_duration(since_epoch: Duration) -> Self {
        Self {
            unix_seconds: since_epoch.as_secs(),
            subsec_millis: since_epoch.subsec_millis(),
        }
    }

    /// Timestamp for a system time, clamping times before the epoch to 0
    pub fn from_system_time(time: SystemTime) -> Self {
        Self::from_duration(time.duration_since(UNIX_EPOCH).unwrap_or_default())
    }

    /// Time left until the next multiple of `step` seconds
    ///
    /// Lies in `1ms..=step` seconds: exactly on a boundary this is a full
    /// step, never zero. `step` must be non-zero.
    pub fn until_next_boundary(&self, step: u32) -> Duration {
        let step = u64::from(step);
        let whole_seconds = step - self.unix_seconds % step;
        Duration::from_millis(whole_seconds * 1000 - u64::from(self.subsec_millis))
    }
}

/// Source of the current wall-clock time
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Timestamp;
}

/// The operating system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_system_time(SystemTime::now())
    }
}
