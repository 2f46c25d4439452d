//! Wall-clock synchronization
//!
//! Keeps a live TOTP window aligned to time-step boundaries.

pub mod clock;
pub mod scheduler;
pub mod state;

// Public re-exports
pub use clock::{Clock, SystemClock, Timestamp};
pub use scheduler::SyncScheduler;
pub use state::{Cadence, SchedulerState};
