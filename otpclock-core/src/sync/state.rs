//! Scheduler lifecycle state

use serde::{Deserialize, Serialize};

/// Lifecycle of a `SyncScheduler`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchedulerState {
    /// No timer is held
    #[default]
    Idle,

    /// A timer task is recomputing and publishing windows
    Running,
}

impl std::fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerState::Idle => write!(f, "idle"),
            SchedulerState::Running => write!(f, "running"),
        }
    }
}

/// When the scheduler wakes up to republish
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cadence {
    /// Only at time-step boundaries, when the code changes
    Boundary,

    /// At every whole wall-clock second, for a live countdown
    #[default]
    EverySecond,
}

impl Cadence {
    /// Wake-up granularity in seconds for a given period
    pub fn step(&self, period: u32) -> u32 {
        match self {
            Cadence::Boundary => period,
            Cadence::EverySecond => 1,
        }
    }
}

impl std::str::FromStr for Cadence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "boundary" => Ok(Cadence::Boundary),
            "every-second" | "second" => Ok(Cadence::EverySecond),
            other => Err(format!(
                "unknown cadence '{}' (expected boundary or every-second)",
                other
            )),
        }
    }
}
