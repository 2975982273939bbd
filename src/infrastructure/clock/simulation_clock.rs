use crate::domain::Clock;
use crate::domain::value_objects::Timestamp;
use chrono::{Duration, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

/// Manually driven clock for tests and scripted scenarios.
///
/// Time stands still until `advance` or `set_time` moves it, which
/// makes timestamp-sensitive behavior (dividend snapshots, settlement
/// timing, trade ordering by execution time) reproducible without
/// sleeping.
#[derive(Debug)]
pub struct SimulationClock {
    now: Arc<RwLock<Timestamp>>,
}

impl SimulationClock {
    /// Start at the current wall-clock time, then stand still.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Start at a specific instant.
    pub fn at(time: Timestamp) -> Self {
        SimulationClock {
            now: Arc::new(RwLock::new(time)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.write();
        *now += duration;
    }

    /// Jump to an absolute instant, forwards or backwards.
    pub fn set_time(&self, time: Timestamp) {
        *self.now.write() = time;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SimulationClock {
    fn clone(&self) -> Self {
        SimulationClock {
            now: Arc::clone(&self.now),
        }
    }
}

impl Clock for SimulationClock {
    fn now(&self) -> Timestamp {
        *self.now.read()
    }
}
