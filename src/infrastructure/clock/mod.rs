mod simulation_clock;

pub use simulation_clock::SimulationClock;

use crate::domain::Clock;
use crate::domain::value_objects::Timestamp;

/// Wall-clock time. The production clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now()
    }
}
