mod simulated;

pub use simulated::{LedgerBehavior, LedgerLatency, SimulatedLedger};
