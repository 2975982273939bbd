use crate::domain::value_objects::Timestamp;

/// Basic clock trait - provides current time
///
/// Everything that stamps domain state goes through this trait so tests
/// can drive time explicitly instead of sleeping.
pub trait Clock: Send + Sync {
    /// Get current time from this clock's perspective
    fn now(&self) -> Timestamp;
}
