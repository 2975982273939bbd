mod clock;
mod order_validator;

pub use clock::Clock;
pub use order_validator::OrderValidator;
