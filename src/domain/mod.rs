pub mod entities;
pub mod errors;
pub mod events;
pub mod matching;
pub mod services;
pub mod value_objects;

// Re-export entity types
pub use entities::{
    Asset, ClaimEntry, ClaimStatus, DistributionId, DividendDistribution, MatchOutcome, Order,
    OrderBook, OrderBookSnapshot, OrderStatus, PriceLevel, SettlementStatus, Trade,
};

// Re-export errors
pub use errors::{
    EligibilityError, InvariantViolation, MarketError, MarketResult, SettlementError, StateError,
    ValidationError,
};

// Re-export events
pub use events::{
    DividendClaimedEvent, DividendDistributedEvent, MarketEvent, OrderAcceptedEvent,
    OrderCancelledEvent, TradeExecutedEvent, TradeFailedEvent, TradeSettledEvent,
};

// Re-export services
pub use services::{Clock, OrderValidator};

// Re-export value objects
pub use value_objects::{Address, AssetId, OrderId, Price, Quantity, Side, Timestamp, TradeId};

// Re-export matching algorithms
pub use matching::{MatchResult, MatchingAlgorithm, PriceTimeMatcher};
