//! Error taxonomy for the marketplace domain.
//!
//! Errors are grouped by the kind of failure rather than by the operation
//! that raised them: validation (malformed input), eligibility (participant
//! not allowed), state (entity exists but the transition is illegal),
//! settlement (external ledger), and invariant violations (bugs).

use thiserror::Error;

use super::value_objects::{Address, AssetId, OrderId, Quantity, TradeId};
use crate::domain::entities::DistributionId;

/// Rejections raised before an order or request touches any book state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown asset: {0}")]
    UnknownAsset(AssetId),

    #[error("Quantity must be positive")]
    NonPositiveQuantity,

    #[error("Price must be positive")]
    NonPositivePrice,

    #[error("Quantity {quantity} exceeds the asset's total supply {supply}")]
    QuantityExceedsSupply { quantity: Quantity, supply: Quantity },

    #[error("{0}")]
    InvalidField(String),
}

/// Participant-level rejections. Who you are, not what you sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EligibilityError {
    #[error("Participant {0} has not completed verification")]
    NotVerified(Address),

    #[error("Participant {0} is not eligible for this distribution")]
    NotEligible(Address),
}

/// The entity exists but the requested transition is not legal from its
/// current state. Distinguished from validation so callers can map these
/// to conflict responses rather than bad-request ones.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),

    #[error("Trade {0} not found")]
    TradeNotFound(TradeId),

    #[error("Distribution {0} not found")]
    DistributionNotFound(DistributionId),

    #[error("Order {0} does not belong to the requesting participant")]
    NotOwner(OrderId),

    /// A cancel that lost the race against matching: the order closed
    /// first, and the caller learns what it closed as.
    #[error("Order {order_id} is already {status}")]
    OrderAlreadyClosed { order_id: OrderId, status: String },

    #[error("Trade {trade_id} is already {status}")]
    AlreadyTerminal { trade_id: TradeId, status: String },

    #[error("Dividend already claimed by {0}")]
    AlreadyClaimed(Address),

    #[error("Self-trade rejected: order would match against the participant's own resting order")]
    SelfTrade,
}

/// Failures reported by the settlement ledger. Transient errors are
/// retried with backoff; permanent ones fail the trade immediately.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    #[error("Ledger call timed out")]
    Timeout,

    #[error("Ledger unreachable: {0}")]
    Network(String),

    #[error("Transfer rejected by ledger: {0}")]
    Rejected(String),

    #[error("Insufficient balance for transfer")]
    InsufficientBalance,
}

impl SettlementError {
    /// Transient failures are retryable; permanent ones are not.
    /// An unobserved outcome (timeout) counts as transient because the
    /// ledger is expected to deduplicate by trade id.
    pub fn is_transient(&self) -> bool {
        matches!(self, SettlementError::Timeout | SettlementError::Network(_))
    }
}

/// Conditions that should be impossible if the engine is correct.
/// These are logged at error level and abort the operation; they are
/// never mapped to a client-facing rejection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Over-fill on order {order_id}: fill {requested} exceeds remaining {remaining}")]
    OverFill {
        order_id: OrderId,
        requested: String,
        remaining: String,
    },

    #[error("Book entry for order {0} missing from index")]
    IndexDesync(OrderId),
}

/// Umbrella error for operations that can fail in more than one category.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Eligibility(#[from] EligibilityError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Settlement(#[from] SettlementError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    #[error("Market engine unavailable: {0}")]
    EngineUnavailable(String),
}

pub type MarketResult<T> = std::result::Result<T, MarketError>;
