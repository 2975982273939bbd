//! Trade entity with its settlement lifecycle.
//!
//! A trade is created `Pending` the moment two orders match in memory and
//! reaches exactly one terminal state:
//! 1. Pending - matched in memory, transfer not yet on the ledger
//! 2. Confirmed - ledger transfer succeeded, tx hash recorded
//! 3. Failed - ledger rejected the transfer or retries exhausted; the
//!    fills it produced are reversed

use serde::{Deserialize, Serialize};

use crate::domain::errors::StateError;
use crate::domain::value_objects::{
    Address, AssetId, OrderId, Price, Quantity, Side, Timestamp, TradeId,
};
use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStatus {
    #[default]
    Pending,
    Confirmed,
    Failed,
}

impl SettlementStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SettlementStatus::Confirmed | SettlementStatus::Failed)
    }
}

impl std::fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettlementStatus::Pending => write!(f, "PENDING"),
            SettlementStatus::Confirmed => write!(f, "CONFIRMED"),
            SettlementStatus::Failed => write!(f, "FAILED"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub asset: AssetId,
    /// Execution price, always taken from the resting order.
    pub price: Price,
    pub quantity: Quantity,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buyer: Address,
    pub seller: Address,
    /// The side of the incoming (aggressor) order.
    pub taker_side: Side,
    pub settlement: SettlementStatus,
    /// Ledger transaction hash, present once confirmed.
    pub tx_hash: Option<String>,
    /// Settlement attempts made so far, including the failed ones.
    pub attempts: u32,
    pub failure_reason: Option<String>,
    pub executed_at: Timestamp,
    pub settled_at: Option<Timestamp>,
}

impl Trade {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        asset: AssetId,
        price: Price,
        quantity: Quantity,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        buyer: Address,
        seller: Address,
        taker_side: Side,
    ) -> Self {
        Trade {
            id: TradeId::new_v4(),
            asset,
            price,
            quantity,
            buy_order_id,
            sell_order_id,
            buyer,
            seller,
            taker_side,
            settlement: SettlementStatus::Pending,
            tx_hash: None,
            attempts: 0,
            failure_reason: None,
            executed_at: Utc::now(),
            settled_at: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.executed_at = timestamp;
        self
    }

    /// Buyer's order was the resting one.
    pub fn buyer_is_maker(&self) -> bool {
        self.taker_side == Side::Sell
    }

    pub fn maker_order_id(&self) -> OrderId {
        if self.buyer_is_maker() {
            self.buy_order_id
        } else {
            self.sell_order_id
        }
    }

    pub fn taker_order_id(&self) -> OrderId {
        if self.buyer_is_maker() {
            self.sell_order_id
        } else {
            self.buy_order_id
        }
    }

    /// Notional value of the trade (price * quantity)
    pub fn notional(&self) -> rust_decimal::Decimal {
        self.price.inner() * self.quantity.inner()
    }

    pub fn is_pending(&self) -> bool {
        self.settlement == SettlementStatus::Pending
    }

    pub fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Marks the trade settled. Only a pending trade can be confirmed;
    /// a second notification for the same trade is a state error, which
    /// keeps reversal and confirmation from ever both applying.
    pub fn confirm(&mut self, tx_hash: impl Into<String>, now: Timestamp) -> Result<(), StateError> {
        if self.settlement.is_terminal() {
            return Err(StateError::AlreadyTerminal {
                trade_id: self.id,
                status: self.settlement.to_string(),
            });
        }
        self.settlement = SettlementStatus::Confirmed;
        self.tx_hash = Some(tx_hash.into());
        self.settled_at = Some(now);
        Ok(())
    }

    /// Marks the trade failed. The caller is responsible for reversing
    /// the fills exactly once, which the terminal-state check guarantees.
    pub fn fail(&mut self, reason: impl Into<String>, now: Timestamp) -> Result<(), StateError> {
        if self.settlement.is_terminal() {
            return Err(StateError::AlreadyTerminal {
                trade_id: self.id,
                status: self.settlement.to_string(),
            });
        }
        self.settlement = SettlementStatus::Failed;
        self.failure_reason = Some(reason.into());
        self.settled_at = Some(now);
        Ok(())
    }
}

impl PartialEq for Trade {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Trade {}

impl std::hash::Hash for Trade {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
