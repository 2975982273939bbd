use crate::domain::errors::InvariantViolation;
use crate::domain::value_objects::{Address, AssetId, OrderId, Price, Quantity, Side, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Open,
    PartiallyFilled,
    Filled,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Cancelled)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Open | OrderStatus::PartiallyFilled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Open => write!(f, "OPEN"),
            OrderStatus::PartiallyFilled => write!(f, "PARTIALLY_FILLED"),
            OrderStatus::Filled => write!(f, "FILLED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// A limit order for a tokenized asset. Every order carries a price;
/// the marketplace has no market-order type, so an order that crosses
/// the book fills immediately and any remainder rests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub asset: AssetId,
    pub owner: Address,
    pub side: Side,
    pub quantity: Quantity,
    pub filled_quantity: Quantity,
    pub price: Price,
    /// Position in the global admission order. Assigned when the owning
    /// market shard admits the order; zero until then. Ties at equal
    /// price are broken by ascending sequence.
    pub sequence: u64,
    pub status: OrderStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    pub fn new(asset: AssetId, owner: Address, side: Side, quantity: Quantity, price: Price) -> Self {
        let now = Utc::now();
        Order {
            id: OrderId::new_v4(),
            asset,
            owner,
            side,
            quantity,
            filled_quantity: Quantity::ZERO,
            price,
            sequence: 0,
            status: OrderStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.created_at = timestamp;
        self.updated_at = timestamp;
        self
    }

    pub fn remaining_quantity(&self) -> Quantity {
        self.quantity.saturating_sub(self.filled_quantity)
    }

    pub fn is_filled(&self) -> bool {
        self.filled_quantity >= self.quantity
    }

    /// Records a fill against this order. A fill larger than the
    /// remaining quantity means the matcher produced an impossible
    /// state, so it is reported as an invariant violation rather than
    /// clamped.
    pub fn fill(&mut self, quantity: Quantity, now: Timestamp) -> Result<(), InvariantViolation> {
        if quantity > self.remaining_quantity() {
            return Err(InvariantViolation::OverFill {
                order_id: self.id,
                requested: quantity.to_string(),
                remaining: self.remaining_quantity().to_string(),
            });
        }
        self.filled_quantity = self.filled_quantity + quantity;
        self.updated_at = now;

        if self.is_filled() {
            self.status = OrderStatus::Filled;
        } else if self.filled_quantity > Quantity::ZERO {
            self.status = OrderStatus::PartiallyFilled;
        }
        Ok(())
    }

    /// Backs out a previously recorded fill after a failed settlement.
    /// A cancelled order keeps its cancelled status; the quantity is
    /// restored but the order does not re-enter the book.
    pub fn reverse_fill(
        &mut self,
        quantity: Quantity,
        now: Timestamp,
    ) -> Result<(), InvariantViolation> {
        if quantity > self.filled_quantity {
            return Err(InvariantViolation::OverFill {
                order_id: self.id,
                requested: quantity.to_string(),
                remaining: self.filled_quantity.to_string(),
            });
        }
        self.filled_quantity = self.filled_quantity.saturating_sub(quantity);
        self.updated_at = now;

        if self.status != OrderStatus::Cancelled {
            self.status = if self.filled_quantity.is_zero() {
                OrderStatus::Open
            } else {
                OrderStatus::PartiallyFilled
            };
        }
        Ok(())
    }

    pub fn cancel(&mut self, now: Timestamp) {
        if self.status.is_active() {
            self.status = OrderStatus::Cancelled;
            self.updated_at = now;
        }
    }
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Order {}

impl std::hash::Hash for Order {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
