use crate::domain::entities::{DistributionId, Order, OrderStatus, SettlementStatus, Trade};
use crate::domain::value_objects::{
    Address, AssetId, OrderId, Price, Quantity, Side, Timestamp, TradeId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Domain events emitted by the marketplace
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "camelCase")]
pub enum MarketEvent {
    /// Order was admitted, possibly already partially filled by the
    /// match that ran at admission
    OrderAccepted(OrderAcceptedEvent),
    /// Order was cancelled by its owner
    OrderCancelled(OrderCancelledEvent),
    /// Two orders matched
    TradeExecuted(TradeExecutedEvent),
    /// Ledger confirmed the transfer for a trade
    TradeSettled(TradeSettledEvent),
    /// Settlement failed; fills were reversed
    TradeFailed(TradeFailedEvent),
    /// Dividend distribution created
    DividendDistributed(DividendDistributedEvent),
    /// A holder claimed their dividend entitlement
    DividendClaimed(DividendClaimedEvent),
}

impl MarketEvent {
    /// Asset this event concerns, for per-asset subscriptions.
    pub fn asset(&self) -> &AssetId {
        match self {
            MarketEvent::OrderAccepted(e) => &e.asset,
            MarketEvent::OrderCancelled(e) => &e.asset,
            MarketEvent::TradeExecuted(e) => &e.asset,
            MarketEvent::TradeSettled(e) => &e.asset,
            MarketEvent::TradeFailed(e) => &e.asset,
            MarketEvent::DividendDistributed(e) => &e.asset,
            MarketEvent::DividendClaimed(e) => &e.asset,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAcceptedEvent {
    pub order_id: OrderId,
    pub asset: AssetId,
    pub owner: Address,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    /// Filled during the admission match, zero if the order rested whole
    pub filled_quantity: Quantity,
    pub status: OrderStatus,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCancelledEvent {
    pub order_id: OrderId,
    pub asset: AssetId,
    pub owner: Address,
    /// Quantity that had filled before the cancel was observed
    pub filled_quantity: Quantity,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeExecutedEvent {
    pub trade_id: TradeId,
    pub asset: AssetId,
    pub price: Price,
    pub quantity: Quantity,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buyer_is_maker: bool,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSettledEvent {
    pub trade_id: TradeId,
    pub asset: AssetId,
    pub tx_hash: Option<String>,
    pub attempts: u32,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeFailedEvent {
    pub trade_id: TradeId,
    pub asset: AssetId,
    pub reason: String,
    /// Whether the fills were reversed back into the book
    pub reversed: bool,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendDistributedEvent {
    pub distribution_id: DistributionId,
    pub asset: AssetId,
    pub total_amount: Decimal,
    pub per_token_amount: Decimal,
    pub holder_count: usize,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendClaimedEvent {
    pub distribution_id: DistributionId,
    pub asset: AssetId,
    pub holder: Address,
    pub amount: Decimal,
    pub timestamp: Timestamp,
}

impl From<&Order> for OrderAcceptedEvent {
    fn from(order: &Order) -> Self {
        OrderAcceptedEvent {
            order_id: order.id,
            asset: order.asset.clone(),
            owner: order.owner.clone(),
            side: order.side,
            price: order.price,
            quantity: order.quantity,
            filled_quantity: order.filled_quantity,
            status: order.status,
            timestamp: order.created_at,
        }
    }
}

impl From<&Order> for OrderCancelledEvent {
    fn from(order: &Order) -> Self {
        OrderCancelledEvent {
            order_id: order.id,
            asset: order.asset.clone(),
            owner: order.owner.clone(),
            filled_quantity: order.filled_quantity,
            timestamp: order.updated_at,
        }
    }
}

impl From<&Trade> for TradeExecutedEvent {
    fn from(trade: &Trade) -> Self {
        TradeExecutedEvent {
            trade_id: trade.id,
            asset: trade.asset.clone(),
            price: trade.price,
            quantity: trade.quantity,
            buy_order_id: trade.buy_order_id,
            sell_order_id: trade.sell_order_id,
            buyer_is_maker: trade.buyer_is_maker(),
            timestamp: trade.executed_at,
        }
    }
}

impl From<&Trade> for TradeSettledEvent {
    fn from(trade: &Trade) -> Self {
        TradeSettledEvent {
            trade_id: trade.id,
            asset: trade.asset.clone(),
            tx_hash: trade.tx_hash.clone(),
            attempts: trade.attempts,
            timestamp: trade.settled_at.unwrap_or(trade.executed_at),
        }
    }
}

impl TradeFailedEvent {
    pub fn new(trade: &Trade, reversed: bool) -> Self {
        debug_assert_eq!(trade.settlement, SettlementStatus::Failed);
        TradeFailedEvent {
            trade_id: trade.id,
            asset: trade.asset.clone(),
            reason: trade
                .failure_reason
                .clone()
                .unwrap_or_else(|| "settlement failed".to_string()),
            reversed,
            timestamp: trade.settled_at.unwrap_or(trade.executed_at),
        }
    }
}
