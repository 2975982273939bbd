use crate::domain::{ClaimEntry, DividendDistribution, Order, OrderBookSnapshot, Trade};
use serde::{Deserialize, Serialize};

/// Request to submit a new order
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub asset: String,
    pub owner: String,
    pub side: String,
    /// Decimal string, e.g. "12.50"
    pub price: String,
    /// Decimal string, e.g. "100"
    pub quantity: String,
}

/// One order, any status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: String,
    pub asset: String,
    pub owner: String,
    pub side: String,
    pub price: String,
    pub quantity: String,
    pub filled_quantity: String,
    pub remaining_quantity: String,
    pub status: String,
    pub sequence: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl OrderView {
    pub fn from_order(order: &Order) -> Self {
        OrderView {
            order_id: order.id.to_string(),
            asset: order.asset.to_string(),
            owner: order.owner.to_string(),
            side: order.side.to_string(),
            price: order.price.to_string(),
            quantity: order.quantity.to_string(),
            filled_quantity: order.filled_quantity.to_string(),
            remaining_quantity: order.remaining_quantity().to_string(),
            status: order.status.to_string(),
            sequence: order.sequence,
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
        }
    }
}

/// One executed trade, including its settlement progress
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeView {
    pub trade_id: String,
    pub asset: String,
    pub price: String,
    pub quantity: String,
    pub buyer: String,
    pub seller: String,
    pub buy_order_id: String,
    pub sell_order_id: String,
    pub taker_side: String,
    pub settlement_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub executed_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_at: Option<String>,
}

impl TradeView {
    pub fn from_trade(trade: &Trade) -> Self {
        TradeView {
            trade_id: trade.id.to_string(),
            asset: trade.asset.to_string(),
            price: trade.price.to_string(),
            quantity: trade.quantity.to_string(),
            buyer: trade.buyer.to_string(),
            seller: trade.seller.to_string(),
            buy_order_id: trade.buy_order_id.to_string(),
            sell_order_id: trade.sell_order_id.to_string(),
            taker_side: trade.taker_side.to_string(),
            settlement_status: trade.settlement.to_string(),
            tx_hash: trade.tx_hash.clone(),
            attempts: trade.attempts,
            failure_reason: trade.failure_reason.clone(),
            executed_at: trade.executed_at.to_rfc3339(),
            settled_at: trade.settled_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Response to a submitted order: the order plus any immediate fills.
/// Settlement of those fills is asynchronous; poll the trade for its
/// settlement status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOrderResponse {
    pub order: OrderView,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trades: Vec<TradeView>,
}

/// Depth request query params
#[derive(Debug, Clone, Deserialize)]
pub struct DepthQuery {
    pub asset: String,
    #[serde(default)]
    pub levels: Option<usize>,
}

/// Aggregated depth response, best prices first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthResponse {
    pub asset: String,
    pub revision: u64,
    pub bids: Vec<[String; 2]>,
    pub asks: Vec<[String; 2]>,
    pub timestamp: String,
}

impl DepthResponse {
    pub fn from_snapshot(snapshot: &OrderBookSnapshot) -> Self {
        DepthResponse {
            asset: snapshot.asset.to_string(),
            revision: snapshot.revision,
            bids: snapshot
                .bids
                .iter()
                .map(|l| [l.price.to_string(), l.quantity.to_string()])
                .collect(),
            asks: snapshot
                .asks
                .iter()
                .map(|l| [l.price.to_string(), l.quantity.to_string()])
                .collect(),
            timestamp: snapshot.timestamp.to_rfc3339(),
        }
    }
}

/// Open orders query params
#[derive(Debug, Clone, Deserialize)]
pub struct OpenOrdersQuery {
    pub asset: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
}

/// Single order lookup query params
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLookupQuery {
    pub asset: String,
}

/// Cancel query params
#[derive(Debug, Clone, Deserialize)]
pub struct CancelQuery {
    pub asset: String,
    pub owner: String,
}

/// Trade tape query params
#[derive(Debug, Clone, Deserialize)]
pub struct TradesQuery {
    pub asset: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Distributions query params
#[derive(Debug, Clone, Deserialize)]
pub struct DistributionsQuery {
    pub asset: String,
}

/// One dividend distribution
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionView {
    pub distribution_id: String,
    pub asset: String,
    pub total_amount: String,
    pub per_token_amount: String,
    pub total_tokens: String,
    pub snapshot_time: String,
    pub created_at: String,
}

impl DistributionView {
    pub fn from_distribution(distribution: &DividendDistribution) -> Self {
        DistributionView {
            distribution_id: distribution.id.to_string(),
            asset: distribution.asset.to_string(),
            total_amount: distribution.total_amount.to_string(),
            per_token_amount: distribution.per_token_amount.to_string(),
            total_tokens: distribution.total_tokens.to_string(),
            snapshot_time: distribution.snapshot_time.to_rfc3339(),
            created_at: distribution.created_at.to_rfc3339(),
        }
    }
}

/// One holder's claim entry within a distribution
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimView {
    pub distribution_id: String,
    pub holder: String,
    pub balance: String,
    pub amount: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_at: Option<String>,
}

impl ClaimView {
    pub fn from_entry(entry: &ClaimEntry) -> Self {
        ClaimView {
            distribution_id: entry.distribution_id.to_string(),
            holder: entry.holder.to_string(),
            balance: entry.balance.to_string(),
            amount: entry.amount.to_string(),
            status: format!("{:?}", entry.status).to_uppercase(),
            claimed_at: entry.claimed_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Request to claim a dividend
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub holder: String,
}

/// Server time response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTimeResponse {
    pub server_time: String,
}

/// Ping response (empty)
#[derive(Debug, Clone, Serialize)]
pub struct PingResponse {}

/// Error response body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorResponse {
            code: code.into(),
            message: message.into(),
        }
    }
}
