use crate::application::ports::SubmitOutcome;
use crate::domain::value_objects::{Address, AssetId};
use crate::domain::{MarketResult, Order, OrderBookSnapshot, OrderId, Side, Timestamp, Trade};
use tokio::sync::oneshot;

/// Commands processed by a market shard, one at a time per shard thread.
#[derive(Debug)]
pub enum MarketCommand {
    /// Admit an order: assign its sequence, match, rest the remainder.
    SubmitOrder {
        order: Order,
        timestamp: Timestamp,
        response: oneshot::Sender<MarketResult<SubmitOutcome>>,
    },

    /// Cancel an open order on behalf of its owner.
    CancelOrder {
        asset: AssetId,
        order_id: OrderId,
        requester: Address,
        timestamp: Timestamp,
        response: oneshot::Sender<MarketResult<Order>>,
    },

    /// Aggregated depth snapshot for one book.
    GetDepth {
        asset: AssetId,
        levels: usize,
        response: oneshot::Sender<OrderBookSnapshot>,
    },

    /// Look up an order, open or terminal.
    GetOrder {
        asset: AssetId,
        order_id: OrderId,
        response: oneshot::Sender<Option<Order>>,
    },

    /// Open orders in price-time priority, optionally one side only.
    GetOpenOrders {
        asset: AssetId,
        side: Option<Side>,
        response: oneshot::Sender<Vec<Order>>,
    },

    /// One participant's open orders on a book.
    GetOpenOrdersForOwner {
        asset: AssetId,
        owner: Address,
        response: oneshot::Sender<Vec<Order>>,
    },

    /// Restore the fills of a failed trade to both of its orders.
    ReverseTrade {
        trade: Trade,
        timestamp: Timestamp,
        response: oneshot::Sender<MarketResult<(Order, Order)>>,
    },

    /// Stop the shard thread.
    Shutdown,
}

/// Statistics for a shard.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ShardStats {
    pub shard_id: usize,
    pub open_books: u64,
    pub orders_processed: u64,
    pub trades_executed: u64,
    pub commands_in_queue: usize,
}
