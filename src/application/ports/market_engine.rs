//! Port for the per-asset matching engine.
//!
//! Everything that must observe an asset's book serially goes through
//! this trait: order admission, cancellation, depth reads, and the fill
//! reversals issued by settlement. The engine guarantees that operations
//! on the same asset are applied one at a time in arrival order.

use async_trait::async_trait;

use crate::domain::entities::{Order, OrderBookSnapshot, Trade};
use crate::domain::errors::MarketResult;
use crate::domain::value_objects::{Address, AssetId, OrderId, Side};

/// Outcome of admitting an order: the order's post-match state plus the
/// trades generated while crossing the book.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub order: Order,
    pub trades: Vec<Trade>,
}

#[async_trait]
pub trait MarketEngine: Send + Sync {
    /// Admit an order: assign its sequence number, match it against the
    /// book, and rest any remainder. Rejected orders leave no mark.
    async fn submit(&self, order: Order) -> MarketResult<SubmitOutcome>;

    /// Cancel an open order. Fails with `NotOwner` when the requester
    /// does not own it, `NotFound`/`AlreadyTerminal` per the order's
    /// state. The returned order carries whatever filled before the
    /// cancel was observed.
    async fn cancel(
        &self,
        asset: &AssetId,
        order_id: OrderId,
        requester: &Address,
    ) -> MarketResult<Order>;

    /// Depth snapshot, top `levels` per side.
    async fn depth(&self, asset: &AssetId, levels: usize) -> MarketResult<OrderBookSnapshot>;

    /// Open orders on one side (or both) in price-time priority order.
    async fn open_orders(&self, asset: &AssetId, side: Option<Side>) -> MarketResult<Vec<Order>>;

    /// A participant's open orders for one asset.
    async fn open_orders_for_owner(
        &self,
        asset: &AssetId,
        owner: &Address,
    ) -> MarketResult<Vec<Order>>;

    /// Look up an order, open or terminal.
    async fn get_order(&self, asset: &AssetId, order_id: OrderId) -> MarketResult<Order>;

    /// Back out the fills of a failed trade, restoring quantity to both
    /// orders and reopening them in the book where their sequence
    /// numbers place them. Returns the updated (buy, sell) orders.
    async fn reverse_trade(&self, trade: &Trade) -> MarketResult<(Order, Order)>;
}
