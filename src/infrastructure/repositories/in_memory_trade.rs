use crate::application::ports::{TradeReader, TradeWriter};
use crate::domain::entities::Trade;
use crate::domain::value_objects::{Address, AssetId, TradeId};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory trade store
///
/// Trades are inserted at execution and updated in place as settlement
/// advances. Reads that return lists sort newest first by execution
/// time, with the trade id as a tiebreak so the order is stable.
pub struct InMemoryTradeRepository {
    trades: Arc<DashMap<TradeId, Trade>>,
}

impl InMemoryTradeRepository {
    pub fn new() -> Self {
        Self {
            trades: Arc::new(DashMap::new()),
        }
    }

    fn sorted_newest_first(mut trades: Vec<Trade>) -> Vec<Trade> {
        trades.sort_by(|a, b| b.executed_at.cmp(&a.executed_at).then(b.id.cmp(&a.id)));
        trades
    }
}

impl Default for InMemoryTradeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryTradeRepository {
    fn clone(&self) -> Self {
        Self {
            trades: Arc::clone(&self.trades),
        }
    }
}

#[async_trait]
impl TradeReader for InMemoryTradeRepository {
    async fn get(&self, id: &TradeId) -> Option<Trade> {
        self.trades.get(id).map(|t| t.value().clone())
    }

    async fn get_by_asset(&self, asset: &AssetId, limit: usize) -> Vec<Trade> {
        let matching = self
            .trades
            .iter()
            .filter(|e| &e.value().asset == asset)
            .map(|e| e.value().clone())
            .collect();

        let mut trades = Self::sorted_newest_first(matching);
        trades.truncate(limit);
        trades
    }

    async fn get_by_participant(&self, participant: &Address) -> Vec<Trade> {
        let matching = self
            .trades
            .iter()
            .filter(|e| {
                let t = e.value();
                &t.buyer == participant || &t.seller == participant
            })
            .map(|e| e.value().clone())
            .collect();

        Self::sorted_newest_first(matching)
    }

    async fn get_pending(&self) -> Vec<Trade> {
        let pending = self
            .trades
            .iter()
            .filter(|e| e.value().is_pending())
            .map(|e| e.value().clone())
            .collect();

        // Oldest first: pending trades are retried in execution order
        let mut trades = Self::sorted_newest_first(pending);
        trades.reverse();
        trades
    }
}

#[async_trait]
impl TradeWriter for InMemoryTradeRepository {
    async fn save(&self, trade: Trade) {
        self.trades.insert(trade.id, trade);
    }
}
