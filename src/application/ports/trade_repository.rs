//! Port for trade storage.
//!
//! Trades are written once at execution and updated in place as their
//! settlement lifecycle advances.

use async_trait::async_trait;

use crate::domain::entities::Trade;
use crate::domain::value_objects::{Address, AssetId, TradeId};

/// Read operations for trades
#[async_trait]
pub trait TradeReader: Send + Sync {
    /// Get a trade by ID
    async fn get(&self, id: &TradeId) -> Option<Trade>;

    /// Recent trades for an asset, newest first
    async fn get_by_asset(&self, asset: &AssetId, limit: usize) -> Vec<Trade>;

    /// Trades where the address was buyer or seller, newest first
    async fn get_by_participant(&self, participant: &Address) -> Vec<Trade>;

    /// Trades still awaiting settlement
    async fn get_pending(&self) -> Vec<Trade>;
}

/// Write operations for trades
#[async_trait]
pub trait TradeWriter: Send + Sync {
    /// Save a trade (insert or replace)
    async fn save(&self, trade: Trade);
}

/// Combined repository trait
#[async_trait]
pub trait TradeRepository: TradeReader + TradeWriter {}

// Blanket implementation
impl<T: TradeReader + TradeWriter> TradeRepository for T {}
