//! Port for confirmed token holdings.
//!
//! This is the marketplace's projection of who owns what: initial
//! issuance plus every settlement-confirmed trade. Pending trades are
//! invisible here, which is what makes it the right base for dividend
//! snapshots.

use async_trait::async_trait;

use crate::domain::errors::MarketResult;
use crate::domain::value_objects::{Address, AssetId, Quantity};

/// Read operations for holdings
#[async_trait]
pub trait HoldingsReader: Send + Sync {
    /// Confirmed balance of one holder in one asset
    async fn balance(&self, asset: &AssetId, holder: &Address) -> Quantity;

    /// Every holder of an asset with a positive balance
    async fn holders_of(&self, asset: &AssetId) -> Vec<(Address, Quantity)>;

    /// Everything one address holds, across assets
    async fn holdings_of(&self, holder: &Address) -> Vec<(AssetId, Quantity)>;
}

/// Write operations for holdings
#[async_trait]
pub trait HoldingsWriter: Send + Sync {
    /// Credit tokens to a holder (issuance and config seeding)
    async fn credit(&self, asset: &AssetId, holder: &Address, quantity: Quantity);

    /// Move confirmed tokens between holders. Fails when `from` holds
    /// less than `quantity`; balances must never go negative.
    async fn apply_transfer(
        &self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        quantity: Quantity,
    ) -> MarketResult<()>;
}

/// Combined repository trait
#[async_trait]
pub trait HoldingsRepository: HoldingsReader + HoldingsWriter {}

// Blanket implementation
impl<T: HoldingsReader + HoldingsWriter> HoldingsRepository for T {}
