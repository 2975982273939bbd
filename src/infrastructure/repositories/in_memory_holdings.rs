use crate::application::ports::{HoldingsReader, HoldingsWriter};
use crate::domain::errors::{MarketResult, SettlementError};
use crate::domain::value_objects::{Address, AssetId, Quantity};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory confirmed-holdings store
///
/// One entry per (asset, holder) pair. A transfer debits the sender
/// under that entry's lock and only then credits the receiver, so a
/// balance can never go negative and no two map locks are ever held at
/// once.
pub struct InMemoryHoldingsRepository {
    balances: Arc<DashMap<(AssetId, Address), Quantity>>,
}

impl InMemoryHoldingsRepository {
    pub fn new() -> Self {
        Self {
            balances: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemoryHoldingsRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryHoldingsRepository {
    fn clone(&self) -> Self {
        Self {
            balances: Arc::clone(&self.balances),
        }
    }
}

#[async_trait]
impl HoldingsReader for InMemoryHoldingsRepository {
    async fn balance(&self, asset: &AssetId, holder: &Address) -> Quantity {
        self.balances
            .get(&(asset.clone(), holder.clone()))
            .map(|b| *b.value())
            .unwrap_or(Quantity::ZERO)
    }

    async fn holders_of(&self, asset: &AssetId) -> Vec<(Address, Quantity)> {
        let mut holders: Vec<(Address, Quantity)> = self
            .balances
            .iter()
            .filter(|e| &e.key().0 == asset && e.value().is_positive())
            .map(|e| (e.key().1.clone(), *e.value()))
            .collect();

        holders.sort_by(|a, b| a.0.cmp(&b.0));
        holders
    }

    async fn holdings_of(&self, holder: &Address) -> Vec<(AssetId, Quantity)> {
        let mut holdings: Vec<(AssetId, Quantity)> = self
            .balances
            .iter()
            .filter(|e| &e.key().1 == holder && e.value().is_positive())
            .map(|e| (e.key().0.clone(), *e.value()))
            .collect();

        holdings.sort_by(|a, b| a.0.cmp(&b.0));
        holdings
    }
}

#[async_trait]
impl HoldingsWriter for InMemoryHoldingsRepository {
    async fn credit(&self, asset: &AssetId, holder: &Address, quantity: Quantity) {
        let mut entry = self
            .balances
            .entry((asset.clone(), holder.clone()))
            .or_insert(Quantity::ZERO);
        *entry = *entry + quantity;
    }

    async fn apply_transfer(
        &self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        quantity: Quantity,
    ) -> MarketResult<()> {
        {
            let mut sender = self
                .balances
                .get_mut(&(asset.clone(), from.clone()))
                .ok_or(SettlementError::InsufficientBalance)?;
            if *sender < quantity {
                return Err(SettlementError::InsufficientBalance.into());
            }
            *sender = *sender - quantity;
        }

        self.credit(asset, to, quantity).await;
        Ok(())
    }
}
