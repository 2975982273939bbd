use crate::application::ports::MarketEngine;
use crate::domain::value_objects::AssetId;
use crate::domain::{MarketResult, OrderBookSnapshot, ValidationError};
use std::sync::Arc;

pub const DEFAULT_DEPTH_LEVELS: usize = 10;
pub const MAX_DEPTH_LEVELS: usize = 100;

/// Aggregated depth snapshot for one asset's book.
pub struct GetDepthUseCase<M>
where
    M: MarketEngine,
{
    engine: Arc<M>,
}

impl<M> GetDepthUseCase<M>
where
    M: MarketEngine,
{
    pub fn new(engine: Arc<M>) -> Self {
        Self { engine }
    }

    /// Returns up to `levels` aggregated price levels per side, best first.
    /// `levels` falls back to [`DEFAULT_DEPTH_LEVELS`] and is capped at
    /// [`MAX_DEPTH_LEVELS`].
    pub async fn execute(
        &self,
        asset: &str,
        levels: Option<usize>,
    ) -> MarketResult<OrderBookSnapshot> {
        let asset_id =
            AssetId::new(asset).map_err(|e| ValidationError::InvalidField(e.to_string()))?;
        let levels = levels
            .unwrap_or(DEFAULT_DEPTH_LEVELS)
            .min(MAX_DEPTH_LEVELS)
            .max(1);

        self.engine.depth(&asset_id, levels).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MarketEngine;
    use crate::domain::value_objects::Address;
    use crate::domain::{Order, Price, Quantity, Side};
    use crate::infrastructure::{
        BroadcastEventPublisher, ShardManagerConfig, ShardedMarketManager,
    };
    use rust_decimal_macros::dec;

    const ALICE: &str = "0xa000000000000000000000000000000000000001";

    async fn engine_with_asks() -> Arc<ShardedMarketManager> {
        let publisher = Arc::new(BroadcastEventPublisher::new(128));
        let engine = Arc::new(ShardedMarketManager::new(
            ShardManagerConfig::default(),
            publisher,
        ));
        let asset = AssetId::new("BRK-TOWER-A").unwrap();
        for (price, qty) in [(dec!(1.05), dec!(100)), (dec!(1.06), dec!(200)), (dec!(1.07), dec!(50))] {
            engine
                .submit(Order::new(
                    asset.clone(),
                    Address::new(ALICE).unwrap(),
                    Side::Sell,
                    Quantity::from(qty),
                    Price::from(price),
                ))
                .await
                .unwrap();
        }
        engine
    }

    #[tokio::test]
    async fn test_depth_levels_best_first() {
        let engine = engine_with_asks().await;
        let uc = GetDepthUseCase::new(engine);
        let snapshot = uc.execute("BRK-TOWER-A", None).await.unwrap();

        assert!(snapshot.bids.is_empty());
        assert_eq!(snapshot.asks.len(), 3);
        assert_eq!(snapshot.asks[0].price, Price::from(dec!(1.05)));
        assert_eq!(snapshot.asks[0].quantity, Quantity::from(dec!(100)));
    }

    #[tokio::test]
    async fn test_depth_respects_level_cap() {
        let engine = engine_with_asks().await;
        let uc = GetDepthUseCase::new(engine);
        let snapshot = uc.execute("BRK-TOWER-A", Some(2)).await.unwrap();
        assert_eq!(snapshot.asks.len(), 2);
    }

    #[tokio::test]
    async fn test_depth_for_unlisted_asset_is_empty() {
        let publisher = Arc::new(BroadcastEventPublisher::new(128));
        let engine = Arc::new(ShardedMarketManager::new(
            ShardManagerConfig::default(),
            publisher,
        ));
        let uc = GetDepthUseCase::new(engine);
        let snapshot = uc.execute("EMPTY-ASSET", None).await.unwrap();
        assert!(snapshot.bids.is_empty());
        assert!(snapshot.asks.is_empty());
    }
}
