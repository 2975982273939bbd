use crate::application::ports::{AssetReader, HoldingsReader, MarketEngine, TradeReader};
use crate::domain::entities::Asset;
use crate::domain::value_objects::{Address, AssetId};
use crate::domain::{
    MarketResult, Order, OrderId, Side, StateError, Timestamp, Trade, TradeId, ValidationError,
};
use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_TRADE_LIMIT: usize = 50;
pub const MAX_TRADE_LIMIT: usize = 500;

/// Listing-level view of one asset, including top-of-book prices.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    pub asset_id: String,
    pub name: String,
    pub total_tokens: String,
    /// Unsold supply: the issuer's confirmed balance.
    pub tokens_available: String,
    pub decimals: u32,
    pub issuer: String,
    pub best_bid: Option<String>,
    pub best_ask: Option<String>,
    pub last_price: Option<String>,
    pub listed_at: Timestamp,
}

/// Market-facing reads: listings, tape, and open orders.
pub struct GetMarketInfoUseCase<M, A, T, H>
where
    M: MarketEngine,
    A: AssetReader,
    T: TradeReader,
    H: HoldingsReader,
{
    engine: Arc<M>,
    asset_repo: Arc<A>,
    trade_repo: Arc<T>,
    holdings: Arc<H>,
}

impl<M, A, T, H> GetMarketInfoUseCase<M, A, T, H>
where
    M: MarketEngine,
    A: AssetReader,
    T: TradeReader,
    H: HoldingsReader,
{
    pub fn new(engine: Arc<M>, asset_repo: Arc<A>, trade_repo: Arc<T>, holdings: Arc<H>) -> Self {
        Self {
            engine,
            asset_repo,
            trade_repo,
            holdings,
        }
    }

    pub async fn list_assets(&self) -> MarketResult<Vec<AssetSummary>> {
        let assets = self.asset_repo.get_all().await;
        let mut summaries = Vec::with_capacity(assets.len());
        for asset in assets {
            summaries.push(self.build_summary(asset).await?);
        }
        summaries.sort_by(|a, b| a.asset_id.cmp(&b.asset_id));
        Ok(summaries)
    }

    pub async fn get_asset(&self, asset: &str) -> MarketResult<AssetSummary> {
        let asset_id =
            AssetId::new(asset).map_err(|e| ValidationError::InvalidField(e.to_string()))?;
        let asset = self
            .asset_repo
            .get(&asset_id)
            .await
            .ok_or(ValidationError::UnknownAsset(asset_id))?;
        self.build_summary(asset).await
    }

    /// Most recent trades for an asset, newest first.
    pub async fn recent_trades(
        &self,
        asset: &str,
        limit: Option<usize>,
    ) -> MarketResult<Vec<Trade>> {
        let asset_id =
            AssetId::new(asset).map_err(|e| ValidationError::InvalidField(e.to_string()))?;
        let limit = limit.unwrap_or(DEFAULT_TRADE_LIMIT).min(MAX_TRADE_LIMIT);
        Ok(self.trade_repo.get_by_asset(&asset_id, limit).await)
    }

    pub async fn get_trade(&self, trade_id: &str) -> MarketResult<Trade> {
        let trade_id = TradeId::parse_str(trade_id)
            .map_err(|_| ValidationError::InvalidField("tradeId must be a UUID".to_string()))?;
        self.trade_repo
            .get(&trade_id)
            .await
            .ok_or_else(|| StateError::TradeNotFound(trade_id).into())
    }

    pub async fn get_order(&self, asset: &str, order_id: &str) -> MarketResult<Order> {
        let asset_id =
            AssetId::new(asset).map_err(|e| ValidationError::InvalidField(e.to_string()))?;
        let order_id = OrderId::parse_str(order_id)
            .map_err(|_| ValidationError::InvalidField("orderId must be a UUID".to_string()))?;
        self.engine.get_order(&asset_id, order_id).await
    }

    /// Open orders on one book in price-time priority, optionally filtered
    /// by side and owner.
    pub async fn open_orders(
        &self,
        asset: &str,
        side: Option<Side>,
        owner: Option<&str>,
    ) -> MarketResult<Vec<Order>> {
        let asset_id =
            AssetId::new(asset).map_err(|e| ValidationError::InvalidField(e.to_string()))?;

        let mut orders = match owner {
            Some(owner) => {
                let owner = Address::new(owner)
                    .map_err(|e| ValidationError::InvalidField(e.to_string()))?;
                self.engine.open_orders_for_owner(&asset_id, &owner).await?
            }
            None => self.engine.open_orders(&asset_id, side).await?,
        };
        if owner.is_some()
            && let Some(side) = side
        {
            orders.retain(|o| o.side == side);
        }
        Ok(orders)
    }

    async fn build_summary(&self, asset: Asset) -> MarketResult<AssetSummary> {
        let depth = self.engine.depth(&asset.id, 1).await?;
        let last_price = self
            .trade_repo
            .get_by_asset(&asset.id, 1)
            .await
            .first()
            .map(|t| t.price.to_string());
        let tokens_available = self.holdings.balance(&asset.id, &asset.issuer).await;

        Ok(AssetSummary {
            asset_id: asset.id.to_string(),
            name: asset.name.clone(),
            total_tokens: asset.total_tokens.to_string(),
            tokens_available: tokens_available.to_string(),
            decimals: asset.decimals,
            issuer: asset.issuer.to_string(),
            best_bid: depth.bids.first().map(|l| l.price.to_string()),
            best_ask: depth.asks.first().map(|l| l.price.to_string()),
            last_price,
            listed_at: asset.listed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AssetWriter, HoldingsWriter, MarketEngine, TradeWriter};
    use crate::domain::{Price, Quantity};
    use crate::infrastructure::{
        BroadcastEventPublisher, InMemoryAssetRepository, InMemoryHoldingsRepository,
        InMemoryTradeRepository, ShardManagerConfig, ShardedMarketManager,
    };
    use rust_decimal_macros::dec;

    const ALICE: &str = "0xa000000000000000000000000000000000000001";
    const BOB: &str = "0xb000000000000000000000000000000000000002";

    struct TestEnv {
        engine: Arc<ShardedMarketManager>,
        asset_repo: Arc<InMemoryAssetRepository>,
        trade_repo: Arc<InMemoryTradeRepository>,
        holdings: Arc<InMemoryHoldingsRepository>,
        asset: AssetId,
    }

    async fn setup() -> TestEnv {
        let publisher = Arc::new(BroadcastEventPublisher::new(128));
        let engine = Arc::new(ShardedMarketManager::new(
            ShardManagerConfig::default(),
            publisher,
        ));
        let asset = AssetId::new("BRK-TOWER-A").unwrap();
        let asset_repo = Arc::new(InMemoryAssetRepository::new());
        asset_repo
            .save(Asset::new(
                asset.clone(),
                "Berkeley Tower A",
                Quantity::from(dec!(100000)),
                Address::new(ALICE).unwrap(),
            ))
            .await;
        let holdings = Arc::new(InMemoryHoldingsRepository::new());
        holdings
            .credit(
                &asset,
                &Address::new(ALICE).unwrap(),
                Quantity::from(dec!(100000)),
            )
            .await;
        TestEnv {
            engine,
            asset_repo,
            trade_repo: Arc::new(InMemoryTradeRepository::new()),
            holdings,
            asset,
        }
    }

    fn use_case(
        env: &TestEnv,
    ) -> GetMarketInfoUseCase<
        ShardedMarketManager,
        InMemoryAssetRepository,
        InMemoryTradeRepository,
        InMemoryHoldingsRepository,
    > {
        GetMarketInfoUseCase::new(
            Arc::clone(&env.engine),
            Arc::clone(&env.asset_repo),
            Arc::clone(&env.trade_repo),
            Arc::clone(&env.holdings),
        )
    }

    fn order(env: &TestEnv, owner: &str, side: Side, qty: rust_decimal::Decimal, price: rust_decimal::Decimal) -> Order {
        Order::new(
            env.asset.clone(),
            Address::new(owner).unwrap(),
            side,
            Quantity::from(qty),
            Price::from(price),
        )
    }

    #[tokio::test]
    async fn test_summary_reports_top_of_book() {
        let env = setup().await;
        env.engine
            .submit(order(&env, ALICE, Side::Sell, dec!(100), dec!(1.10)))
            .await
            .unwrap();
        env.engine
            .submit(order(&env, BOB, Side::Buy, dec!(100), dec!(1.05)))
            .await
            .unwrap();

        let summary = use_case(&env).get_asset("BRK-TOWER-A").await.unwrap();
        assert_eq!(summary.best_bid.as_deref(), Some("1.05"));
        assert_eq!(summary.best_ask.as_deref(), Some("1.10"));
        assert_eq!(summary.last_price, None);
        // Nothing has settled, so the issuer still holds the full supply.
        assert_eq!(summary.tokens_available, "100000");
    }

    #[tokio::test]
    async fn test_open_orders_filters_by_owner_and_side() {
        let env = setup().await;
        env.engine
            .submit(order(&env, ALICE, Side::Sell, dec!(10), dec!(1.10)))
            .await
            .unwrap();
        env.engine
            .submit(order(&env, ALICE, Side::Buy, dec!(10), dec!(1.00)))
            .await
            .unwrap();
        env.engine
            .submit(order(&env, BOB, Side::Buy, dec!(10), dec!(1.01)))
            .await
            .unwrap();

        let uc = use_case(&env);
        let all = uc.open_orders("BRK-TOWER-A", None, None).await.unwrap();
        assert_eq!(all.len(), 3);

        let alice_sells = uc
            .open_orders("BRK-TOWER-A", Some(Side::Sell), Some(ALICE))
            .await
            .unwrap();
        assert_eq!(alice_sells.len(), 1);
        assert_eq!(alice_sells[0].side, Side::Sell);
    }

    #[tokio::test]
    async fn test_recent_trades_newest_first() {
        let env = setup().await;
        let uc = use_case(&env);

        env.engine
            .submit(order(&env, ALICE, Side::Sell, dec!(100), dec!(1.00)))
            .await
            .unwrap();
        let outcome = env
            .engine
            .submit(order(&env, BOB, Side::Buy, dec!(100), dec!(1.00)))
            .await
            .unwrap();
        for trade in &outcome.trades {
            env.trade_repo.save(trade.clone()).await;
        }

        let trades = uc.recent_trades("BRK-TOWER-A", None).await.unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, Quantity::from(dec!(100)));

        let summary = uc.get_asset("BRK-TOWER-A").await.unwrap();
        assert_eq!(summary.last_price.as_deref(), Some("1.00"));
    }

    #[tokio::test]
    async fn test_unknown_asset_summary_rejected() {
        let env = setup().await;
        let err = use_case(&env).get_asset("NO-SUCH-ASSET").await.unwrap_err();
        assert!(matches!(
            err,
            crate::domain::MarketError::Validation(ValidationError::UnknownAsset(_))
        ));
    }
}
