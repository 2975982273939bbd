use crate::application::ports::{
    AssetReader, EligibilityVerifier, MarketEngine, SettlementQueue, TradeWriter,
};
use crate::domain::{
    Clock, MarketResult, Order, OrderValidator, Price, Quantity, Side, Trade, ValidationError,
};
use crate::domain::value_objects::{Address, AssetId};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SubmitOrderCommand {
    pub asset: String,
    pub owner: String,
    pub side: Side,
    pub quantity: Quantity,
    pub price: Price,
}

#[derive(Debug, Clone)]
pub struct SubmitOrderResult {
    pub order: Order,
    pub trades: Vec<Trade>,
}

/// Admits an order into the market.
///
/// Validation and eligibility run here, before the engine is touched;
/// matching itself happens inside the asset's shard. Trades that come
/// back are persisted and handed to the settlement queue without
/// waiting for the ledger.
pub struct SubmitOrderUseCase<C, M, A, V, T, Q>
where
    C: Clock,
    M: MarketEngine,
    A: AssetReader,
    V: EligibilityVerifier,
    T: TradeWriter,
    Q: SettlementQueue,
{
    clock: Arc<C>,
    engine: Arc<M>,
    asset_repo: Arc<A>,
    eligibility: Arc<V>,
    trade_repo: Arc<T>,
    settlement_queue: Arc<Q>,
}

impl<C, M, A, V, T, Q> SubmitOrderUseCase<C, M, A, V, T, Q>
where
    C: Clock,
    M: MarketEngine,
    A: AssetReader,
    V: EligibilityVerifier,
    T: TradeWriter,
    Q: SettlementQueue,
{
    pub fn new(
        clock: Arc<C>,
        engine: Arc<M>,
        asset_repo: Arc<A>,
        eligibility: Arc<V>,
        trade_repo: Arc<T>,
        settlement_queue: Arc<Q>,
    ) -> Self {
        Self {
            clock,
            engine,
            asset_repo,
            eligibility,
            trade_repo,
            settlement_queue,
        }
    }

    pub async fn execute(&self, command: SubmitOrderCommand) -> MarketResult<SubmitOrderResult> {
        OrderValidator::validate_terms(command.price, command.quantity)?;

        let asset_id = AssetId::new(&command.asset)
            .map_err(|e| ValidationError::InvalidField(e.to_string()))?;
        let owner = Address::new(&command.owner)
            .map_err(|e| ValidationError::InvalidField(e.to_string()))?;

        let asset = self
            .asset_repo
            .get(&asset_id)
            .await
            .ok_or_else(|| ValidationError::UnknownAsset(asset_id.clone()))?;

        if command.quantity > asset.total_tokens {
            return Err(ValidationError::QuantityExceedsSupply {
                quantity: command.quantity,
                supply: asset.total_tokens,
            }
            .into());
        }
        if command.quantity.inner().normalize().scale() > asset.decimals {
            return Err(ValidationError::InvalidField(format!(
                "Quantity finer than the asset's {} decimal places",
                asset.decimals
            ))
            .into());
        }

        if !self.eligibility.is_verified(&owner).await {
            return Err(crate::domain::EligibilityError::NotVerified(owner).into());
        }

        let order = Order::new(asset_id, owner, command.side, command.quantity, command.price)
            .with_timestamp(self.clock.now());

        let outcome = self.engine.submit(order).await?;

        for trade in &outcome.trades {
            self.trade_repo.save(trade.clone()).await;
            self.settlement_queue.enqueue(trade.id);
        }

        Ok(SubmitOrderResult {
            order: outcome.order,
            trades: outcome.trades,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::KycRegistry;
    use crate::application::ports::KycStatus;
    use crate::domain::{MarketError, StateError};
    use crate::infrastructure::{
        BroadcastEventPublisher, InMemoryAssetRepository, InMemoryKycRegistry,
        InMemoryTradeRepository, ShardManagerConfig, ShardedMarketManager, SystemClock,
        settlement_channel,
    };
    use crate::application::ports::AssetWriter;
    use crate::domain::entities::Asset;
    use rust_decimal_macros::dec;

    const ALICE: &str = "0xa000000000000000000000000000000000000001";
    const BOB: &str = "0xb000000000000000000000000000000000000002";

    struct TestEnv {
        clock: Arc<SystemClock>,
        engine: Arc<ShardedMarketManager>,
        asset_repo: Arc<InMemoryAssetRepository>,
        kyc: Arc<InMemoryKycRegistry>,
        trade_repo: Arc<InMemoryTradeRepository>,
        queue: Arc<crate::infrastructure::SettlementQueueSender>,
        queue_rx: tokio::sync::mpsc::UnboundedReceiver<crate::domain::TradeId>,
    }

    async fn setup_test_env() -> TestEnv {
        let publisher = Arc::new(BroadcastEventPublisher::new(128));
        let engine = Arc::new(ShardedMarketManager::new(
            ShardManagerConfig::default(),
            publisher,
        ));
        let asset_repo = Arc::new(InMemoryAssetRepository::new());
        asset_repo
            .save(Asset::new(
                AssetId::new("BRK-TOWER-A").unwrap(),
                "Berkeley Tower A",
                Quantity::from(dec!(100000)),
                Address::new("0x9000000000000000000000000000000000000009").unwrap(),
            ))
            .await;

        let kyc = Arc::new(InMemoryKycRegistry::new());
        kyc.set_status(Address::new(ALICE).unwrap(), KycStatus::Verified)
            .await;
        kyc.set_status(Address::new(BOB).unwrap(), KycStatus::Verified)
            .await;

        let (queue, queue_rx) = settlement_channel();

        TestEnv {
            clock: Arc::new(SystemClock),
            engine,
            asset_repo,
            kyc,
            trade_repo: Arc::new(InMemoryTradeRepository::new()),
            queue: Arc::new(queue),
            queue_rx,
        }
    }

    fn use_case(
        env: &TestEnv,
    ) -> SubmitOrderUseCase<
        SystemClock,
        ShardedMarketManager,
        InMemoryAssetRepository,
        InMemoryKycRegistry,
        InMemoryTradeRepository,
        crate::infrastructure::SettlementQueueSender,
    > {
        SubmitOrderUseCase::new(
            Arc::clone(&env.clock),
            Arc::clone(&env.engine),
            Arc::clone(&env.asset_repo),
            Arc::clone(&env.kyc),
            Arc::clone(&env.trade_repo),
            Arc::clone(&env.queue),
        )
    }

    fn command(owner: &str, side: Side, qty: rust_decimal::Decimal, price: rust_decimal::Decimal) -> SubmitOrderCommand {
        SubmitOrderCommand {
            asset: "BRK-TOWER-A".to_string(),
            owner: owner.to_string(),
            side,
            quantity: Quantity::from(qty),
            price: Price::from(price),
        }
    }

    #[tokio::test]
    async fn test_order_rests_on_empty_book() {
        let env = setup_test_env().await;
        let result = use_case(&env)
            .execute(command(ALICE, Side::Sell, dec!(500), dec!(1.05)))
            .await
            .unwrap();

        assert!(result.trades.is_empty());
        assert!(result.order.status.is_active());
        assert!(result.order.sequence > 0);
    }

    #[tokio::test]
    async fn test_crossing_order_trades_and_enqueues_settlement() {
        let mut env = setup_test_env().await;
        let uc = use_case(&env);

        uc.execute(command(ALICE, Side::Sell, dec!(500), dec!(1.05)))
            .await
            .unwrap();
        let result = uc
            .execute(command(BOB, Side::Buy, dec!(300), dec!(1.05)))
            .await
            .unwrap();

        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.quantity, Quantity::from(dec!(300)));
        assert_eq!(trade.price, Price::from(dec!(1.05)));

        // Persisted and queued for settlement.
        use crate::application::ports::TradeReader;
        assert!(env.trade_repo.get(&trade.id).await.is_some());
        assert_eq!(env.queue_rx.try_recv().ok(), Some(trade.id));
    }

    #[tokio::test]
    async fn test_unknown_asset_rejected() {
        let env = setup_test_env().await;
        let mut cmd = command(ALICE, Side::Buy, dec!(10), dec!(1.00));
        cmd.asset = "NO-SUCH-ASSET".to_string();

        let err = use_case(&env).execute(cmd).await.unwrap_err();
        assert!(matches!(
            err,
            MarketError::Validation(ValidationError::UnknownAsset(_))
        ));
    }

    #[tokio::test]
    async fn test_unverified_owner_rejected() {
        let env = setup_test_env().await;
        let cmd = SubmitOrderCommand {
            owner: "0xffff000000000000000000000000000000000001".to_string(),
            ..command(ALICE, Side::Buy, dec!(10), dec!(1.00))
        };

        let err = use_case(&env).execute(cmd).await.unwrap_err();
        assert!(matches!(err, MarketError::Eligibility(_)));
    }

    #[tokio::test]
    async fn test_non_positive_quantity_rejected() {
        let env = setup_test_env().await;
        let err = use_case(&env)
            .execute(command(ALICE, Side::Buy, dec!(0), dec!(1.00)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MarketError::Validation(ValidationError::NonPositiveQuantity)
        ));
    }

    #[tokio::test]
    async fn test_quantity_above_total_supply_rejected() {
        let env = setup_test_env().await;
        let err = use_case(&env)
            .execute(command(ALICE, Side::Buy, dec!(200000), dec!(1.00)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MarketError::Validation(ValidationError::QuantityExceedsSupply { .. })
        ));
    }

    #[tokio::test]
    async fn test_quantity_finer_than_asset_decimals_rejected() {
        let env = setup_test_env().await;
        env.asset_repo
            .save(
                Asset::new(
                    AssetId::new("OAK-PLAZA-B").unwrap(),
                    "Oak Plaza B",
                    Quantity::from(dec!(1000)),
                    Address::new("0x9000000000000000000000000000000000000009").unwrap(),
                )
                .with_decimals(0),
            )
            .await;

        let mut cmd = command(ALICE, Side::Buy, dec!(10.5), dec!(1.00));
        cmd.asset = "OAK-PLAZA-B".to_string();

        let err = use_case(&env).execute(cmd).await.unwrap_err();
        assert!(matches!(
            err,
            MarketError::Validation(ValidationError::InvalidField(_))
        ));
    }

    #[tokio::test]
    async fn test_self_trade_rejected() {
        let env = setup_test_env().await;
        let uc = use_case(&env);

        uc.execute(command(ALICE, Side::Sell, dec!(100), dec!(1.00)))
            .await
            .unwrap();
        let err = uc
            .execute(command(ALICE, Side::Buy, dec!(100), dec!(1.00)))
            .await
            .unwrap_err();

        assert!(matches!(err, MarketError::State(StateError::SelfTrade)));
    }
}
