//! Tokenized real-estate marketplace engine
//!
//! An order-book and settlement engine for trading fractional ownership
//! tokens of real-estate assets.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture with clear separation of concerns:
//!
//! - **Domain**: Core business entities and rules (OrderBook, Order, Trade,
//!   DividendDistribution, etc.)
//! - **Application**: Use cases and port interfaces (SubmitOrder, SettleTrade,
//!   DistributeDividend, etc.)
//! - **Infrastructure**: Implementations of ports (sharded matching engine,
//!   in-memory repositories, simulated settlement ledger)
//! - **Presentation**: REST API handlers
//!
//! # Features
//!
//! - Per-asset limit order books with price-time priority matching, run on
//!   sharded engine threads
//! - Asynchronous trade settlement against an external token ledger, with
//!   retries and automatic fill reversal on permanent failure
//! - Participant verification gates on order admission
//! - Pro-rata dividend distributions with exactly-once claims
//! - REST API (`/api/v1/...`) plus operator endpoints under `/admin`
//!
//! # Example
//!
//! ```ignore
//! use estate_exchange::{Marketplace, MarketplaceConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = MarketplaceConfig::default();
//!     let marketplace = Marketplace::new(config);
//!     marketplace.run().await.unwrap();
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types
pub use domain::{
    Address, Asset, AssetId, ClaimEntry, ClaimStatus, Clock, DistributionId, DividendDistribution,
    MarketError, MarketEvent, MarketResult, Order, OrderBook, OrderBookSnapshot, OrderId,
    OrderStatus, Price, Quantity, SettlementStatus, Side, Timestamp, Trade, TradeId,
};

pub use infrastructure::{
    BroadcastEventPublisher, ConfigError, InMemoryAssetRepository, InMemoryDistributionRepository,
    InMemoryHoldingsRepository, InMemoryKycRegistry, InMemoryTradeRepository, LedgerBehavior,
    LedgerLatency, MarketplaceConfig, SettlementQueueSender, SettlementWorker,
    ShardManagerConfig, ShardedMarketManager, SimulatedLedger, SimulationClock, SystemClock,
    settlement_channel,
};

pub use application::{
    CancelOrderCommand, CancelOrderUseCase, ClaimDividendCommand, ClaimDividendUseCase,
    DistributeDividendCommand, DistributeDividendUseCase, GetDepthUseCase, GetMarketInfoUseCase,
    GetPortfolioUseCase, KycStatus, ListAssetCommand, ListAssetUseCase, SettleTradeUseCase,
    SettlementPolicy, SubmitOrderCommand, SubmitOrderResult, SubmitOrderUseCase,
};

// Re-export port traits for integration tests
pub use application::ports::{
    AssetReader, AssetWriter, EligibilityVerifier, HoldingsReader, HoldingsWriter, KycRegistry,
    MarketEngine, SettlementLedger, TradeReader, TradeWriter,
};

pub use presentation::{ApiError, AppState, create_router};

use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

type MarketSettlementWorker<C> = SettlementWorker<
    C,
    ShardedMarketManager,
    InMemoryTradeRepository,
    InMemoryHoldingsRepository,
    SimulatedLedger,
    BroadcastEventPublisher,
>;

/// The main marketplace server.
///
/// Owns the engine, repositories, ledger adapter and settlement worker,
/// wired from a [`MarketplaceConfig`]. Seed data declared in the config
/// is applied through the normal use-case paths when the server starts.
pub struct Marketplace<C: Clock + 'static> {
    pub config: MarketplaceConfig,
    pub clock: Arc<C>,
    pub engine: Arc<ShardedMarketManager>,
    pub asset_repo: Arc<InMemoryAssetRepository>,
    pub trade_repo: Arc<InMemoryTradeRepository>,
    pub holdings: Arc<InMemoryHoldingsRepository>,
    pub distribution_repo: Arc<InMemoryDistributionRepository>,
    pub kyc: Arc<InMemoryKycRegistry>,
    pub ledger: Arc<SimulatedLedger>,
    pub event_publisher: Arc<BroadcastEventPublisher>,
    pub settlement_queue: Arc<SettlementQueueSender>,
    settlement_worker: Option<MarketSettlementWorker<C>>,
}

impl<C: Clock + 'static> Marketplace<C> {
    /// Create a new marketplace with the given clock
    pub fn with_clock(config: MarketplaceConfig, clock: Arc<C>) -> Self {
        let event_publisher = Arc::new(BroadcastEventPublisher::new(config.server.event_capacity));
        let engine = Arc::new(ShardedMarketManager::new(
            config.engine.to_manager_config(),
            Arc::clone(&event_publisher) as Arc<dyn application::ports::SyncEventSink>,
        ));
        let asset_repo = Arc::new(InMemoryAssetRepository::new());
        let trade_repo = Arc::new(InMemoryTradeRepository::new());
        let holdings = Arc::new(InMemoryHoldingsRepository::new());
        let distribution_repo = Arc::new(InMemoryDistributionRepository::new());
        let kyc = Arc::new(InMemoryKycRegistry::new());
        let ledger = Arc::new(SimulatedLedger::new().with_latency(LedgerLatency::new(
            config.ledger.base_latency_ms,
            config.ledger.jitter_std_dev_ms,
        )));

        let (settlement_queue, receiver) = settlement_channel();
        let settlement_queue = Arc::new(settlement_queue);
        let settle = SettleTradeUseCase::new(
            Arc::clone(&clock),
            Arc::clone(&engine),
            Arc::clone(&trade_repo),
            Arc::clone(&holdings),
            Arc::clone(&ledger),
            Arc::clone(&event_publisher),
            config.settlement.to_policy(),
        );
        let settlement_worker = Some(SettlementWorker::new(settle, receiver));

        Marketplace {
            config,
            clock,
            engine,
            asset_repo,
            trade_repo,
            holdings,
            distribution_repo,
            kyc,
            ledger,
            event_publisher,
            settlement_queue,
            settlement_worker,
        }
    }

    /// Create the REST API router
    pub fn rest_router(&self) -> Router {
        let state = Arc::new(AppState::new(
            Arc::clone(&self.clock),
            Arc::clone(&self.engine),
            Arc::clone(&self.asset_repo),
            Arc::clone(&self.trade_repo),
            Arc::clone(&self.holdings),
            Arc::clone(&self.distribution_repo),
            Arc::clone(&self.kyc),
            Arc::clone(&self.event_publisher),
            Arc::clone(&self.settlement_queue),
        ));

        create_router(state)
    }

    /// Apply seed data and start the settlement worker, returning the
    /// router to serve. Must run inside a tokio runtime.
    pub async fn start(&mut self) -> Result<Router, BoxError> {
        self.seed().await?;

        if let Some(worker) = self.settlement_worker.take() {
            tokio::spawn(worker.run());
        }

        Ok(self.rest_router())
    }

    /// Run the marketplace server
    pub async fn run(mut self) -> Result<(), BoxError> {
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let router = self.start().await?;

        tracing::info!(name = %self.config.name, "Marketplace listening on {}", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }

    /// Apply the config's seed data through the normal use-case paths:
    /// assets are listed (full supply to the issuer), participants
    /// registered, holdings moved from the issuer, the ledger seeded to
    /// mirror confirmed balances, and seed orders submitted through
    /// validation and matching like any client order.
    async fn seed(&self) -> Result<(), BoxError> {
        let list_asset = ListAssetUseCase::new(
            Arc::clone(&self.clock),
            Arc::clone(&self.asset_repo),
            Arc::clone(&self.holdings),
        );
        for asset_config in &self.config.assets {
            let asset = list_asset
                .execute(ListAssetCommand {
                    asset_id: asset_config.id.clone(),
                    name: asset_config.name.clone(),
                    total_tokens: asset_config.total_tokens,
                    decimals: asset_config.decimals,
                    issuer: asset_config.issuer.clone(),
                })
                .await?;
            tracing::info!(asset = %asset.id, supply = %asset.total_tokens, "Listed asset");
        }

        for participant in &self.config.participants {
            let address = participant.to_address()?;
            self.kyc.set_status(address, participant.status).await;
        }

        for holding in &self.config.holdings {
            let (asset_id, holder, quantity) = holding.to_parts()?;
            let asset = self.asset_repo.get(&asset_id).await.ok_or_else(|| {
                ConfigError::InvalidHolding(format!("{}: asset not listed", holding.asset))
            })?;
            self.holdings
                .apply_transfer(&asset_id, &asset.issuer, &holder, quantity)
                .await?;
        }

        // The simulated ledger mirrors the confirmed balances we just built.
        for asset_config in &self.config.assets {
            let asset_id = AssetId::new(&asset_config.id)
                .map_err(|e| ConfigError::InvalidAsset(e.to_string()))?;
            for (holder, balance) in self.holdings.holders_of(&asset_id).await {
                self.ledger.seed_balance(&asset_id, &holder, balance);
            }
        }

        if !self.config.seed_orders.is_empty() {
            let submit = SubmitOrderUseCase::new(
                Arc::clone(&self.clock),
                Arc::clone(&self.engine),
                Arc::clone(&self.asset_repo),
                Arc::clone(&self.kyc),
                Arc::clone(&self.trade_repo),
                Arc::clone(&self.settlement_queue),
            );
            for order in &self.config.seed_orders {
                submit
                    .execute(SubmitOrderCommand {
                        asset: order.asset.clone(),
                        owner: order.owner.clone(),
                        side: order.side,
                        quantity: order.quantity,
                        price: order.price,
                    })
                    .await
                    .map_err(|e| {
                        ConfigError::InvalidSeedOrder(format!(
                            "{}/{}: {}",
                            order.asset, order.owner, e
                        ))
                    })?;
            }
            tracing::info!(count = self.config.seed_orders.len(), "Seeded orders");
        }

        Ok(())
    }

    /// Get the event publisher for subscribing to events
    pub fn event_publisher(&self) -> &Arc<BroadcastEventPublisher> {
        &self.event_publisher
    }
}

impl Marketplace<SystemClock> {
    /// Create a new marketplace on the system clock
    pub fn new(config: MarketplaceConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }
}

impl Marketplace<SimulationClock> {
    /// Create a new marketplace on a controllable clock (for testing)
    pub fn simulated(config: MarketplaceConfig) -> Self {
        Self::with_clock(config, Arc::new(SimulationClock::new()))
    }
}
