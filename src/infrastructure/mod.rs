pub mod clock;
pub mod config;
pub mod event_publisher;
pub mod ledger;
pub mod market_shard;
pub mod repositories;
pub mod settlement;

pub use clock::{SimulationClock, SystemClock};
pub use config::{ConfigError, MarketplaceConfig};
pub use event_publisher::BroadcastEventPublisher;
pub use ledger::{LedgerBehavior, LedgerLatency, SimulatedLedger};
pub use market_shard::{
    ConsistentHashStrategy, MarketCommand, MarketShard, ShardConfig, ShardError, ShardHandle,
    ShardManagerConfig, ShardStats, ShardedMarketManager, ShardingStrategy,
};
pub use repositories::{
    InMemoryAssetRepository, InMemoryDistributionRepository, InMemoryHoldingsRepository,
    InMemoryKycRegistry, InMemoryTradeRepository,
};
pub use settlement::{SettlementQueueSender, SettlementWorker, settlement_channel};
