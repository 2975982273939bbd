mod asset_repository;
mod distribution_repository;
mod eligibility;
mod event_publisher;
mod holdings_repository;
mod ledger;
mod market_engine;
mod settlement_queue;
mod trade_repository;

pub use asset_repository::{AssetReader, AssetRepository, AssetWriter};
pub use distribution_repository::{DistributionReader, DistributionRepository, DistributionWriter};
pub use eligibility::{EligibilityVerifier, KycRegistry, KycStatus};
pub use event_publisher::{EventPublisher, SyncEventSink};
pub use holdings_repository::{HoldingsReader, HoldingsRepository, HoldingsWriter};
pub use ledger::{SettlementLedger, TransferInstruction};
pub use market_engine::{MarketEngine, SubmitOutcome};
pub use settlement_queue::SettlementQueue;
pub use trade_repository::{TradeReader, TradeRepository, TradeWriter};
