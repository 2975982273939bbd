pub mod ports;
pub mod use_cases;

pub use ports::{
    AssetRepository, DistributionRepository, EligibilityVerifier, EventPublisher,
    HoldingsRepository, KycRegistry, KycStatus, MarketEngine, SettlementLedger, SettlementQueue,
    SubmitOutcome, SyncEventSink, TradeRepository, TransferInstruction,
};
pub use use_cases::{
    // Order management
    CancelOrderCommand,
    CancelOrderUseCase,
    GetDepthUseCase,
    SubmitOrderCommand,
    SubmitOrderResult,
    SubmitOrderUseCase,
    // Settlement
    SettleTradeResult,
    SettleTradeUseCase,
    SettlementPolicy,
    // Dividends
    ClaimDividendCommand,
    ClaimDividendUseCase,
    DistributeDividendCommand,
    DistributeDividendResult,
    DistributeDividendUseCase,
    // Listings and reads
    AssetSummary,
    GetMarketInfoUseCase,
    GetPortfolioUseCase,
    HoldingView,
    ListAssetCommand,
    ListAssetUseCase,
};
