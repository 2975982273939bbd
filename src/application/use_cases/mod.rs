mod cancel_order;
mod claim_dividend;
mod distribute_dividend;
mod get_depth;
mod get_market_info;
mod get_portfolio;
mod list_asset;
mod settle_trade;
mod submit_order;

pub use cancel_order::{CancelOrderCommand, CancelOrderUseCase};
pub use claim_dividend::{ClaimDividendCommand, ClaimDividendUseCase};
pub use distribute_dividend::{
    DistributeDividendCommand, DistributeDividendResult, DistributeDividendUseCase,
};
pub use get_depth::{GetDepthUseCase, DEFAULT_DEPTH_LEVELS, MAX_DEPTH_LEVELS};
pub use get_market_info::{AssetSummary, GetMarketInfoUseCase, DEFAULT_TRADE_LIMIT, MAX_TRADE_LIMIT};
pub use get_portfolio::{GetPortfolioUseCase, HoldingView};
pub use list_asset::{ListAssetCommand, ListAssetUseCase};
pub use settle_trade::{SettlementPolicy, SettleTradeResult, SettleTradeUseCase};
pub use submit_order::{SubmitOrderCommand, SubmitOrderResult, SubmitOrderUseCase};
