mod asset;
mod dividend;
mod order;
mod order_book;
mod price_level;
mod trade;

pub use asset::{Asset, DEFAULT_DECIMALS};
pub use dividend::{ClaimEntry, ClaimStatus, DistributionId, DividendDistribution};
pub use order::{Order, OrderStatus};
pub use order_book::{MatchOutcome, OrderBook, OrderBookSnapshot};
pub use price_level::PriceLevel;
pub use trade::{SettlementStatus, Trade};
