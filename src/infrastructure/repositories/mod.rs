mod in_memory_asset;
mod in_memory_distribution;
mod in_memory_holdings;
mod in_memory_kyc;
mod in_memory_trade;

pub use in_memory_asset::InMemoryAssetRepository;
pub use in_memory_distribution::InMemoryDistributionRepository;
pub use in_memory_holdings::InMemoryHoldingsRepository;
pub use in_memory_kyc::InMemoryKycRegistry;
pub use in_memory_trade::InMemoryTradeRepository;
