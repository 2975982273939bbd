mod command;
mod manager;
mod shard;

pub use command::{MarketCommand, ShardStats};
pub use manager::{
    ConsistentHashStrategy, ShardManagerConfig, ShardedMarketManager, ShardingStrategy,
};
pub use shard::{MarketShard, ShardConfig, ShardError, ShardHandle};
