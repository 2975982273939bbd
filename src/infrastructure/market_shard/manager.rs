use crate::application::ports::{MarketEngine, SubmitOutcome, SyncEventSink};
use crate::domain::{
    MarketResult, Order, OrderBookSnapshot, Side, StateError, Trade,
    value_objects::{Address, AssetId, OrderId},
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::thread::JoinHandle;
use tokio::sync::oneshot;

use super::command::{MarketCommand, ShardStats};
use super::shard::{MarketShard, ShardConfig, ShardError, ShardHandle};

// ============================================================================
// Sharding Strategy
// ============================================================================

/// Strategy for distributing assets across shards
pub trait ShardingStrategy: Send + Sync {
    /// Get the shard index for an asset
    fn get_shard_index(&self, asset: &str, num_shards: usize) -> usize;
}

/// Default sharding strategy using consistent hashing
pub struct ConsistentHashStrategy;

impl ShardingStrategy for ConsistentHashStrategy {
    fn get_shard_index(&self, asset: &str, num_shards: usize) -> usize {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        asset.hash(&mut hasher);
        (hasher.finish() as usize) % num_shards
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the sharded market manager
#[derive(Debug, Clone)]
pub struct ShardManagerConfig {
    /// Number of regular shards (for non-hot assets)
    pub num_shards: usize,
    /// Assets that get their own dedicated shard
    pub hot_assets: HashSet<String>,
    /// Buffer size for command channels
    pub command_buffer_size: usize,
    /// Whether to pin shards to CPU cores
    pub pin_to_cores: bool,
}

impl Default for ShardManagerConfig {
    fn default() -> Self {
        Self {
            num_shards: num_cpus::get().max(4),
            hot_assets: HashSet::new(),
            command_buffer_size: 10_000,
            pin_to_cores: false,
        }
    }
}

impl ShardManagerConfig {
    pub fn with_hot_assets(mut self, assets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.hot_assets = assets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_num_shards(mut self, n: usize) -> Self {
        self.num_shards = n;
        self
    }

    pub fn with_core_pinning(mut self, enabled: bool) -> Self {
        self.pin_to_cores = enabled;
        self
    }
}

// ============================================================================
// Sharded Market Manager
// ============================================================================

/// Routes per-asset market operations to shard threads.
///
/// An asset always maps to the same shard, so its book sees commands in
/// the order they were sent. Order sequence numbers come from a single
/// counter shared by every shard, which makes admission order total
/// across the whole market, not just within one book.
pub struct ShardedMarketManager {
    /// Regular shards for non-hot assets
    regular_shards: Vec<ShardHandle>,
    /// Dedicated shards for hot assets (asset -> shard)
    hot_asset_shards: HashMap<String, ShardHandle>,
    /// Thread handles for cleanup
    thread_handles: Vec<JoinHandle<()>>,
    /// Sharding strategy
    sharding_strategy: Arc<dyn ShardingStrategy>,
    /// Configuration (kept for introspection)
    #[allow(dead_code)]
    config: ShardManagerConfig,
}

impl ShardedMarketManager {
    /// Create and start all shards with the default sharding strategy
    pub fn new(config: ShardManagerConfig, event_sink: Arc<dyn SyncEventSink>) -> Self {
        Self::with_strategy(config, event_sink, Arc::new(ConsistentHashStrategy))
    }

    /// Create with a custom sharding strategy
    pub fn with_strategy(
        config: ShardManagerConfig,
        event_sink: Arc<dyn SyncEventSink>,
        sharding_strategy: Arc<dyn ShardingStrategy>,
    ) -> Self {
        // One admission counter for the whole market
        let sequence = Arc::new(AtomicU64::new(0));

        let mut regular_shards = Vec::with_capacity(config.num_shards);
        let mut hot_asset_shards = HashMap::new();
        let mut thread_handles = Vec::new();

        // Spawn regular shards
        for shard_id in 0..config.num_shards {
            let shard_config = ShardConfig {
                shard_id,
                command_buffer_size: config.command_buffer_size,
                pin_to_core: if config.pin_to_cores {
                    Some(shard_id % num_cpus::get())
                } else {
                    None
                },
            };

            let (handle, thread) = MarketShard::spawn(
                shard_config,
                Arc::clone(&event_sink),
                Arc::clone(&sequence),
            );
            regular_shards.push(handle);
            thread_handles.push(thread);
        }

        // Spawn dedicated shards for hot assets
        let mut hot_shard_id = config.num_shards;
        for asset in &config.hot_assets {
            let shard_config = ShardConfig {
                shard_id: hot_shard_id,
                command_buffer_size: config.command_buffer_size * 2, // Larger buffer for hot assets
                pin_to_core: if config.pin_to_cores {
                    Some(hot_shard_id % num_cpus::get())
                } else {
                    None
                },
            };

            let (handle, thread) = MarketShard::spawn(
                shard_config,
                Arc::clone(&event_sink),
                Arc::clone(&sequence),
            );
            hot_asset_shards.insert(asset.clone(), handle);
            thread_handles.push(thread);
            hot_shard_id += 1;
        }

        tracing::info!(
            regular_shards = config.num_shards,
            hot_assets = config.hot_assets.len(),
            "ShardedMarketManager started"
        );

        Self {
            regular_shards,
            hot_asset_shards,
            thread_handles,
            sharding_strategy,
            config,
        }
    }

    /// Get the shard handle for an asset
    fn get_shard(&self, asset: &str) -> &ShardHandle {
        // Hot assets have a dedicated shard
        if let Some(shard) = self.hot_asset_shards.get(asset) {
            return shard;
        }

        let shard_idx = self
            .sharding_strategy
            .get_shard_index(asset, self.regular_shards.len());
        &self.regular_shards[shard_idx]
    }

    /// Get statistics for all shards
    pub fn stats(&self) -> Vec<ShardStats> {
        let mut stats = Vec::new();

        for shard in &self.regular_shards {
            stats.push(shard.stats());
        }

        for shard in self.hot_asset_shards.values() {
            stats.push(shard.stats());
        }

        stats
    }

    /// Check if all shards are healthy
    pub fn is_healthy(&self) -> bool {
        self.regular_shards.iter().all(|s| s.is_alive())
            && self.hot_asset_shards.values().all(|s| s.is_alive())
    }

    /// Send shutdown command to all shards (helper to avoid duplication)
    fn send_shutdown_to_all_shards(&self) {
        for shard in &self.regular_shards {
            let _ = shard.send(MarketCommand::Shutdown);
        }
        for shard in self.hot_asset_shards.values() {
            let _ = shard.send(MarketCommand::Shutdown);
        }
    }

    /// Shutdown all shards gracefully
    pub fn shutdown(mut self) {
        self.send_shutdown_to_all_shards();

        // Wait for threads to finish - take ownership of handles
        let handles = std::mem::take(&mut self.thread_handles);
        for handle in handles {
            let _ = handle.join();
        }

        tracing::info!("ShardedMarketManager shutdown complete");
    }
}

impl Drop for ShardedMarketManager {
    fn drop(&mut self) {
        // Send shutdown to all shards (threads will exit when channel closes)
        self.send_shutdown_to_all_shards();
    }
}

#[async_trait]
impl MarketEngine for ShardedMarketManager {
    async fn submit(&self, order: Order) -> MarketResult<SubmitOutcome> {
        let shard = self.get_shard(order.asset.as_str());
        let timestamp = order.created_at;
        let (tx, rx) = oneshot::channel();

        shard.send(MarketCommand::SubmitOrder {
            order,
            timestamp,
            response: tx,
        })?;

        rx.await.map_err(|_| ShardError::ShardShutdown)?
    }

    async fn cancel(
        &self,
        asset: &AssetId,
        order_id: OrderId,
        requester: &Address,
    ) -> MarketResult<Order> {
        let shard = self.get_shard(asset.as_str());
        let (tx, rx) = oneshot::channel();

        shard.send(MarketCommand::CancelOrder {
            asset: asset.clone(),
            order_id,
            requester: requester.clone(),
            timestamp: chrono::Utc::now(),
            response: tx,
        })?;

        rx.await.map_err(|_| ShardError::ShardShutdown)?
    }

    async fn depth(&self, asset: &AssetId, levels: usize) -> MarketResult<OrderBookSnapshot> {
        let shard = self.get_shard(asset.as_str());
        let (tx, rx) = oneshot::channel();

        shard.send(MarketCommand::GetDepth {
            asset: asset.clone(),
            levels,
            response: tx,
        })?;

        rx.await
            .map_err(|_| ShardError::ShardShutdown.into())
    }

    async fn open_orders(&self, asset: &AssetId, side: Option<Side>) -> MarketResult<Vec<Order>> {
        let shard = self.get_shard(asset.as_str());
        let (tx, rx) = oneshot::channel();

        shard.send(MarketCommand::GetOpenOrders {
            asset: asset.clone(),
            side,
            response: tx,
        })?;

        rx.await
            .map_err(|_| ShardError::ShardShutdown.into())
    }

    async fn open_orders_for_owner(
        &self,
        asset: &AssetId,
        owner: &Address,
    ) -> MarketResult<Vec<Order>> {
        let shard = self.get_shard(asset.as_str());
        let (tx, rx) = oneshot::channel();

        shard.send(MarketCommand::GetOpenOrdersForOwner {
            asset: asset.clone(),
            owner: owner.clone(),
            response: tx,
        })?;

        rx.await
            .map_err(|_| ShardError::ShardShutdown.into())
    }

    async fn get_order(&self, asset: &AssetId, order_id: OrderId) -> MarketResult<Order> {
        let shard = self.get_shard(asset.as_str());
        let (tx, rx) = oneshot::channel();

        shard.send(MarketCommand::GetOrder {
            asset: asset.clone(),
            order_id,
            response: tx,
        })?;

        let order = rx.await.map_err(|_| ShardError::ShardShutdown)?;
        order.ok_or_else(|| StateError::OrderNotFound(order_id).into())
    }

    async fn reverse_trade(&self, trade: &Trade) -> MarketResult<(Order, Order)> {
        let shard = self.get_shard(trade.asset.as_str());
        let (tx, rx) = oneshot::channel();

        shard.send(MarketCommand::ReverseTrade {
            trade: trade.clone(),
            timestamp: chrono::Utc::now(),
            response: tx,
        })?;

        rx.await.map_err(|_| ShardError::ShardShutdown)?
    }
}
