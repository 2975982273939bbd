use crate::application::ports::{EventPublisher, SyncEventSink};
use crate::domain::MarketEvent;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Broadcast-based event publisher
///
/// Uses tokio broadcast channels to publish events to multiple
/// subscribers. Supports both global subscriptions and per-asset
/// subscriptions. Every event is routed to its asset's channel as well
/// as the global one, whichever side produced it: the shard threads
/// emit through `SyncEventSink`, settlement and dividends through
/// `EventPublisher`, and both land in the same channels.
pub struct BroadcastEventPublisher {
    /// Global broadcast channel for all events
    global_tx: broadcast::Sender<MarketEvent>,
    /// Per-asset broadcast channels
    asset_channels: Arc<DashMap<String, broadcast::Sender<MarketEvent>>>,
    /// Channel capacity
    capacity: usize,
}

impl BroadcastEventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (global_tx, _) = broadcast::channel(capacity);

        BroadcastEventPublisher {
            global_tx,
            asset_channels: Arc::new(DashMap::new()),
            capacity,
        }
    }

    /// Subscribe to all events
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.global_tx.subscribe()
    }

    /// Subscribe to events for a specific asset
    pub fn subscribe_asset(&self, asset: &str) -> broadcast::Receiver<MarketEvent> {
        let entry = self
            .asset_channels
            .entry(asset.to_string())
            .or_insert_with(|| {
                let (tx, _) = broadcast::channel(self.capacity);
                tx
            });

        entry.value().subscribe()
    }

    /// Route to the global channel and the event's asset channel.
    /// Send errors mean no subscribers and are ignored.
    fn fan_out(&self, event: MarketEvent) {
        if let Some(tx) = self.asset_channels.get(event.asset().as_str()) {
            let _ = tx.send(event.clone());
        }
        let _ = self.global_tx.send(event);
    }
}

/// SyncEventSink implementation for use in sync contexts (the shard threads)
impl SyncEventSink for BroadcastEventPublisher {
    fn send(&self, event: MarketEvent) {
        self.fan_out(event);
    }
}

impl Default for BroadcastEventPublisher {
    fn default() -> Self {
        Self::new(10000)
    }
}

impl Clone for BroadcastEventPublisher {
    fn clone(&self) -> Self {
        BroadcastEventPublisher {
            global_tx: self.global_tx.clone(),
            asset_channels: Arc::clone(&self.asset_channels),
            capacity: self.capacity,
        }
    }
}

#[async_trait]
impl EventPublisher for BroadcastEventPublisher {
    async fn publish(&self, event: MarketEvent) {
        self.fan_out(event);
    }
}
