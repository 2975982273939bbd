use crate::domain::MarketEvent;
use async_trait::async_trait;

/// Publisher for marketplace events
///
/// Events are published to subscribers (streams, logs, test probes).
/// This decouples the engine from the delivery mechanism.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event to all subscribers
    async fn publish(&self, event: MarketEvent);
}

/// Non-async event emission for synchronous contexts, in particular
/// the shard threads, which cannot await.
pub trait SyncEventSink: Send + Sync {
    fn send(&self, event: MarketEvent);
}
