//! Port for handing freshly executed trades to the settlement worker.

use crate::domain::value_objects::TradeId;

/// Fire-and-forget queue between matching and settlement. Enqueueing
/// never blocks: order submission must not wait on ledger I/O.
pub trait SettlementQueue: Send + Sync {
    fn enqueue(&self, trade_id: TradeId);
}
