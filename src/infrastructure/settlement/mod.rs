//! Settlement queue plumbing and the worker that drains it.
//!
//! Matching hands freshly executed trades to this queue and returns to
//! the caller immediately; the worker owns the slow path of talking to
//! the ledger. One worker per process keeps settlement serialized, so
//! two queue entries for the same trade can never race.

use crate::application::ports::{
    EventPublisher, HoldingsWriter, MarketEngine, SettlementLedger, SettlementQueue, TradeReader,
    TradeWriter,
};
use crate::application::use_cases::SettleTradeUseCase;
use crate::domain::entities::SettlementStatus;
use crate::domain::services::Clock;
use crate::domain::value_objects::TradeId;
use tokio::sync::mpsc;

/// Sending half of the settlement queue. Implements the port trait so
/// use cases can enqueue without knowing about channels.
#[derive(Clone)]
pub struct SettlementQueueSender {
    sender: mpsc::UnboundedSender<TradeId>,
}

/// Create the queue pair: the sender goes to order submission, the
/// receiver to the worker.
pub fn settlement_channel() -> (SettlementQueueSender, mpsc::UnboundedReceiver<TradeId>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (SettlementQueueSender { sender }, receiver)
}

impl SettlementQueue for SettlementQueueSender {
    fn enqueue(&self, trade_id: TradeId) {
        // A closed channel means the worker is gone, which only happens
        // during shutdown. The startup backlog scan picks the trade up
        // on the next run.
        let _ = self.sender.send(trade_id);
    }
}

/// Background task that settles trades as they arrive on the queue.
pub struct SettlementWorker<C, M, T, H, L, E>
where
    C: Clock,
    M: MarketEngine,
    T: TradeReader + TradeWriter,
    H: HoldingsWriter,
    L: SettlementLedger,
    E: EventPublisher,
{
    use_case: SettleTradeUseCase<C, M, T, H, L, E>,
    receiver: mpsc::UnboundedReceiver<TradeId>,
}

impl<C, M, T, H, L, E> SettlementWorker<C, M, T, H, L, E>
where
    C: Clock,
    M: MarketEngine,
    T: TradeReader + TradeWriter,
    H: HoldingsWriter,
    L: SettlementLedger,
    E: EventPublisher,
{
    pub fn new(
        use_case: SettleTradeUseCase<C, M, T, H, L, E>,
        receiver: mpsc::UnboundedReceiver<TradeId>,
    ) -> Self {
        Self { use_case, receiver }
    }

    /// Drain the queue until every sender is dropped.
    ///
    /// Starts with a backlog sweep: trades left pending by a previous
    /// run (or seeded pending) get settled before new arrivals.
    pub async fn run(mut self) {
        tracing::info!("Settlement worker started");

        let backlog = self.use_case.process_pending().await;
        if !backlog.is_empty() {
            tracing::info!(count = backlog.len(), "Processed settlement backlog");
        }

        while let Some(trade_id) = self.receiver.recv().await {
            match self.use_case.execute(trade_id).await {
                Ok(result) => match result.trade.settlement {
                    SettlementStatus::Confirmed => tracing::info!(
                        trade_id = %trade_id,
                        attempts = result.trade.attempts,
                        tx_hash = result.trade.tx_hash.as_deref().unwrap_or(""),
                        "Trade settled"
                    ),
                    SettlementStatus::Failed => tracing::error!(
                        trade_id = %trade_id,
                        attempts = result.trade.attempts,
                        reversed = result.reversed,
                        reason = result.trade.failure_reason.as_deref().unwrap_or(""),
                        "Trade failed settlement"
                    ),
                    SettlementStatus::Pending => {}
                },
                Err(e) => {
                    tracing::error!(trade_id = %trade_id, error = %e, "Settlement aborted")
                }
            }
        }

        tracing::info!("Settlement worker stopped");
    }
}
