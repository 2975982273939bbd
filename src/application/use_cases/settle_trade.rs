//! Trade settlement coordination.
//!
//! Drives one pending trade through the external ledger: transfer with
//! bounded retries, then either confirm holdings or fail the trade and
//! reverse its fills on the book. Called by the settlement worker, never
//! from the order submission path.

use crate::application::ports::{
    EventPublisher, HoldingsWriter, MarketEngine, SettlementLedger, TradeReader, TradeWriter,
    TransferInstruction,
};
use crate::domain::events::{TradeFailedEvent, TradeSettledEvent};
use crate::domain::{
    Clock, MarketEvent, MarketResult, SettlementError, StateError, Trade, TradeId,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Retry policy for ledger transfers.
///
/// Transient errors (timeouts, network) are retried with exponential
/// backoff up to `max_attempts`; permanent rejections fail immediately.
#[derive(Debug, Clone)]
pub struct SettlementPolicy {
    pub max_attempts: u32,
    pub attempt_timeout_ms: u64,
    pub initial_backoff_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout_ms: 1_000,
            initial_backoff_ms: 100,
            backoff_multiplier: 2.0,
        }
    }
}

/// Result of settling one trade.
#[derive(Debug, Clone)]
pub struct SettleTradeResult {
    pub trade: Trade,
    /// True when fills were restored to the book after a failure.
    pub reversed: bool,
}

pub struct SettleTradeUseCase<C, M, T, H, L, E>
where
    C: Clock,
    M: MarketEngine,
    T: TradeReader + TradeWriter,
    H: HoldingsWriter,
    L: SettlementLedger,
    E: EventPublisher,
{
    clock: Arc<C>,
    engine: Arc<M>,
    trade_repo: Arc<T>,
    holdings: Arc<H>,
    ledger: Arc<L>,
    event_publisher: Arc<E>,
    policy: SettlementPolicy,
}

impl<C, M, T, H, L, E> SettleTradeUseCase<C, M, T, H, L, E>
where
    C: Clock,
    M: MarketEngine,
    T: TradeReader + TradeWriter,
    H: HoldingsWriter,
    L: SettlementLedger,
    E: EventPublisher,
{
    pub fn new(
        clock: Arc<C>,
        engine: Arc<M>,
        trade_repo: Arc<T>,
        holdings: Arc<H>,
        ledger: Arc<L>,
        event_publisher: Arc<E>,
        policy: SettlementPolicy,
    ) -> Self {
        Self {
            clock,
            engine,
            trade_repo,
            holdings,
            ledger,
            event_publisher,
            policy,
        }
    }

    /// Settle one trade end to end.
    ///
    /// Idempotent: a trade that is already terminal is returned as-is, so
    /// duplicate queue entries and repeated failure notifications are
    /// harmless.
    pub async fn execute(&self, trade_id: TradeId) -> MarketResult<SettleTradeResult> {
        let mut trade = self
            .trade_repo
            .get(&trade_id)
            .await
            .ok_or(StateError::TradeNotFound(trade_id))?;

        if !trade.is_pending() {
            return Ok(SettleTradeResult {
                trade,
                reversed: false,
            });
        }

        let instruction = TransferInstruction {
            trade_id: trade.id,
            asset: trade.asset.clone(),
            from: trade.seller.clone(),
            to: trade.buyer.clone(),
            quantity: trade.quantity,
        };

        let attempt_timeout = Duration::from_millis(self.policy.attempt_timeout_ms);
        let mut backoff = Duration::from_millis(self.policy.initial_backoff_ms);
        let mut last_error = SettlementError::Timeout;

        for attempt in 1..=self.policy.max_attempts.max(1) {
            trade.record_attempt();

            let outcome = match timeout(attempt_timeout, self.ledger.transfer(&instruction)).await {
                Ok(result) => result,
                Err(_) => Err(SettlementError::Timeout),
            };

            match outcome {
                Ok(tx_hash) => return self.confirm(trade, tx_hash).await,
                Err(e) if e.is_transient() && attempt < self.policy.max_attempts => {
                    tracing::warn!(
                        trade_id = %trade.id,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "Settlement attempt failed, retrying"
                    );
                    last_error = e;
                    sleep(backoff).await;
                    backoff = backoff.mul_f64(self.policy.backoff_multiplier);
                }
                Err(e) => {
                    last_error = e;
                    break;
                }
            }
        }

        self.fail_and_reverse(trade, last_error).await
    }

    /// Re-drive every trade still pending. The worker runs this once at
    /// startup to sweep any backlog; settled trades are skipped by the
    /// terminal check in [`execute`](Self::execute).
    pub async fn process_pending(&self) -> Vec<MarketResult<SettleTradeResult>> {
        let pending = self.trade_repo.get_pending().await;
        let mut results = Vec::with_capacity(pending.len());
        for trade in pending {
            results.push(self.execute(trade.id).await);
        }
        results
    }

    async fn confirm(&self, mut trade: Trade, tx_hash: String) -> MarketResult<SettleTradeResult> {
        // Holdings move first: the ledger has already executed, so the
        // mirror must follow before the trade is marked terminal.
        self.holdings
            .apply_transfer(&trade.asset, &trade.seller, &trade.buyer, trade.quantity)
            .await?;

        trade.confirm(tx_hash, self.clock.now())?;
        self.trade_repo.save(trade.clone()).await;

        self.event_publisher
            .publish(MarketEvent::TradeSettled(TradeSettledEvent::from(&trade)))
            .await;

        Ok(SettleTradeResult {
            trade,
            reversed: false,
        })
    }

    async fn fail_and_reverse(
        &self,
        mut trade: Trade,
        error: SettlementError,
    ) -> MarketResult<SettleTradeResult> {
        // The trade goes terminal before the book is touched, so a
        // duplicate notification can never reverse twice.
        trade.fail(error.to_string(), self.clock.now())?;
        self.trade_repo.save(trade.clone()).await;

        let reversed = self.engine.reverse_trade(&trade).await.is_ok();

        self.event_publisher
            .publish(MarketEvent::TradeFailed(TradeFailedEvent::new(
                &trade, reversed,
            )))
            .await;

        Ok(SettleTradeResult { trade, reversed })
    }
}
