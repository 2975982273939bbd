use crate::application::ports::{SubmitOutcome, SyncEventSink};
use crate::domain::events::{OrderAcceptedEvent, OrderCancelledEvent, TradeExecutedEvent};
use crate::domain::value_objects::{Address, AssetId};
use crate::domain::{
    MarketError, MarketEvent, MarketResult, Order, OrderBook, OrderBookSnapshot, OrderId, Side,
    StateError, Timestamp, Trade,
};
use crossbeam_channel::{Receiver, Sender, bounded};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use super::command::{MarketCommand, ShardStats};

/// Configuration for one shard thread
#[derive(Debug, Clone)]
pub struct ShardConfig {
    pub shard_id: usize,
    /// Bound on the command queue; senders block when it fills
    pub command_buffer_size: usize,
    /// CPU core to pin the shard thread to, if any
    pub pin_to_core: Option<usize>,
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self {
            shard_id: 0,
            command_buffer_size: 10_000,
            pin_to_core: None,
        }
    }
}

// Shard state constants
const SHARD_STATE_ALIVE: u8 = 0;
const SHARD_STATE_SHUTTING_DOWN: u8 = 1;
const SHARD_STATE_DEAD: u8 = 2;

/// Cheap, cloneable handle for sending commands to a shard
#[derive(Clone)]
pub struct ShardHandle {
    pub shard_id: usize,
    sender: Sender<MarketCommand>,
    open_books: Arc<AtomicU64>,
    orders_processed: Arc<AtomicU64>,
    trades_executed: Arc<AtomicU64>,
    state: Arc<AtomicU8>,
}

impl ShardHandle {
    /// Send a command to the shard
    pub fn send(&self, cmd: MarketCommand) -> Result<(), ShardError> {
        self.sender.send(cmd).map_err(|_| ShardError::ShardShutdown)
    }

    /// Get shard statistics
    pub fn stats(&self) -> ShardStats {
        ShardStats {
            shard_id: self.shard_id,
            open_books: self.open_books.load(Ordering::Relaxed),
            orders_processed: self.orders_processed.load(Ordering::Relaxed),
            trades_executed: self.trades_executed.load(Ordering::Relaxed),
            commands_in_queue: self.sender.len(),
        }
    }

    /// Check if the shard thread is still processing commands
    pub fn is_alive(&self) -> bool {
        self.state.load(Ordering::Acquire) == SHARD_STATE_ALIVE
    }
}

/// A shard that owns and processes the books for a subset of assets.
///
/// The shard thread is the only code that touches its books, so every
/// submit, cancel, and reversal for an asset is applied one at a time
/// and reads never observe a half-applied match. Terminal orders are
/// kept out of the books but retained for lookups, late cancels, and
/// settlement-failure reversal.
pub struct MarketShard {
    config: ShardConfig,
    books: HashMap<AssetId, OrderBook>,
    terminal_orders: HashMap<OrderId, Order>,
    receiver: Receiver<MarketCommand>,
    event_sink: Arc<dyn SyncEventSink>,
    /// Global admission counter, shared across shards.
    sequence: Arc<AtomicU64>,
    open_books: Arc<AtomicU64>,
    orders_processed: Arc<AtomicU64>,
    trades_executed: Arc<AtomicU64>,
    state: Arc<AtomicU8>,
}

impl MarketShard {
    /// Start the shard thread and return a handle to it
    pub fn spawn(
        config: ShardConfig,
        event_sink: Arc<dyn SyncEventSink>,
        sequence: Arc<AtomicU64>,
    ) -> (ShardHandle, JoinHandle<()>) {
        let (sender, receiver) = bounded(config.command_buffer_size);
        let open_books = Arc::new(AtomicU64::new(0));
        let orders_processed = Arc::new(AtomicU64::new(0));
        let trades_executed = Arc::new(AtomicU64::new(0));
        let state = Arc::new(AtomicU8::new(SHARD_STATE_ALIVE));

        let handle = ShardHandle {
            shard_id: config.shard_id,
            sender,
            open_books: Arc::clone(&open_books),
            orders_processed: Arc::clone(&orders_processed),
            trades_executed: Arc::clone(&trades_executed),
            state: Arc::clone(&state),
        };

        let shard = MarketShard {
            config: config.clone(),
            books: HashMap::new(),
            terminal_orders: HashMap::new(),
            receiver,
            event_sink,
            sequence,
            open_books,
            orders_processed,
            trades_executed,
            state,
        };

        let thread_handle = thread::Builder::new()
            .name(format!("market-shard-{}", config.shard_id))
            .spawn(move || {
                shard.run();
            })
            .expect("Failed to spawn shard thread");

        (handle, thread_handle)
    }

    /// Command loop. Runs until Shutdown or channel close.
    fn run(mut self) {
        tracing::info!(shard_id = self.config.shard_id, "Shard started");

        // Optionally pin to CPU core
        #[cfg(target_os = "linux")]
        if let Some(core) = self.config.pin_to_core
            && let Err(e) = self.pin_to_core(core)
        {
            tracing::warn!(
                shard_id = self.config.shard_id,
                core = core,
                error = %e,
                "Failed to pin shard to core"
            );
        }

        loop {
            match self.receiver.recv() {
                Ok(cmd) => {
                    if !self.process_command(cmd) {
                        self.state
                            .store(SHARD_STATE_SHUTTING_DOWN, Ordering::Release);
                        break;
                    }
                }
                Err(_) => {
                    // Channel closed, shutdown
                    tracing::info!(shard_id = self.config.shard_id, "Shard channel closed");
                    self.state
                        .store(SHARD_STATE_SHUTTING_DOWN, Ordering::Release);
                    break;
                }
            }
        }

        self.state.store(SHARD_STATE_DEAD, Ordering::Release);
        tracing::info!(shard_id = self.config.shard_id, "Shard shutdown complete");
    }

    /// Dispatch one command; returns false when the shard should stop
    fn process_command(&mut self, cmd: MarketCommand) -> bool {
        match cmd {
            MarketCommand::SubmitOrder {
                order,
                timestamp,
                response,
            } => {
                let result = self.handle_submit(order, timestamp);
                let _ = response.send(result);
            }

            MarketCommand::CancelOrder {
                asset,
                order_id,
                requester,
                timestamp,
                response,
            } => {
                let result = self.handle_cancel(&asset, order_id, &requester, timestamp);
                let _ = response.send(result);
            }

            MarketCommand::GetDepth {
                asset,
                levels,
                response,
            } => {
                let result = self.handle_get_depth(&asset, levels);
                let _ = response.send(result);
            }

            MarketCommand::GetOrder {
                asset,
                order_id,
                response,
            } => {
                let result = self.handle_get_order(&asset, order_id);
                let _ = response.send(result);
            }

            MarketCommand::GetOpenOrders {
                asset,
                side,
                response,
            } => {
                let result = self.handle_open_orders(&asset, side);
                let _ = response.send(result);
            }

            MarketCommand::GetOpenOrdersForOwner {
                asset,
                owner,
                response,
            } => {
                let result = self.handle_open_orders_for_owner(&asset, &owner);
                let _ = response.send(result);
            }

            MarketCommand::ReverseTrade {
                trade,
                timestamp,
                response,
            } => {
                let result = self.handle_reverse_trade(&trade, timestamp);
                let _ = response.send(result);
            }

            MarketCommand::Shutdown => {
                return false;
            }
        }
        true
    }

    fn handle_submit(&mut self, order: Order, timestamp: Timestamp) -> MarketResult<SubmitOutcome> {
        // Admission order is fixed here, inside the shard, so two orders
        // for the same asset can never race for a sequence slot.
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let order = order.with_sequence(sequence);
        let order_id = order.id;
        let asset = order.asset.clone();

        if !self.books.contains_key(&asset) {
            self.open_books.fetch_add(1, Ordering::Relaxed);
        }
        let book = self
            .books
            .entry(asset.clone())
            .or_insert_with(|| OrderBook::new(asset));

        let outcome = match book.match_order(order, timestamp) {
            Ok(outcome) => outcome,
            Err(e) => {
                // An invariant break means corrupted book state. Record it
                // here; the oneshot receiver may already be gone.
                if let MarketError::Invariant(violation) = &e {
                    tracing::error!(
                        shard_id = self.config.shard_id,
                        order_id = %order_id,
                        error = %violation,
                        "Order book invariant violated during matching"
                    );
                }
                return Err(e);
            }
        };
        if outcome.should_rest() {
            book.add_order(outcome.order.clone());
        }

        self.orders_processed.fetch_add(1, Ordering::Relaxed);
        self.trades_executed
            .fetch_add(outcome.trades.len() as u64, Ordering::Relaxed);

        if !outcome.should_rest() {
            self.terminal_orders
                .insert(outcome.order.id, outcome.order.clone());
        }
        for closed in &outcome.closed {
            self.terminal_orders.insert(closed.id, closed.clone());
        }

        self.event_sink
            .send(MarketEvent::OrderAccepted(OrderAcceptedEvent::from(
                &outcome.order,
            )));
        for trade in &outcome.trades {
            self.event_sink
                .send(MarketEvent::TradeExecuted(TradeExecutedEvent::from(trade)));
        }

        Ok(SubmitOutcome {
            order: outcome.order,
            trades: outcome.trades,
        })
    }

    fn handle_cancel(
        &mut self,
        asset: &AssetId,
        order_id: OrderId,
        requester: &Address,
        timestamp: Timestamp,
    ) -> MarketResult<Order> {
        if let Some(book) = self.books.get_mut(asset) {
            if let Some(existing) = book.get_order(order_id) {
                if &existing.owner != requester {
                    return Err(StateError::NotOwner(order_id).into());
                }
                if let Some(mut order) = book.remove_order(order_id) {
                    order.cancel(timestamp);
                    self.terminal_orders.insert(order_id, order.clone());
                    self.event_sink
                        .send(MarketEvent::OrderCancelled(OrderCancelledEvent::from(
                            &order,
                        )));
                    return Ok(order);
                }
            }
        }

        // The order is not resting. A cancel that lost the race against
        // matching reports how the order closed instead of vanishing.
        match self.terminal_orders.get(&order_id) {
            Some(order) if &order.asset == asset => {
                if &order.owner != requester {
                    Err(StateError::NotOwner(order_id).into())
                } else {
                    Err(StateError::OrderAlreadyClosed {
                        order_id,
                        status: order.status.to_string(),
                    }
                    .into())
                }
            }
            _ => Err(StateError::OrderNotFound(order_id).into()),
        }
    }

    fn handle_get_depth(&self, asset: &AssetId, levels: usize) -> OrderBookSnapshot {
        match self.books.get(asset) {
            Some(book) => book.snapshot(Some(levels)),
            None => OrderBookSnapshot {
                asset: asset.clone(),
                bids: Vec::new(),
                asks: Vec::new(),
                revision: 0,
                timestamp: chrono::Utc::now(),
            },
        }
    }

    fn handle_get_order(&self, asset: &AssetId, order_id: OrderId) -> Option<Order> {
        if let Some(book) = self.books.get(asset) {
            if let Some(order) = book.get_order(order_id) {
                return Some(order.clone());
            }
        }
        self.terminal_orders
            .get(&order_id)
            .filter(|o| &o.asset == asset)
            .cloned()
    }

    fn handle_open_orders(&self, asset: &AssetId, side: Option<Side>) -> Vec<Order> {
        let Some(book) = self.books.get(asset) else {
            return Vec::new();
        };
        match side {
            Some(side) => book.open_orders(side),
            None => {
                let mut orders = book.open_orders(Side::Buy);
                orders.extend(book.open_orders(Side::Sell));
                orders
            }
        }
    }

    fn handle_open_orders_for_owner(&self, asset: &AssetId, owner: &Address) -> Vec<Order> {
        self.books
            .get(asset)
            .map(|book| book.open_orders_for_owner(owner))
            .unwrap_or_default()
    }

    /// Restore a failed trade's fills to both of its orders.
    ///
    /// Both orders are located before either is touched, so a missing
    /// order leaves the book unchanged. Orders that reopen re-enter the
    /// book at the position their original sequence dictates; cancelled
    /// orders get their quantity back but stay out.
    fn handle_reverse_trade(
        &mut self,
        trade: &Trade,
        timestamp: Timestamp,
    ) -> MarketResult<(Order, Order)> {
        for order_id in [trade.buy_order_id, trade.sell_order_id] {
            let in_book = self
                .books
                .get(&trade.asset)
                .is_some_and(|b| b.contains(order_id));
            if !in_book && !self.terminal_orders.contains_key(&order_id) {
                return Err(StateError::OrderNotFound(order_id).into());
            }
        }

        let result = self
            .reverse_one_order(trade, trade.buy_order_id, timestamp)
            .and_then(|buy| {
                self.reverse_one_order(trade, trade.sell_order_id, timestamp)
                    .map(|sell| (buy, sell))
            });
        if let Err(MarketError::Invariant(violation)) = &result {
            tracing::error!(
                shard_id = self.config.shard_id,
                trade_id = %trade.id,
                error = %violation,
                "Trade reversal violated a fill invariant"
            );
        }
        result
    }

    fn reverse_one_order(
        &mut self,
        trade: &Trade,
        order_id: OrderId,
        timestamp: Timestamp,
    ) -> MarketResult<Order> {
        let book = self
            .books
            .entry(trade.asset.clone())
            .or_insert_with(|| OrderBook::new(trade.asset.clone()));

        if book.contains(order_id) {
            return book.reverse_fill(order_id, trade.quantity, timestamp);
        }

        let Some(mut order) = self.terminal_orders.remove(&order_id) else {
            return Err(StateError::OrderNotFound(order_id).into());
        };
        order.reverse_fill(trade.quantity, timestamp)?;

        if order.status.is_active() {
            book.reinsert_order(order.clone());
        } else {
            self.terminal_orders.insert(order_id, order.clone());
        }
        Ok(order)
    }

    #[cfg(target_os = "linux")]
    fn pin_to_core(&self, core: usize) -> Result<(), std::io::Error> {
        unsafe {
            let mut cpuset: libc::cpu_set_t = std::mem::zeroed();
            libc::CPU_ZERO(&mut cpuset);
            libc::CPU_SET(core, &mut cpuset);

            let result = libc::pthread_setaffinity_np(
                libc::pthread_self(),
                std::mem::size_of::<libc::cpu_set_t>(),
                &cpuset,
            );

            if result != 0 {
                return Err(std::io::Error::from_raw_os_error(result));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub enum ShardError {
    ShardShutdown,
    Timeout,
    ChannelFull,
}

impl std::fmt::Display for ShardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShardError::ShardShutdown => write!(f, "Shard has shutdown"),
            ShardError::Timeout => write!(f, "Operation timed out"),
            ShardError::ChannelFull => write!(f, "Command channel is full"),
        }
    }
}

impl std::error::Error for ShardError {}

impl From<ShardError> for crate::domain::MarketError {
    fn from(e: ShardError) -> Self {
        crate::domain::MarketError::EngineUnavailable(e.to_string())
    }
}
