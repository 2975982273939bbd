use crate::domain::entities::{Order, PriceLevel, Trade};
use crate::domain::errors::{InvariantViolation, MarketError, MarketResult, StateError};
use crate::domain::matching::{MatchResult, MatchingAlgorithm, PriceTimeMatcher};
use crate::domain::value_objects::{
    Address, AssetId, OrderId, Price, Quantity, Side, Timestamp,
};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

/// Order book for a single tokenized asset.
///
/// Holds every open order for the asset and is the sole source for the
/// depth view. All mutations go through this type, so the per-level
/// quantity caches can never drift from the resting orders.
#[derive(Clone)]
pub struct OrderBook {
    asset: AssetId,
    /// Bids sorted by price descending (highest first)
    bids: BTreeMap<PriceKey, VecDeque<Order>>,
    /// Asks sorted by price ascending (lowest first)
    asks: BTreeMap<PriceKey, VecDeque<Order>>,
    /// Quick lookup for orders by ID
    order_index: HashMap<OrderId, (Side, Price)>,
    /// Bumped on every mutation; lets read-side consumers detect staleness
    revision: u64,
    /// Total open bid quantity at each price level
    bid_quantities: IndexMap<Price, Quantity>,
    /// Total open ask quantity at each price level
    ask_quantities: IndexMap<Price, Quantity>,
    /// Matching algorithm
    matcher: Arc<dyn MatchingAlgorithm>,
}

impl std::fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBook")
            .field("asset", &self.asset)
            .field("bids_count", &self.bids.len())
            .field("asks_count", &self.asks.len())
            .field("order_count", &self.order_index.len())
            .field("revision", &self.revision)
            .field("matcher", &self.matcher.name())
            .finish()
    }
}

/// Price key for BTreeMap ordering
/// For bids: reversed comparison to sort descending
/// For asks: natural order (ascending)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PriceKey {
    price: Decimal,
    is_bid: bool,
}

impl PriceKey {
    fn bid(price: Price) -> Self {
        PriceKey {
            price: price.inner(),
            is_bid: true,
        }
    }

    fn ask(price: Price) -> Self {
        PriceKey {
            price: price.inner(),
            is_bid: false,
        }
    }
}

impl Ord for PriceKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.is_bid {
            // Bids: higher price first (reverse order)
            other.price.cmp(&self.price)
        } else {
            // Asks: lower price first (natural order)
            self.price.cmp(&other.price)
        }
    }
}

impl PartialOrd for PriceKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl OrderBook {
    /// Create a new order book with price-time priority matching
    pub fn new(asset: AssetId) -> Self {
        Self::with_matcher(asset, Arc::new(PriceTimeMatcher::new()))
    }

    /// Create a new order book with a specific matching algorithm
    pub fn with_matcher(asset: AssetId, matcher: Arc<dyn MatchingAlgorithm>) -> Self {
        OrderBook {
            asset,
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_index: HashMap::new(),
            revision: 0,
            bid_quantities: IndexMap::new(),
            ask_quantities: IndexMap::new(),
            matcher,
        }
    }

    pub fn asset(&self) -> &AssetId {
        &self.asset
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump_revision(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    /// Best bid price (highest buy order)
    pub fn best_bid(&self) -> Option<Price> {
        self.bids
            .first_key_value()
            .map(|(k, _)| Price::from(k.price))
    }

    /// Best ask price (lowest sell order)
    pub fn best_ask(&self) -> Option<Price> {
        self.asks
            .first_key_value()
            .map(|(k, _)| Price::from(k.price))
    }

    /// Spread between best ask and best bid
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask > bid => Some(ask - bid),
            _ => None,
        }
    }

    /// Add an order at the back of its price level.
    ///
    /// Admission order equals ascending sequence, so appending preserves
    /// price-time priority. An order re-entering after a settlement
    /// reversal must use [`reinsert_order`](Self::reinsert_order) instead.
    pub fn add_order(&mut self, order: Order) {
        let price = order.price;
        let side = order.side;
        let order_id = order.id;
        let remaining = order.remaining_quantity();

        match side {
            Side::Buy => {
                self.bids
                    .entry(PriceKey::bid(price))
                    .or_default()
                    .push_back(order);
                let level = self.bid_quantities.entry(price).or_insert(Quantity::ZERO);
                *level = *level + remaining;
            }
            Side::Sell => {
                self.asks
                    .entry(PriceKey::ask(price))
                    .or_default()
                    .push_back(order);
                let level = self.ask_quantities.entry(price).or_insert(Quantity::ZERO);
                *level = *level + remaining;
            }
        }

        self.order_index.insert(order_id, (side, price));
        self.bump_revision();
    }

    /// Put an order back into its price level at the position its
    /// sequence number dictates. Used when a failed settlement reopens
    /// an order that had already left the book: the order regains its
    /// original standing instead of the back of the queue.
    pub fn reinsert_order(&mut self, order: Order) {
        let price = order.price;
        let side = order.side;
        let order_id = order.id;
        let sequence = order.sequence;
        let remaining = order.remaining_quantity();

        let (queue, level) = match side {
            Side::Buy => (
                self.bids.entry(PriceKey::bid(price)).or_default(),
                self.bid_quantities.entry(price).or_insert(Quantity::ZERO),
            ),
            Side::Sell => (
                self.asks.entry(PriceKey::ask(price)).or_default(),
                self.ask_quantities.entry(price).or_insert(Quantity::ZERO),
            ),
        };

        let pos = queue
            .iter()
            .position(|o| o.sequence > sequence)
            .unwrap_or(queue.len());
        queue.insert(pos, order);
        *level = *level + remaining;

        self.order_index.insert(order_id, (side, price));
        self.bump_revision();
    }

    /// Remove an order from the book
    pub fn remove_order(&mut self, order_id: OrderId) -> Option<Order> {
        let (side, price) = self.order_index.remove(&order_id)?;

        let order = match side {
            Side::Buy => {
                let key = PriceKey::bid(price);
                let queue = self.bids.get_mut(&key)?;
                let pos = queue.iter().position(|o| o.id == order_id)?;
                let order = queue.remove(pos)?;

                if let Some(qty) = self.bid_quantities.get_mut(&price) {
                    *qty = qty.saturating_sub(order.remaining_quantity());
                    if qty.is_zero() {
                        self.bid_quantities.swap_remove(&price);
                    }
                }

                if queue.is_empty() {
                    self.bids.remove(&key);
                }
                order
            }
            Side::Sell => {
                let key = PriceKey::ask(price);
                let queue = self.asks.get_mut(&key)?;
                let pos = queue.iter().position(|o| o.id == order_id)?;
                let order = queue.remove(pos)?;

                if let Some(qty) = self.ask_quantities.get_mut(&price) {
                    *qty = qty.saturating_sub(order.remaining_quantity());
                    if qty.is_zero() {
                        self.ask_quantities.swap_remove(&price);
                    }
                }

                if queue.is_empty() {
                    self.asks.remove(&key);
                }
                order
            }
        };

        self.bump_revision();
        Some(order)
    }

    /// Get an order by ID
    pub fn get_order(&self, order_id: OrderId) -> Option<&Order> {
        let (side, price) = self.order_index.get(&order_id)?;

        match side {
            Side::Buy => {
                let key = PriceKey::bid(*price);
                self.bids.get(&key)?.iter().find(|o| o.id == order_id)
            }
            Side::Sell => {
                let key = PriceKey::ask(*price);
                self.asks.get(&key)?.iter().find(|o| o.id == order_id)
            }
        }
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.order_index.contains_key(&order_id)
    }

    /// Back out a fill on an order that is still resting, restoring the
    /// reversed quantity to its price level.
    pub fn reverse_fill(
        &mut self,
        order_id: OrderId,
        quantity: Quantity,
        now: Timestamp,
    ) -> MarketResult<Order> {
        let (side, price) = self
            .order_index
            .get(&order_id)
            .copied()
            .ok_or(StateError::OrderNotFound(order_id))?;

        let (queue, level) = match side {
            Side::Buy => (
                self.bids.get_mut(&PriceKey::bid(price)),
                self.bid_quantities.get_mut(&price),
            ),
            Side::Sell => (
                self.asks.get_mut(&PriceKey::ask(price)),
                self.ask_quantities.get_mut(&price),
            ),
        };

        let order = queue
            .and_then(|q| q.iter_mut().find(|o| o.id == order_id))
            .ok_or(MarketError::Invariant(InvariantViolation::IndexDesync(
                order_id,
            )))?;

        order.reverse_fill(quantity, now)?;
        let updated = order.clone();

        if let Some(level) = level {
            *level = *level + quantity;
        }
        self.bump_revision();
        Ok(updated)
    }

    /// True if matching `incoming` would cross one of the submitter's
    /// own resting orders. Walks the crossing levels in fill order and
    /// stops once the incoming quantity would be exhausted, so a same-
    /// owner order that could never be reached does not trigger a
    /// rejection.
    pub fn would_self_cross(&self, incoming: &Order) -> bool {
        let book_side = match incoming.side {
            Side::Buy => &self.asks,
            Side::Sell => &self.bids,
        };

        let mut unfilled = incoming.remaining_quantity();
        for (key, queue) in book_side {
            let level_price = Price::from(key.price);
            let crosses = match incoming.side {
                Side::Buy => incoming.price >= level_price,
                Side::Sell => incoming.price <= level_price,
            };
            if !crosses || unfilled.is_zero() {
                break;
            }
            for resting in queue {
                if unfilled.is_zero() {
                    return false;
                }
                if resting.owner == incoming.owner {
                    return true;
                }
                unfilled = unfilled.saturating_sub(resting.remaining_quantity());
            }
        }
        false
    }

    /// Match an incoming order against the book.
    ///
    /// Returns the aggressor's post-match state, the trades generated,
    /// and the resting orders that filled completely (the caller decides
    /// whether to rest the aggressor and keeps closed orders for audit).
    /// The submitter's own resting orders reject the whole order up
    /// front, before any fill is applied.
    pub fn match_order(&mut self, mut order: Order, now: Timestamp) -> MarketResult<MatchOutcome> {
        if self.would_self_cross(&order) {
            return Err(StateError::SelfTrade.into());
        }

        let mut trades = Vec::new();
        let mut closed = Vec::new();

        loop {
            if order.remaining_quantity().is_zero() {
                break;
            }

            let result = match order.side {
                Side::Buy => self.match_against_asks(&mut order, now)?,
                Side::Sell => self.match_against_bids(&mut order, now)?,
            };

            if result.trades.is_empty() {
                break;
            }

            trades.extend(result.trades);
            closed.extend(result.filled_orders);
        }

        if !trades.is_empty() {
            self.bump_revision();
        }

        Ok(MatchOutcome {
            order,
            trades,
            closed,
        })
    }

    fn match_against_asks(&mut self, order: &mut Order, now: Timestamp) -> MarketResult<MatchResult> {
        let Some((ask_key, _)) = self.asks.first_key_value() else {
            return Ok(MatchResult::empty());
        };
        let ask_key = *ask_key;
        let ask_price = Price::from(ask_key.price);

        if order.price < ask_price {
            return Ok(MatchResult::empty());
        }

        let Some(ask_queue) = self.asks.get_mut(&ask_key) else {
            return Ok(MatchResult::empty());
        };

        let result = self.matcher.match_at_level(order, ask_queue, ask_price, now)?;

        let filled_qty: Quantity = result.trades.iter().map(|t| t.quantity).sum();

        if let Some(qty) = self.ask_quantities.get_mut(&ask_price) {
            *qty = qty.saturating_sub(filled_qty);
            if qty.is_zero() {
                self.ask_quantities.swap_remove(&ask_price);
            }
        }

        for closed in &result.filled_orders {
            self.order_index.remove(&closed.id);
        }

        if let Some(queue) = self.asks.get(&ask_key) {
            if queue.is_empty() {
                self.asks.remove(&ask_key);
            }
        }

        Ok(result)
    }

    fn match_against_bids(&mut self, order: &mut Order, now: Timestamp) -> MarketResult<MatchResult> {
        let Some((bid_key, _)) = self.bids.first_key_value() else {
            return Ok(MatchResult::empty());
        };
        let bid_key = *bid_key;
        let bid_price = Price::from(bid_key.price);

        if order.price > bid_price {
            return Ok(MatchResult::empty());
        }

        let Some(bid_queue) = self.bids.get_mut(&bid_key) else {
            return Ok(MatchResult::empty());
        };

        let result = self.matcher.match_at_level(order, bid_queue, bid_price, now)?;

        let filled_qty: Quantity = result.trades.iter().map(|t| t.quantity).sum();

        if let Some(qty) = self.bid_quantities.get_mut(&bid_price) {
            *qty = qty.saturating_sub(filled_qty);
            if qty.is_zero() {
                self.bid_quantities.swap_remove(&bid_price);
            }
        }

        for closed in &result.filled_orders {
            self.order_index.remove(&closed.id);
        }

        if let Some(queue) = self.bids.get(&bid_key) {
            if queue.is_empty() {
                self.bids.remove(&bid_key);
            }
        }

        Ok(result)
    }

    /// Get top N bid price levels (sorted descending by price - best bid first)
    pub fn get_bids(&self, depth: usize) -> Vec<PriceLevel> {
        let mut levels: Vec<_> = self
            .bid_quantities
            .iter()
            .map(|(price, qty)| PriceLevel::new(*price, *qty))
            .collect();
        levels.sort_by(|a, b| b.price.cmp(&a.price));
        levels.truncate(depth);
        levels
    }

    /// Get top N ask price levels (sorted ascending by price - best ask first)
    pub fn get_asks(&self, depth: usize) -> Vec<PriceLevel> {
        let mut levels: Vec<_> = self
            .ask_quantities
            .iter()
            .map(|(price, qty)| PriceLevel::new(*price, *qty))
            .collect();
        levels.sort_by(|a, b| a.price.cmp(&b.price));
        levels.truncate(depth);
        levels
    }

    /// Get full depth snapshot
    pub fn snapshot(&self, depth: Option<usize>) -> OrderBookSnapshot {
        let depth = depth.unwrap_or(usize::MAX);
        OrderBookSnapshot {
            asset: self.asset.clone(),
            bids: self.get_bids(depth),
            asks: self.get_asks(depth),
            revision: self.revision,
            timestamp: chrono::Utc::now(),
        }
    }

    /// All open orders on one side, in price-time priority order:
    /// bids by price descending, asks ascending, ties by sequence.
    pub fn open_orders(&self, side: Side) -> Vec<Order> {
        let book_side = match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        };
        book_side.values().flat_map(|q| q.iter().cloned()).collect()
    }

    /// A participant's open orders across both sides, buys first.
    pub fn open_orders_for_owner(&self, owner: &Address) -> Vec<Order> {
        self.open_orders(Side::Buy)
            .into_iter()
            .chain(self.open_orders(Side::Sell))
            .filter(|o| &o.owner == owner)
            .collect()
    }

    /// Number of orders in the book
    pub fn order_count(&self) -> usize {
        self.order_index.len()
    }

    /// Check if book is empty
    pub fn is_empty(&self) -> bool {
        self.order_index.is_empty()
    }
}

/// Immutable snapshot of order book state
#[derive(Debug, Clone, Serialize)]
pub struct OrderBookSnapshot {
    pub asset: AssetId,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
    pub revision: u64,
    pub timestamp: Timestamp,
}

/// Result of matching one incoming order.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// The aggressor after matching, with fills and status applied. Not
    /// yet resting; the caller adds it back if it stayed active with
    /// open quantity.
    pub order: Order,
    pub trades: Vec<Trade>,
    /// Resting orders that filled completely and left the book.
    pub closed: Vec<Order>,
}

impl MatchOutcome {
    /// Whether the aggressor should rest on the book.
    pub fn should_rest(&self) -> bool {
        self.order.status.is_active() && !self.order.remaining_quantity().is_zero()
    }
}
