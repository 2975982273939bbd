use crate::domain::entities::{Order, Trade};
use crate::domain::errors::InvariantViolation;
use crate::domain::value_objects::{Price, Quantity, Side, Timestamp};
use std::collections::VecDeque;

/// Result of a matching operation
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// Trades generated from the match
    pub trades: Vec<Trade>,
    /// Remaining quantity of the aggressor order (if any)
    pub remaining_qty: Quantity,
    /// Resting orders that filled completely and left the level. Callers
    /// keep them for audit and for settlement-failure reversal.
    pub filled_orders: Vec<Order>,
}

impl MatchResult {
    pub fn empty() -> Self {
        MatchResult {
            trades: Vec::new(),
            remaining_qty: Quantity::ZERO,
            filled_orders: Vec::new(),
        }
    }
}

/// Trait for order matching algorithms.
///
/// The marketplace runs price-time priority; the trait keeps the book
/// independent of the fill-allocation rule.
pub trait MatchingAlgorithm: Send + Sync {
    /// Algorithm name
    fn name(&self) -> &str;

    /// Match an incoming order against resting orders at a price level.
    ///
    /// `resting_orders` arrive in admission order (ascending sequence).
    /// Fails only on an over-fill, which indicates a bug rather than a
    /// rejectable request.
    fn match_at_level(
        &self,
        aggressor: &mut Order,
        resting_orders: &mut VecDeque<Order>,
        match_price: Price,
        timestamp: Timestamp,
    ) -> Result<MatchResult, InvariantViolation>;

    /// Execution price when aggressor meets resting order.
    ///
    /// Default: the resting (passive) order's price. The aggressor
    /// crossed the spread, so the earlier-quoted price stands.
    fn determine_price(&self, _aggressor: &Order, resting: &Order) -> Price {
        resting.price
    }
}

/// Price-Time Priority (FIFO) matching.
///
/// At each price level, orders are filled strictly in admission order.
#[derive(Debug, Default)]
pub struct PriceTimeMatcher;

impl PriceTimeMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl MatchingAlgorithm for PriceTimeMatcher {
    fn name(&self) -> &str {
        "Price-Time (FIFO)"
    }

    fn match_at_level(
        &self,
        aggressor: &mut Order,
        resting_orders: &mut VecDeque<Order>,
        match_price: Price,
        timestamp: Timestamp,
    ) -> Result<MatchResult, InvariantViolation> {
        let mut trades = Vec::new();
        let mut filled_orders = Vec::new();

        while aggressor.remaining_quantity() > Quantity::ZERO {
            let Some(resting) = resting_orders.front_mut() else {
                break;
            };

            let fill_qty = aggressor
                .remaining_quantity()
                .min(resting.remaining_quantity());

            if fill_qty.is_zero() {
                break;
            }

            let (buy_order_id, sell_order_id, buyer, seller) = match aggressor.side {
                Side::Buy => (
                    aggressor.id,
                    resting.id,
                    aggressor.owner.clone(),
                    resting.owner.clone(),
                ),
                Side::Sell => (
                    resting.id,
                    aggressor.id,
                    resting.owner.clone(),
                    aggressor.owner.clone(),
                ),
            };

            let trade = Trade::new(
                aggressor.asset.clone(),
                match_price,
                fill_qty,
                buy_order_id,
                sell_order_id,
                buyer,
                seller,
                aggressor.side,
            )
            .with_timestamp(timestamp);

            aggressor.fill(fill_qty, timestamp)?;
            resting.fill(fill_qty, timestamp)?;

            trades.push(trade);

            if resting.is_filled() {
                if let Some(closed) = resting_orders.pop_front() {
                    filled_orders.push(closed);
                }
            }
        }

        Ok(MatchResult {
            trades,
            remaining_qty: aggressor.remaining_quantity(),
            filled_orders,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Address, AssetId};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn make_order(owner: &str, side: Side, qty: Quantity, price: Price) -> Order {
        Order::new(
            AssetId::new("BRK-TOWER-A").unwrap(),
            Address::new(owner).unwrap(),
            side,
            qty,
            price,
        )
    }

    const ALICE: &str = "0xa000000000000000000000000000000000000001";
    const BOB: &str = "0xb000000000000000000000000000000000000002";
    const CAROL: &str = "0xc000000000000000000000000000000000000003";

    #[test]
    fn test_fifo_fills_in_admission_order() {
        let matcher = PriceTimeMatcher::new();
        let now = Utc::now();
        let price = Price::new(dec!(1.05)).unwrap();

        let mut resting = VecDeque::new();
        resting.push_back(make_order(
            ALICE,
            Side::Sell,
            Quantity::new(dec!(5)).unwrap(),
            price,
        ));
        resting.push_back(make_order(
            BOB,
            Side::Sell,
            Quantity::new(dec!(10)).unwrap(),
            price,
        ));

        let mut aggressor = make_order(CAROL, Side::Buy, Quantity::new(dec!(8)).unwrap(), price);

        let result = matcher
            .match_at_level(&mut aggressor, &mut resting, price, now)
            .unwrap();

        // First order (5) fills completely, then 3 from the second.
        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.trades[0].quantity, Quantity::new(dec!(5)).unwrap());
        assert_eq!(result.trades[1].quantity, Quantity::new(dec!(3)).unwrap());
        assert_eq!(result.remaining_qty, Quantity::ZERO);
        assert_eq!(result.filled_orders.len(), 1);
        assert_eq!(result.filled_orders[0].owner, Address::new(ALICE).unwrap());
    }

    #[test]
    fn test_trades_carry_both_parties() {
        let matcher = PriceTimeMatcher::new();
        let now = Utc::now();
        let price = Price::new(dec!(2.00)).unwrap();

        let mut resting = VecDeque::new();
        resting.push_back(make_order(
            ALICE,
            Side::Buy,
            Quantity::new(dec!(4)).unwrap(),
            price,
        ));

        // Sell aggressor hits the resting bid.
        let mut aggressor = make_order(BOB, Side::Sell, Quantity::new(dec!(4)).unwrap(), price);

        let result = matcher
            .match_at_level(&mut aggressor, &mut resting, price, now)
            .unwrap();

        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.buyer, Address::new(ALICE).unwrap());
        assert_eq!(trade.seller, Address::new(BOB).unwrap());
        assert_eq!(trade.taker_side, Side::Sell);
        assert!(trade.buyer_is_maker());
    }

    #[test]
    fn test_resting_price_is_execution_price() {
        let matcher = PriceTimeMatcher::new();
        let resting = make_order(
            ALICE,
            Side::Sell,
            Quantity::new(dec!(1)).unwrap(),
            Price::new(dec!(1.00)).unwrap(),
        );
        let aggressor = make_order(
            BOB,
            Side::Buy,
            Quantity::new(dec!(1)).unwrap(),
            Price::new(dec!(1.03)).unwrap(),
        );

        assert_eq!(
            matcher.determine_price(&aggressor, &resting),
            Price::new(dec!(1.00)).unwrap()
        );
    }
}
