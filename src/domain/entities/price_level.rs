use crate::domain::value_objects::{Price, Quantity};
use serde::Serialize;

/// Aggregate open quantity at one price, one row of the depth view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceLevel {
    pub price: Price,
    pub quantity: Quantity,
}

impl PriceLevel {
    pub fn new(price: Price, quantity: Quantity) -> Self {
        PriceLevel { price, quantity }
    }
}
