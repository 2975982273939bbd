use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{Price, Quantity};

/// Validates order parameters before anything touches book state.
///
/// Only shape checks live here; eligibility and asset existence are
/// checked by the submit use case, which has the ports for them.
pub struct OrderValidator;

impl OrderValidator {
    /// Validate price and quantity before an order is even constructed.
    pub fn validate_terms(price: Price, quantity: Quantity) -> Result<(), ValidationError> {
        if !quantity.is_positive() {
            return Err(ValidationError::NonPositiveQuantity);
        }
        if !price.is_positive() {
            return Err(ValidationError::NonPositivePrice);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_valid_terms() {
        assert!(OrderValidator::validate_terms(
            Price::from(dec!(1.05)),
            Quantity::from(dec!(100))
        )
        .is_ok());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let err = OrderValidator::validate_terms(Price::from(dec!(1.05)), Quantity::ZERO)
            .unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveQuantity);
    }

    #[test]
    fn test_zero_price_rejected() {
        let err = OrderValidator::validate_terms(Price::ZERO, Quantity::from(dec!(100)))
            .unwrap_err();
        assert_eq!(err, ValidationError::NonPositivePrice);
    }
}
