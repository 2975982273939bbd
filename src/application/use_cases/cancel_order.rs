use crate::application::ports::MarketEngine;
use crate::domain::value_objects::{Address, AssetId};
use crate::domain::{MarketResult, Order, OrderId, ValidationError};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CancelOrderCommand {
    pub asset: String,
    pub order_id: String,
    pub requester: String,
}

/// Removes one of the requester's open orders from the book.
///
/// Ownership is enforced inside the shard so the check is serialized
/// with matching: a cancel racing a fill either removes the remainder
/// or reports the order already closed.
pub struct CancelOrderUseCase<M>
where
    M: MarketEngine,
{
    engine: Arc<M>,
}

impl<M> CancelOrderUseCase<M>
where
    M: MarketEngine,
{
    pub fn new(engine: Arc<M>) -> Self {
        Self { engine }
    }

    pub async fn execute(&self, command: CancelOrderCommand) -> MarketResult<Order> {
        let asset_id = AssetId::new(&command.asset)
            .map_err(|e| ValidationError::InvalidField(e.to_string()))?;
        let requester = Address::new(&command.requester)
            .map_err(|e| ValidationError::InvalidField(e.to_string()))?;
        let order_id = OrderId::parse_str(&command.order_id)
            .map_err(|_| ValidationError::InvalidField("orderId must be a UUID".to_string()))?;

        self.engine.cancel(&asset_id, order_id, &requester).await
    }
}
