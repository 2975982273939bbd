//! Port for the external settlement ledger.
//!
//! The ledger is the system of record for token ownership. The engine
//! matches in memory first and settles here after; a transfer that the
//! ledger refuses gets its in-memory fills reversed.

use async_trait::async_trait;

use crate::domain::errors::SettlementError;
use crate::domain::value_objects::{Address, AssetId, Quantity, TradeId};

/// One token transfer to execute on the ledger. Keyed by trade id so
/// the ledger can deduplicate a retry whose first attempt actually
/// landed (timeouts leave the outcome unobserved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferInstruction {
    pub trade_id: TradeId,
    pub asset: AssetId,
    pub from: Address,
    pub to: Address,
    pub quantity: Quantity,
}

#[async_trait]
pub trait SettlementLedger: Send + Sync {
    /// Execute the transfer, returning the ledger transaction hash.
    ///
    /// Implementations distinguish transient faults (worth retrying)
    /// from permanent rejections via [`SettlementError::is_transient`].
    async fn transfer(&self, instruction: &TransferInstruction) -> Result<String, SettlementError>;
}
