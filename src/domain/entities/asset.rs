use crate::domain::value_objects::{Address, AssetId, Quantity, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Token divisibility when the listing does not specify one (ERC-20
/// convention).
pub const DEFAULT_DECIMALS: u32 = 18;

/// A tokenized property listed on the marketplace. The full supply is
/// minted to the issuer at listing time; secondary-market trades move
/// tokens between holders but never change `total_tokens`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    pub total_tokens: Quantity,
    /// Maximum fractional digits a token quantity may carry.
    pub decimals: u32,
    pub issuer: Address,
    pub listed_at: Timestamp,
}

impl Asset {
    pub fn new(
        id: AssetId,
        name: impl Into<String>,
        total_tokens: Quantity,
        issuer: Address,
    ) -> Self {
        Asset {
            id,
            name: name.into(),
            total_tokens,
            decimals: DEFAULT_DECIMALS,
            issuer,
            listed_at: Utc::now(),
        }
    }

    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn with_listed_at(mut self, listed_at: Timestamp) -> Self {
        self.listed_at = listed_at;
        self
    }
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Asset {}
