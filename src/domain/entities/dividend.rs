//! Dividend distribution and per-holder claim entries.
//!
//! A distribution is immutable once created: it snapshots holder
//! balances at a point in time and fixes the per-token amount. Claims
//! mutate only their own entry, so two holders claiming concurrently
//! never contend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::StateError;
use crate::domain::value_objects::{Address, AssetId, Quantity, Timestamp};
use chrono::Utc;

/// Unique identifier for a dividend distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DistributionId(Uuid);

impl DistributionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for DistributionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DistributionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A dividend pot for one asset, divided pro rata over the holders
/// captured in the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendDistribution {
    pub id: DistributionId,
    pub asset: AssetId,
    /// Total cash amount being distributed, in the settlement currency.
    pub total_amount: Decimal,
    /// `total_amount / total_tokens`, fixed at creation.
    pub per_token_amount: Decimal,
    /// Token supply counted at the snapshot.
    pub total_tokens: Quantity,
    pub snapshot_time: Timestamp,
    pub created_at: Timestamp,
}

impl DividendDistribution {
    pub fn new(
        asset: AssetId,
        total_amount: Decimal,
        total_tokens: Quantity,
        snapshot_time: Timestamp,
    ) -> Result<Self, &'static str> {
        if total_amount <= Decimal::ZERO {
            return Err("Distribution amount must be positive");
        }
        if total_tokens.is_zero() {
            return Err("Cannot distribute over zero tokens");
        }
        Ok(DividendDistribution {
            id: DistributionId::new(),
            asset,
            total_amount,
            per_token_amount: total_amount / total_tokens.inner(),
            total_tokens,
            snapshot_time,
            created_at: Utc::now(),
        })
    }

    /// Payout owed to a holder with the given snapshot balance.
    pub fn payout_for(&self, balance: Quantity) -> Decimal {
        self.per_token_amount * balance.inner()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    #[default]
    Unclaimed,
    Claimed,
}

/// One holder's entitlement within a distribution. Created at snapshot
/// time for every holder with a positive confirmed balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimEntry {
    pub distribution_id: DistributionId,
    pub holder: Address,
    /// Confirmed balance at the snapshot, which fixes the payout.
    pub balance: Quantity,
    pub amount: Decimal,
    pub status: ClaimStatus,
    pub claimed_at: Option<Timestamp>,
}

impl ClaimEntry {
    pub fn new(
        distribution_id: DistributionId,
        holder: Address,
        balance: Quantity,
        amount: Decimal,
    ) -> Self {
        ClaimEntry {
            distribution_id,
            holder,
            balance,
            amount,
            status: ClaimStatus::Unclaimed,
            claimed_at: None,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.status == ClaimStatus::Claimed
    }

    /// Marks the entry claimed. A second claim for the same entry is
    /// rejected so the payout happens exactly once.
    pub fn claim(&mut self, now: Timestamp) -> Result<Decimal, StateError> {
        if self.is_claimed() {
            return Err(StateError::AlreadyClaimed(self.holder.clone()));
        }
        self.status = ClaimStatus::Claimed;
        self.claimed_at = Some(now);
        Ok(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn holder() -> Address {
        Address::new("0x3000000000000000000000000000000000000003").unwrap()
    }

    #[test]
    fn test_per_token_amount() {
        let dist = DividendDistribution::new(
            AssetId::new("BRK-TOWER-A").unwrap(),
            dec!(10000),
            Quantity::new(dec!(100000)).unwrap(),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(dist.per_token_amount, dec!(0.1));
        assert_eq!(dist.payout_for(Quantity::new(dec!(250)).unwrap()), dec!(25.0));
    }

    #[test]
    fn test_rejects_zero_supply() {
        let result = DividendDistribution::new(
            AssetId::new("BRK-TOWER-A").unwrap(),
            dec!(10000),
            Quantity::ZERO,
            Utc::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let result = DividendDistribution::new(
            AssetId::new("BRK-TOWER-A").unwrap(),
            dec!(0),
            Quantity::new(dec!(1000)).unwrap(),
            Utc::now(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_claim_pays_once() {
        let mut entry = ClaimEntry::new(
            DistributionId::new(),
            holder(),
            Quantity::new(dec!(250)).unwrap(),
            dec!(25.0),
        );

        let payout = entry.claim(Utc::now()).unwrap();
        assert_eq!(payout, dec!(25.0));
        assert!(entry.is_claimed());

        let err = entry.claim(Utc::now()).unwrap_err();
        assert!(matches!(err, StateError::AlreadyClaimed(_)));
    }
}
