//! Port for dividend distributions and their claim entries.

use async_trait::async_trait;

use crate::domain::entities::{ClaimEntry, DistributionId, DividendDistribution};
use crate::domain::errors::MarketResult;
use crate::domain::value_objects::{Address, AssetId, Timestamp};

/// Read operations for distributions
#[async_trait]
pub trait DistributionReader: Send + Sync {
    /// Get a distribution by ID
    async fn get(&self, id: &DistributionId) -> Option<DividendDistribution>;

    /// All distributions for an asset, newest first
    async fn get_by_asset(&self, asset: &AssetId) -> Vec<DividendDistribution>;

    /// All claim entries of a distribution
    async fn get_claims(&self, id: &DistributionId) -> Vec<ClaimEntry>;

    /// One holder's entry within a distribution
    async fn get_claim(&self, id: &DistributionId, holder: &Address) -> Option<ClaimEntry>;

    /// A holder's entries across all distributions
    async fn get_claims_for_holder(&self, holder: &Address) -> Vec<ClaimEntry>;
}

/// Write operations for distributions
#[async_trait]
pub trait DistributionWriter: Send + Sync {
    /// Save a distribution (immutable after creation)
    async fn save(&self, distribution: DividendDistribution);

    /// Save the snapshot's claim entries in one batch
    async fn save_claims(&self, entries: Vec<ClaimEntry>);

    /// Atomically mark an entry claimed and return its updated state.
    ///
    /// The check-and-set must hold a lock scoped to this one
    /// (distribution, holder) pair, so concurrent claims by different
    /// holders never contend and a double claim by the same holder
    /// pays out exactly once.
    async fn claim(
        &self,
        id: &DistributionId,
        holder: &Address,
        now: Timestamp,
    ) -> MarketResult<ClaimEntry>;
}

/// Combined repository trait
#[async_trait]
pub trait DistributionRepository: DistributionReader + DistributionWriter {}

// Blanket implementation
impl<T: DistributionReader + DistributionWriter> DistributionRepository for T {}
