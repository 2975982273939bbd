use crate::application::ports::{DistributionReader, DistributionWriter};
use crate::domain::entities::{ClaimEntry, DistributionId, DividendDistribution};
use crate::domain::errors::{EligibilityError, MarketResult};
use crate::domain::value_objects::{Address, AssetId, Timestamp};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory store for dividend distributions and claim entries
///
/// Claim entries are keyed by (distribution, holder). A claim mutates
/// in place under that entry's map lock, which is what makes the
/// claimed-check and the status flip one atomic step.
pub struct InMemoryDistributionRepository {
    distributions: Arc<DashMap<DistributionId, DividendDistribution>>,
    claims: Arc<DashMap<(DistributionId, Address), ClaimEntry>>,
}

impl InMemoryDistributionRepository {
    pub fn new() -> Self {
        Self {
            distributions: Arc::new(DashMap::new()),
            claims: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemoryDistributionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryDistributionRepository {
    fn clone(&self) -> Self {
        Self {
            distributions: Arc::clone(&self.distributions),
            claims: Arc::clone(&self.claims),
        }
    }
}

#[async_trait]
impl DistributionReader for InMemoryDistributionRepository {
    async fn get(&self, id: &DistributionId) -> Option<DividendDistribution> {
        self.distributions.get(id).map(|d| d.value().clone())
    }

    async fn get_by_asset(&self, asset: &AssetId) -> Vec<DividendDistribution> {
        let mut distributions: Vec<DividendDistribution> = self
            .distributions
            .iter()
            .filter(|e| &e.value().asset == asset)
            .map(|e| e.value().clone())
            .collect();

        distributions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        distributions
    }

    async fn get_claims(&self, id: &DistributionId) -> Vec<ClaimEntry> {
        let mut entries: Vec<ClaimEntry> = self
            .claims
            .iter()
            .filter(|e| &e.key().0 == id)
            .map(|e| e.value().clone())
            .collect();

        entries.sort_by(|a, b| a.holder.cmp(&b.holder));
        entries
    }

    async fn get_claim(&self, id: &DistributionId, holder: &Address) -> Option<ClaimEntry> {
        self.claims
            .get(&(*id, holder.clone()))
            .map(|e| e.value().clone())
    }

    async fn get_claims_for_holder(&self, holder: &Address) -> Vec<ClaimEntry> {
        let mut entries: Vec<ClaimEntry> = self
            .claims
            .iter()
            .filter(|e| &e.key().1 == holder)
            .map(|e| e.value().clone())
            .collect();

        entries.sort_by(|a, b| a.distribution_id.cmp(&b.distribution_id));
        entries
    }
}

#[async_trait]
impl DistributionWriter for InMemoryDistributionRepository {
    async fn save(&self, distribution: DividendDistribution) {
        self.distributions.insert(distribution.id, distribution);
    }

    async fn save_claims(&self, entries: Vec<ClaimEntry>) {
        for entry in entries {
            self.claims
                .insert((entry.distribution_id, entry.holder.clone()), entry);
        }
    }

    async fn claim(
        &self,
        id: &DistributionId,
        holder: &Address,
        now: Timestamp,
    ) -> MarketResult<ClaimEntry> {
        let mut entry = self
            .claims
            .get_mut(&(*id, holder.clone()))
            .ok_or_else(|| EligibilityError::NotEligible(holder.clone()))?;

        entry.value_mut().claim(now)?;
        Ok(entry.value().clone())
    }
}
