use crate::application::ports::{EligibilityVerifier, KycRegistry, KycStatus};
use crate::domain::value_objects::Address;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory participant verification registry
///
/// Addresses absent from the map report `NotSubmitted`, so a check for
/// an unknown participant never errors, it just denies.
pub struct InMemoryKycRegistry {
    statuses: Arc<DashMap<Address, KycStatus>>,
}

impl InMemoryKycRegistry {
    pub fn new() -> Self {
        Self {
            statuses: Arc::new(DashMap::new()),
        }
    }
}

impl Default for InMemoryKycRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryKycRegistry {
    fn clone(&self) -> Self {
        Self {
            statuses: Arc::clone(&self.statuses),
        }
    }
}

#[async_trait]
impl EligibilityVerifier for InMemoryKycRegistry {
    async fn status(&self, participant: &Address) -> KycStatus {
        self.statuses
            .get(participant)
            .map(|s| *s.value())
            .unwrap_or_default()
    }
}

#[async_trait]
impl KycRegistry for InMemoryKycRegistry {
    async fn set_status(&self, participant: Address, status: KycStatus) {
        self.statuses.insert(participant, status);
    }

    async fn all(&self) -> Vec<(Address, KycStatus)> {
        let mut participants: Vec<(Address, KycStatus)> = self
            .statuses
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect();

        participants.sort_by(|a, b| a.0.cmp(&b.0));
        participants
    }
}
