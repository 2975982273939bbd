//! Ports for participant verification.
//!
//! Order submission only needs to ask "is this address verified";
//! registry management is a separate trait for the admin surface.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Address;

/// Verification state of a marketplace participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycStatus {
    /// Never submitted documents
    #[default]
    NotSubmitted,
    /// Submitted, under review
    Pending,
    /// Cleared to trade and claim
    Verified,
}

impl KycStatus {
    pub fn is_verified(&self) -> bool {
        matches!(self, KycStatus::Verified)
    }
}

impl std::fmt::Display for KycStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KycStatus::NotSubmitted => write!(f, "NOT_SUBMITTED"),
            KycStatus::Pending => write!(f, "PENDING"),
            KycStatus::Verified => write!(f, "VERIFIED"),
        }
    }
}

/// Read-side check used on every order submission.
#[async_trait]
pub trait EligibilityVerifier: Send + Sync {
    /// Current status; `NotSubmitted` for unknown addresses.
    async fn status(&self, participant: &Address) -> KycStatus;

    async fn is_verified(&self, participant: &Address) -> bool {
        self.status(participant).await.is_verified()
    }
}

/// Registry management, exposed to the admin surface only.
#[async_trait]
pub trait KycRegistry: Send + Sync {
    /// Set a participant's status, creating the record if absent.
    async fn set_status(&self, participant: Address, status: KycStatus);

    /// All known participants with their statuses.
    async fn all(&self) -> Vec<(Address, KycStatus)>;
}
