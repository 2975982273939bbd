use crate::application::ports::{DistributionReader, DistributionWriter, EventPublisher};
use crate::domain::events::DividendClaimedEvent;
use crate::domain::value_objects::Address;
use crate::domain::entities::DistributionId;
use crate::domain::{ClaimEntry, Clock, MarketEvent, MarketResult, StateError, ValidationError};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ClaimDividendCommand {
    pub distribution_id: String,
    pub holder: String,
}

/// Pays out one holder's claim entry, exactly once.
///
/// The check-and-set lives in the repository so two simultaneous claims
/// for the same entry cannot both succeed. Eligibility was fixed at
/// snapshot time: no entry means the holder held nothing then.
pub struct ClaimDividendUseCase<C, D, E>
where
    C: Clock,
    D: DistributionReader + DistributionWriter,
    E: EventPublisher,
{
    clock: Arc<C>,
    distribution_repo: Arc<D>,
    event_publisher: Arc<E>,
}

impl<C, D, E> ClaimDividendUseCase<C, D, E>
where
    C: Clock,
    D: DistributionReader + DistributionWriter,
    E: EventPublisher,
{
    pub fn new(clock: Arc<C>, distribution_repo: Arc<D>, event_publisher: Arc<E>) -> Self {
        Self {
            clock,
            distribution_repo,
            event_publisher,
        }
    }

    pub async fn execute(&self, command: ClaimDividendCommand) -> MarketResult<ClaimEntry> {
        let distribution_id = DistributionId::parse(&command.distribution_id)
            .map_err(|_| ValidationError::InvalidField("distributionId must be a UUID".to_string()))?;
        let holder = Address::new(&command.holder)
            .map_err(|e| ValidationError::InvalidField(e.to_string()))?;

        let distribution = self
            .distribution_repo
            .get(&distribution_id)
            .await
            .ok_or(StateError::DistributionNotFound(distribution_id))?;

        let entry = self
            .distribution_repo
            .claim(&distribution_id, &holder, self.clock.now())
            .await?;

        self.event_publisher
            .publish(MarketEvent::DividendClaimed(DividendClaimedEvent {
                distribution_id,
                asset: distribution.asset.clone(),
                holder: entry.holder.clone(),
                amount: entry.amount,
                timestamp: entry.claimed_at.unwrap_or(distribution.created_at),
            }))
            .await;

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::AssetId;
    use crate::domain::{ClaimStatus, DividendDistribution, EligibilityError, MarketError, Quantity};
    use crate::infrastructure::{
        BroadcastEventPublisher, InMemoryDistributionRepository, SystemClock,
    };
    use chrono::Utc;
    use rust_decimal_macros::dec;

    const ALICE: &str = "0xa000000000000000000000000000000000000001";
    const BOB: &str = "0xb000000000000000000000000000000000000002";

    async fn setup() -> (Arc<InMemoryDistributionRepository>, DividendDistribution) {
        let repo = Arc::new(InMemoryDistributionRepository::new());
        let distribution = DividendDistribution::new(
            AssetId::new("BRK-TOWER-A").unwrap(),
            dec!(1000),
            Quantity::from(dec!(1000)),
            Utc::now(),
        )
        .unwrap();
        repo.save(distribution.clone()).await;
        repo.save_claims(vec![ClaimEntry::new(
            distribution.id,
            Address::new(ALICE).unwrap(),
            Quantity::from(dec!(400)),
            dec!(400),
        )])
        .await;
        (repo, distribution)
    }

    fn use_case(
        repo: &Arc<InMemoryDistributionRepository>,
    ) -> ClaimDividendUseCase<SystemClock, InMemoryDistributionRepository, BroadcastEventPublisher>
    {
        ClaimDividendUseCase::new(
            Arc::new(SystemClock),
            Arc::clone(repo),
            Arc::new(BroadcastEventPublisher::new(128)),
        )
    }

    #[tokio::test]
    async fn test_claim_pays_once() {
        let (repo, distribution) = setup().await;
        let uc = use_case(&repo);

        let entry = uc
            .execute(ClaimDividendCommand {
                distribution_id: distribution.id.to_string(),
                holder: ALICE.to_string(),
            })
            .await
            .unwrap();

        assert_eq!(entry.status, ClaimStatus::Claimed);
        assert_eq!(entry.amount, dec!(400));
        assert!(entry.claimed_at.is_some());
    }

    #[tokio::test]
    async fn test_second_claim_rejected() {
        let (repo, distribution) = setup().await;
        let uc = use_case(&repo);
        let command = ClaimDividendCommand {
            distribution_id: distribution.id.to_string(),
            holder: ALICE.to_string(),
        };

        uc.execute(command.clone()).await.unwrap();
        let err = uc.execute(command).await.unwrap_err();

        assert!(matches!(
            err,
            MarketError::State(StateError::AlreadyClaimed(_))
        ));
    }

    #[tokio::test]
    async fn test_holder_without_entry_rejected() {
        let (repo, distribution) = setup().await;
        let err = use_case(&repo)
            .execute(ClaimDividendCommand {
                distribution_id: distribution.id.to_string(),
                holder: BOB.to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MarketError::Eligibility(EligibilityError::NotEligible(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_distribution_rejected() {
        let (repo, _) = setup().await;
        let err = use_case(&repo)
            .execute(ClaimDividendCommand {
                distribution_id: DistributionId::new().to_string(),
                holder: ALICE.to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MarketError::State(StateError::DistributionNotFound(_))
        ));
    }
}
