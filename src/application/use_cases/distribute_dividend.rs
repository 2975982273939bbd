use crate::application::ports::{
    AssetReader, DistributionReader, DistributionWriter, EventPublisher, HoldingsReader,
};
use crate::domain::events::DividendDistributedEvent;
use crate::domain::value_objects::AssetId;
use crate::domain::{
    Clock, ClaimEntry, DividendDistribution, MarketEvent, MarketResult, Quantity, ValidationError,
};
use rust_decimal::Decimal;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct DistributeDividendCommand {
    pub asset: String,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct DistributeDividendResult {
    pub distribution: DividendDistribution,
    pub holder_count: usize,
}

/// Creates a dividend distribution from a snapshot of confirmed holdings.
///
/// The snapshot is taken at execution time: every holder with a positive
/// confirmed balance gets one claim entry, and the per-token rate is fixed
/// against the snapshot total. Later transfers do not change entitlements.
pub struct DistributeDividendUseCase<C, A, H, D, E>
where
    C: Clock,
    A: AssetReader,
    H: HoldingsReader,
    D: DistributionReader + DistributionWriter,
    E: EventPublisher,
{
    clock: Arc<C>,
    asset_repo: Arc<A>,
    holdings: Arc<H>,
    distribution_repo: Arc<D>,
    event_publisher: Arc<E>,
}

impl<C, A, H, D, E> DistributeDividendUseCase<C, A, H, D, E>
where
    C: Clock,
    A: AssetReader,
    H: HoldingsReader,
    D: DistributionReader + DistributionWriter,
    E: EventPublisher,
{
    pub fn new(
        clock: Arc<C>,
        asset_repo: Arc<A>,
        holdings: Arc<H>,
        distribution_repo: Arc<D>,
        event_publisher: Arc<E>,
    ) -> Self {
        Self {
            clock,
            asset_repo,
            holdings,
            distribution_repo,
            event_publisher,
        }
    }

    pub async fn execute(
        &self,
        command: DistributeDividendCommand,
    ) -> MarketResult<DistributeDividendResult> {
        let asset_id = AssetId::new(&command.asset)
            .map_err(|e| ValidationError::InvalidField(e.to_string()))?;

        if !self.asset_repo.exists(&asset_id).await {
            return Err(ValidationError::UnknownAsset(asset_id).into());
        }

        let snapshot_time = self.clock.now();
        let holders = self.holdings.holders_of(&asset_id).await;
        let total_tokens: Quantity = holders.iter().map(|(_, balance)| *balance).sum();

        let distribution = DividendDistribution::new(
            asset_id,
            command.total_amount,
            total_tokens,
            snapshot_time,
        )
        .map_err(|e| ValidationError::InvalidField(e.to_string()))?;

        let entries: Vec<ClaimEntry> = holders
            .into_iter()
            .map(|(holder, balance)| {
                let amount = distribution.payout_for(balance);
                ClaimEntry::new(distribution.id, holder, balance, amount)
            })
            .collect();
        let holder_count = entries.len();

        self.distribution_repo.save(distribution.clone()).await;
        self.distribution_repo.save_claims(entries).await;

        self.event_publisher
            .publish(MarketEvent::DividendDistributed(DividendDistributedEvent {
                distribution_id: distribution.id,
                asset: distribution.asset.clone(),
                total_amount: distribution.total_amount,
                per_token_amount: distribution.per_token_amount,
                holder_count,
                timestamp: snapshot_time,
            }))
            .await;

        Ok(DistributeDividendResult {
            distribution,
            holder_count,
        })
    }
}
