use crate::application::ports::{AssetReader, AssetWriter, HoldingsWriter};
use crate::domain::entities::Asset;
use crate::domain::value_objects::{Address, AssetId};
use crate::domain::{Clock, MarketResult, Quantity, ValidationError};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ListAssetCommand {
    pub asset_id: String,
    pub name: String,
    pub total_tokens: Quantity,
    pub decimals: u32,
    pub issuer: String,
}

/// Lists a new tokenized asset and credits its full supply to the issuer.
///
/// Issuance is the only way tokens enter circulation; every later balance
/// change goes through settled trades.
pub struct ListAssetUseCase<C, A, H>
where
    C: Clock,
    A: AssetReader + AssetWriter,
    H: HoldingsWriter,
{
    clock: Arc<C>,
    asset_repo: Arc<A>,
    holdings: Arc<H>,
}

impl<C, A, H> ListAssetUseCase<C, A, H>
where
    C: Clock,
    A: AssetReader + AssetWriter,
    H: HoldingsWriter,
{
    pub fn new(clock: Arc<C>, asset_repo: Arc<A>, holdings: Arc<H>) -> Self {
        Self {
            clock,
            asset_repo,
            holdings,
        }
    }

    pub async fn execute(&self, command: ListAssetCommand) -> MarketResult<Asset> {
        let asset_id = AssetId::new(&command.asset_id)
            .map_err(|e| ValidationError::InvalidField(e.to_string()))?;
        let issuer = Address::new(&command.issuer)
            .map_err(|e| ValidationError::InvalidField(e.to_string()))?;

        if command.name.trim().is_empty() {
            return Err(ValidationError::InvalidField("Asset name cannot be empty".to_string()).into());
        }
        if !command.total_tokens.is_positive() {
            return Err(ValidationError::NonPositiveQuantity.into());
        }
        if self.asset_repo.exists(&asset_id).await {
            return Err(ValidationError::InvalidField(format!(
                "Asset {} is already listed",
                asset_id
            ))
            .into());
        }

        let asset = Asset::new(asset_id, &command.name, command.total_tokens, issuer)
            .with_decimals(command.decimals)
            .with_listed_at(self.clock.now());

        self.asset_repo.save(asset.clone()).await;
        self.holdings
            .credit(&asset.id, &asset.issuer, asset.total_tokens)
            .await;

        Ok(asset)
    }
}
