use crate::application::ports::{DistributionReader, HoldingsReader, TradeReader};
use crate::domain::value_objects::Address;
use crate::domain::{ClaimEntry, MarketResult, Trade, ValidationError};
use serde::Serialize;
use std::sync::Arc;

/// One asset position held by a participant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingView {
    pub asset_id: String,
    pub balance: String,
}

/// Participant-facing reads: confirmed holdings, trade history, and
/// dividend claims.
pub struct GetPortfolioUseCase<H, T, D>
where
    H: HoldingsReader,
    T: TradeReader,
    D: DistributionReader,
{
    holdings: Arc<H>,
    trade_repo: Arc<T>,
    distribution_repo: Arc<D>,
}

impl<H, T, D> GetPortfolioUseCase<H, T, D>
where
    H: HoldingsReader,
    T: TradeReader,
    D: DistributionReader,
{
    pub fn new(holdings: Arc<H>, trade_repo: Arc<T>, distribution_repo: Arc<D>) -> Self {
        Self {
            holdings,
            trade_repo,
            distribution_repo,
        }
    }

    /// Confirmed balances across every asset, zero balances omitted.
    pub async fn holdings(&self, address: &str) -> MarketResult<Vec<HoldingView>> {
        let address = Self::parse_address(address)?;
        let mut views: Vec<HoldingView> = self
            .holdings
            .holdings_of(&address)
            .await
            .into_iter()
            .filter(|(_, balance)| balance.is_positive())
            .map(|(asset, balance)| HoldingView {
                asset_id: asset.to_string(),
                balance: balance.to_string(),
            })
            .collect();
        views.sort_by(|a, b| a.asset_id.cmp(&b.asset_id));
        Ok(views)
    }

    /// Trades where the participant was buyer or seller, newest first.
    pub async fn trades(&self, address: &str) -> MarketResult<Vec<Trade>> {
        let address = Self::parse_address(address)?;
        Ok(self.trade_repo.get_by_participant(&address).await)
    }

    /// Claim entries across all distributions, claimed or not.
    pub async fn claims(&self, address: &str) -> MarketResult<Vec<ClaimEntry>> {
        let address = Self::parse_address(address)?;
        Ok(self.distribution_repo.get_claims_for_holder(&address).await)
    }

    fn parse_address(address: &str) -> MarketResult<Address> {
        Ok(Address::new(address).map_err(|e| ValidationError::InvalidField(e.to_string()))?)
    }
}
