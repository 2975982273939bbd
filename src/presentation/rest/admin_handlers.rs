//! Admin handlers for marketplace operation
//!
//! These endpoints are operator-facing: listing assets, managing
//! participant verification, declaring dividend distributions, and
//! inspecting shard health. They share the public API's error mapping.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::ports::{KycRegistry, KycStatus};
use crate::application::use_cases::{
    DistributeDividendCommand, DistributeDividendUseCase, ListAssetCommand, ListAssetUseCase,
};
use crate::domain::entities::DEFAULT_DECIMALS;
use crate::domain::value_objects::Address;
use crate::domain::{Clock, Quantity};
use crate::presentation::rest::ApiError;
use crate::presentation::rest::dto::DistributionView;

use super::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueAssetRequest {
    pub id: String,
    pub name: String,
    /// Decimal string, e.g. "1000"
    pub total_tokens: String,
    /// Fractional digits the token supports; defaults to the ERC-20 18
    #[serde(default)]
    pub decimals: Option<u32>,
    pub issuer: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetResponse {
    pub asset_id: String,
    pub name: String,
    pub total_tokens: String,
    pub decimals: u32,
    pub issuer: String,
    pub listed_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterParticipantRequest {
    pub address: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub address: String,
    pub status: KycStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclareDistributionRequest {
    pub asset: String,
    /// Decimal string, e.g. "50000"
    pub total_amount: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclareDistributionResponse {
    pub distribution: DistributionView,
    pub holder_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardStatsResponse {
    pub shard_id: usize,
    pub open_books: u64,
    pub orders_processed: u64,
    pub trades_executed: u64,
    pub commands_in_queue: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardsResponse {
    pub healthy: bool,
    pub shards: Vec<ShardStatsResponse>,
}

// ============================================================================
// Asset Handlers
// ============================================================================

/// POST /admin/assets - List a new tokenized asset
pub async fn issue_asset<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Json(req): Json<IssueAssetRequest>,
) -> Result<(StatusCode, Json<AssetResponse>), ApiError> {
    let total_tokens = req
        .total_tokens
        .parse::<Decimal>()
        .map_err(|_| ApiError::invalid_parameter("totalTokens", "invalid decimal"))?;

    let use_case = ListAssetUseCase::new(
        Arc::clone(&state.clock),
        Arc::clone(&state.asset_repo),
        Arc::clone(&state.holdings),
    );

    let asset = use_case
        .execute(ListAssetCommand {
            asset_id: req.id,
            name: req.name,
            total_tokens: Quantity::from(total_tokens),
            decimals: req.decimals.unwrap_or(DEFAULT_DECIMALS),
            issuer: req.issuer,
        })
        .await?;

    let response = AssetResponse {
        asset_id: asset.id.to_string(),
        name: asset.name.clone(),
        total_tokens: asset.total_tokens.to_string(),
        decimals: asset.decimals,
        issuer: asset.issuer.to_string(),
        listed_at: asset.listed_at.to_rfc3339(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

// ============================================================================
// Participant Handlers
// ============================================================================

/// POST /admin/participants - Submit a participant for verification
pub async fn register_participant<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Json(req): Json<RegisterParticipantRequest>,
) -> Result<(StatusCode, Json<ParticipantResponse>), ApiError> {
    let address =
        Address::new(&req.address).map_err(|e| ApiError::invalid_parameter("address", e))?;

    state
        .kyc
        .set_status(address.clone(), KycStatus::Pending)
        .await;

    Ok((
        StatusCode::CREATED,
        Json(ParticipantResponse {
            address: address.to_string(),
            status: KycStatus::Pending,
        }),
    ))
}

/// GET /admin/participants - List all participants with their statuses
pub async fn list_participants<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
) -> Json<Vec<ParticipantResponse>> {
    let participants = state
        .kyc
        .all()
        .await
        .into_iter()
        .map(|(address, status)| ParticipantResponse {
            address: address.to_string(),
            status,
        })
        .collect();

    Json(participants)
}

/// PUT /admin/participants/{address}/verify - Approve a participant
pub async fn verify_participant<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path(address): Path<String>,
) -> Result<Json<ParticipantResponse>, ApiError> {
    let address =
        Address::new(&address).map_err(|e| ApiError::invalid_parameter("address", e))?;

    state
        .kyc
        .set_status(address.clone(), KycStatus::Verified)
        .await;

    Ok(Json(ParticipantResponse {
        address: address.to_string(),
        status: KycStatus::Verified,
    }))
}

/// DELETE /admin/participants/{address} - Revoke a participant's verification
pub async fn revoke_participant<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path(address): Path<String>,
) -> Result<Json<ParticipantResponse>, ApiError> {
    let address =
        Address::new(&address).map_err(|e| ApiError::invalid_parameter("address", e))?;

    state
        .kyc
        .set_status(address.clone(), KycStatus::NotSubmitted)
        .await;

    Ok(Json(ParticipantResponse {
        address: address.to_string(),
        status: KycStatus::NotSubmitted,
    }))
}

// ============================================================================
// Distribution Handlers
// ============================================================================

/// POST /admin/distributions - Declare a dividend distribution
pub async fn declare_distribution<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Json(req): Json<DeclareDistributionRequest>,
) -> Result<(StatusCode, Json<DeclareDistributionResponse>), ApiError> {
    let total_amount = req
        .total_amount
        .parse::<Decimal>()
        .map_err(|_| ApiError::invalid_parameter("totalAmount", "invalid decimal"))?;

    let use_case = DistributeDividendUseCase::new(
        Arc::clone(&state.clock),
        Arc::clone(&state.asset_repo),
        Arc::clone(&state.holdings),
        Arc::clone(&state.distribution_repo),
        Arc::clone(&state.event_publisher),
    );

    let result = use_case
        .execute(DistributeDividendCommand {
            asset: req.asset,
            total_amount,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DeclareDistributionResponse {
            distribution: DistributionView::from_distribution(&result.distribution),
            holder_count: result.holder_count,
        }),
    ))
}

// ============================================================================
// Shard Handlers
// ============================================================================

/// GET /admin/shards - Shard health and statistics
pub async fn shard_stats<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
) -> Json<ShardsResponse> {
    let shards = state
        .engine
        .stats()
        .into_iter()
        .map(|s| ShardStatsResponse {
            shard_id: s.shard_id,
            open_books: s.open_books,
            orders_processed: s.orders_processed,
            trades_executed: s.trades_executed,
            commands_in_queue: s.commands_in_queue,
        })
        .collect();

    Json(ShardsResponse {
        healthy: state.engine.is_healthy(),
        shards,
    })
}
