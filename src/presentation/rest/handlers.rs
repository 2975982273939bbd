use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::application::ports::DistributionReader;
use crate::application::use_cases::{
    AssetSummary, CancelOrderCommand, CancelOrderUseCase, ClaimDividendCommand,
    ClaimDividendUseCase, GetDepthUseCase, GetMarketInfoUseCase, GetPortfolioUseCase,
    HoldingView, SubmitOrderCommand, SubmitOrderUseCase,
};
use crate::domain::entities::DistributionId;
use crate::domain::value_objects::{Address, AssetId};
use crate::domain::{Clock, Price, Quantity, Side};
use crate::presentation::rest::{ApiError, dto::*};

use super::AppState;

/// GET /api/v1/ping
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {})
}

/// GET /api/v1/time
pub async fn server_time<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
) -> Json<ServerTimeResponse> {
    Json(ServerTimeResponse {
        server_time: state.clock.now().to_rfc3339(),
    })
}

/// GET /api/v1/assets
pub async fn list_assets<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
) -> Result<Json<Vec<AssetSummary>>, ApiError> {
    let use_case = GetMarketInfoUseCase::new(
        Arc::clone(&state.engine),
        Arc::clone(&state.asset_repo),
        Arc::clone(&state.trade_repo),
        Arc::clone(&state.holdings),
    );

    Ok(Json(use_case.list_assets().await?))
}

/// GET /api/v1/assets/{asset_id}
pub async fn get_asset<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path(asset_id): Path<String>,
) -> Result<Json<AssetSummary>, ApiError> {
    let use_case = GetMarketInfoUseCase::new(
        Arc::clone(&state.engine),
        Arc::clone(&state.asset_repo),
        Arc::clone(&state.trade_repo),
        Arc::clone(&state.holdings),
    );

    Ok(Json(use_case.get_asset(&asset_id).await?))
}

/// GET /api/v1/depth
pub async fn depth<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Query(query): Query<DepthQuery>,
) -> Result<Json<DepthResponse>, ApiError> {
    let use_case = GetDepthUseCase::new(Arc::clone(&state.engine));

    let snapshot = use_case.execute(&query.asset, query.levels).await?;
    Ok(Json(DepthResponse::from_snapshot(&snapshot)))
}

/// POST /api/v1/orders
pub async fn create_order<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<SubmitOrderResponse>, ApiError> {
    let side: Side = req
        .side
        .as_str()
        .try_into()
        .map_err(|_| ApiError::invalid_parameter("side", "must be BUY or SELL"))?;

    let price = req
        .price
        .parse::<Decimal>()
        .map_err(|_| ApiError::invalid_parameter("price", "invalid decimal"))?;

    let quantity = req
        .quantity
        .parse::<Decimal>()
        .map_err(|_| ApiError::invalid_parameter("quantity", "invalid decimal"))?;

    let command = SubmitOrderCommand {
        asset: req.asset,
        owner: req.owner,
        side,
        quantity: Quantity::from(quantity),
        price: Price::from(price),
    };

    let use_case = SubmitOrderUseCase::new(
        Arc::clone(&state.clock),
        Arc::clone(&state.engine),
        Arc::clone(&state.asset_repo),
        Arc::clone(&state.kyc),
        Arc::clone(&state.trade_repo),
        Arc::clone(&state.settlement_queue),
    );

    let result = use_case.execute(command).await?;

    Ok(Json(SubmitOrderResponse {
        order: OrderView::from_order(&result.order),
        trades: result.trades.iter().map(TradeView::from_trade).collect(),
    }))
}

/// DELETE /api/v1/orders/{order_id}
pub async fn cancel_order<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path(order_id): Path<String>,
    Query(query): Query<CancelQuery>,
) -> Result<Json<OrderView>, ApiError> {
    let use_case = CancelOrderUseCase::new(Arc::clone(&state.engine));

    let order = use_case
        .execute(CancelOrderCommand {
            asset: query.asset,
            order_id,
            requester: query.owner,
        })
        .await?;

    Ok(Json(OrderView::from_order(&order)))
}

/// GET /api/v1/orders
pub async fn open_orders<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Query(query): Query<OpenOrdersQuery>,
) -> Result<Json<Vec<OrderView>>, ApiError> {
    let side = query
        .side
        .as_deref()
        .map(Side::try_from)
        .transpose()
        .map_err(|_| ApiError::invalid_parameter("side", "must be BUY or SELL"))?;

    let use_case = GetMarketInfoUseCase::new(
        Arc::clone(&state.engine),
        Arc::clone(&state.asset_repo),
        Arc::clone(&state.trade_repo),
        Arc::clone(&state.holdings),
    );

    let orders = use_case
        .open_orders(&query.asset, side, query.owner.as_deref())
        .await?;

    Ok(Json(orders.iter().map(OrderView::from_order).collect()))
}

/// GET /api/v1/orders/{order_id}
pub async fn get_order<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path(order_id): Path<String>,
    Query(query): Query<OrderLookupQuery>,
) -> Result<Json<OrderView>, ApiError> {
    let use_case = GetMarketInfoUseCase::new(
        Arc::clone(&state.engine),
        Arc::clone(&state.asset_repo),
        Arc::clone(&state.trade_repo),
        Arc::clone(&state.holdings),
    );

    let order = use_case.get_order(&query.asset, &order_id).await?;
    Ok(Json(OrderView::from_order(&order)))
}

/// GET /api/v1/trades
pub async fn recent_trades<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Query(query): Query<TradesQuery>,
) -> Result<Json<Vec<TradeView>>, ApiError> {
    let use_case = GetMarketInfoUseCase::new(
        Arc::clone(&state.engine),
        Arc::clone(&state.asset_repo),
        Arc::clone(&state.trade_repo),
        Arc::clone(&state.holdings),
    );

    let trades = use_case.recent_trades(&query.asset, query.limit).await?;
    Ok(Json(trades.iter().map(TradeView::from_trade).collect()))
}

/// GET /api/v1/trades/{trade_id}
pub async fn get_trade<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path(trade_id): Path<String>,
) -> Result<Json<TradeView>, ApiError> {
    let use_case = GetMarketInfoUseCase::new(
        Arc::clone(&state.engine),
        Arc::clone(&state.asset_repo),
        Arc::clone(&state.trade_repo),
        Arc::clone(&state.holdings),
    );

    let trade = use_case.get_trade(&trade_id).await?;
    Ok(Json(TradeView::from_trade(&trade)))
}

/// GET /api/v1/holdings/{address}
pub async fn holdings<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path(address): Path<String>,
) -> Result<Json<Vec<HoldingView>>, ApiError> {
    let use_case = GetPortfolioUseCase::new(
        Arc::clone(&state.holdings),
        Arc::clone(&state.trade_repo),
        Arc::clone(&state.distribution_repo),
    );

    Ok(Json(use_case.holdings(&address).await?))
}

/// GET /api/v1/holdings/{address}/trades
pub async fn participant_trades<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path(address): Path<String>,
) -> Result<Json<Vec<TradeView>>, ApiError> {
    let use_case = GetPortfolioUseCase::new(
        Arc::clone(&state.holdings),
        Arc::clone(&state.trade_repo),
        Arc::clone(&state.distribution_repo),
    );

    let trades = use_case.trades(&address).await?;
    Ok(Json(trades.iter().map(TradeView::from_trade).collect()))
}

/// GET /api/v1/holdings/{address}/claims
pub async fn participant_claims<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path(address): Path<String>,
) -> Result<Json<Vec<ClaimView>>, ApiError> {
    let use_case = GetPortfolioUseCase::new(
        Arc::clone(&state.holdings),
        Arc::clone(&state.trade_repo),
        Arc::clone(&state.distribution_repo),
    );

    let claims = use_case.claims(&address).await?;
    Ok(Json(claims.iter().map(ClaimView::from_entry).collect()))
}

/// GET /api/v1/distributions
pub async fn list_distributions<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Query(query): Query<DistributionsQuery>,
) -> Result<Json<Vec<DistributionView>>, ApiError> {
    let asset_id = AssetId::new(&query.asset)
        .map_err(|e| ApiError::invalid_parameter("asset", e))?;

    let distributions = state.distribution_repo.get_by_asset(&asset_id).await;
    Ok(Json(
        distributions
            .iter()
            .map(DistributionView::from_distribution)
            .collect(),
    ))
}

/// GET /api/v1/distributions/{id}/claims/{address}
pub async fn claim_status<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path((distribution_id, address)): Path<(String, String)>,
) -> Result<Json<ClaimView>, ApiError> {
    let distribution_id = DistributionId::parse(&distribution_id)
        .map_err(|_| ApiError::invalid_parameter("distributionId", "must be a UUID"))?;
    let holder =
        Address::new(&address).map_err(|e| ApiError::invalid_parameter("address", e))?;

    if state.distribution_repo.get(&distribution_id).await.is_none() {
        return Err(ApiError::not_found(
            "DISTRIBUTION_NOT_FOUND",
            format!("Distribution {} not found", distribution_id),
        ));
    }

    let entry = state
        .distribution_repo
        .get_claim(&distribution_id, &holder)
        .await
        .ok_or_else(|| {
            ApiError::not_found(
                "CLAIM_NOT_FOUND",
                format!("No claim entry for {} in this distribution", holder),
            )
        })?;

    Ok(Json(ClaimView::from_entry(&entry)))
}

/// POST /api/v1/distributions/{id}/claims
pub async fn claim_dividend<C: Clock>(
    State(state): State<Arc<AppState<C>>>,
    Path(distribution_id): Path<String>,
    Json(req): Json<ClaimRequest>,
) -> Result<Json<ClaimView>, ApiError> {
    let use_case = ClaimDividendUseCase::new(
        Arc::clone(&state.clock),
        Arc::clone(&state.distribution_repo),
        Arc::clone(&state.event_publisher),
    );

    let entry = use_case
        .execute(ClaimDividendCommand {
            distribution_id,
            holder: req.holder,
        })
        .await?;

    Ok(Json(ClaimView::from_entry(&entry)))
}
