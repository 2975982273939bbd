use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{admin_handlers, handlers};
use crate::domain::Clock;
use crate::infrastructure::{
    BroadcastEventPublisher, InMemoryAssetRepository, InMemoryDistributionRepository,
    InMemoryHoldingsRepository, InMemoryKycRegistry, InMemoryTradeRepository,
    SettlementQueueSender, ShardedMarketManager,
};

/// Application state shared across handlers - uses concrete infrastructure types
pub struct AppState<C: Clock> {
    pub clock: Arc<C>,
    pub engine: Arc<ShardedMarketManager>,
    pub asset_repo: Arc<InMemoryAssetRepository>,
    pub trade_repo: Arc<InMemoryTradeRepository>,
    pub holdings: Arc<InMemoryHoldingsRepository>,
    pub distribution_repo: Arc<InMemoryDistributionRepository>,
    pub kyc: Arc<InMemoryKycRegistry>,
    pub event_publisher: Arc<BroadcastEventPublisher>,
    pub settlement_queue: Arc<SettlementQueueSender>,
}

impl<C: Clock> AppState<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clock: Arc<C>,
        engine: Arc<ShardedMarketManager>,
        asset_repo: Arc<InMemoryAssetRepository>,
        trade_repo: Arc<InMemoryTradeRepository>,
        holdings: Arc<InMemoryHoldingsRepository>,
        distribution_repo: Arc<InMemoryDistributionRepository>,
        kyc: Arc<InMemoryKycRegistry>,
        event_publisher: Arc<BroadcastEventPublisher>,
        settlement_queue: Arc<SettlementQueueSender>,
    ) -> Self {
        AppState {
            clock,
            engine,
            asset_repo,
            trade_repo,
            holdings,
            distribution_repo,
            kyc,
            event_publisher,
            settlement_queue,
        }
    }
}

/// Create the REST API router
pub fn create_router<C: Clock + 'static>(state: Arc<AppState<C>>) -> Router {
    Router::new()
        // Liveness
        .route("/api/v1/ping", get(handlers::ping))
        .route("/api/v1/time", get(handlers::server_time::<C>))
        // Asset catalog
        .route("/api/v1/assets", get(handlers::list_assets::<C>))
        .route("/api/v1/assets/{asset_id}", get(handlers::get_asset::<C>))
        // Market data
        .route("/api/v1/depth", get(handlers::depth::<C>))
        .route("/api/v1/trades", get(handlers::recent_trades::<C>))
        .route("/api/v1/trades/{trade_id}", get(handlers::get_trade::<C>))
        // Order management
        .route("/api/v1/orders", post(handlers::create_order::<C>))
        .route("/api/v1/orders", get(handlers::open_orders::<C>))
        .route("/api/v1/orders/{order_id}", get(handlers::get_order::<C>))
        .route(
            "/api/v1/orders/{order_id}",
            delete(handlers::cancel_order::<C>),
        )
        // Portfolio
        .route("/api/v1/holdings/{address}", get(handlers::holdings::<C>))
        .route(
            "/api/v1/holdings/{address}/trades",
            get(handlers::participant_trades::<C>),
        )
        .route(
            "/api/v1/holdings/{address}/claims",
            get(handlers::participant_claims::<C>),
        )
        // Dividends
        .route(
            "/api/v1/distributions",
            get(handlers::list_distributions::<C>),
        )
        .route(
            "/api/v1/distributions/{id}/claims/{address}",
            get(handlers::claim_status::<C>),
        )
        .route(
            "/api/v1/distributions/{id}/claims",
            post(handlers::claim_dividend::<C>),
        )
        // Admin endpoints
        .route("/admin/assets", post(admin_handlers::issue_asset::<C>))
        .route(
            "/admin/participants",
            post(admin_handlers::register_participant::<C>),
        )
        .route(
            "/admin/participants",
            get(admin_handlers::list_participants::<C>),
        )
        .route(
            "/admin/participants/{address}/verify",
            put(admin_handlers::verify_participant::<C>),
        )
        .route(
            "/admin/participants/{address}",
            delete(admin_handlers::revoke_participant::<C>),
        )
        .route(
            "/admin/distributions",
            post(admin_handlers::declare_distribution::<C>),
        )
        .route("/admin/shards", get(admin_handlers::shard_stats::<C>))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
