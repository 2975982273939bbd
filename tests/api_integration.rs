//! REST API integration tests. Requests are driven through the router
//! with `oneshot`, against a marketplace booted from a seeded config;
//! the final test serves the router over a real socket.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use estate_exchange::infrastructure::SimulationClock;
use estate_exchange::{Marketplace, MarketplaceConfig};
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;

const ALICE: &str = "0xa000000000000000000000000000000000000001";
const BOB: &str = "0xb000000000000000000000000000000000000002";
const CAROL: &str = "0xc000000000000000000000000000000000000003";
const ISSUER: &str = "0x9000000000000000000000000000000000000009";

const TOWER: &str = "BRK-TOWER-A";
const HARBOR: &str = "DOC-HARBOR-7";

// ============================================================================
// Fixtures
// ============================================================================

fn test_config() -> MarketplaceConfig {
    MarketplaceConfig::from_json(
        r#"{
        "ledger": { "base_latency_ms": 0 },
        "assets": [
            { "id": "BRK-TOWER-A", "name": "Tower A", "total_tokens": "10000", "issuer": "0x9000000000000000000000000000000000000009" },
            { "id": "DOC-HARBOR-7", "name": "Harbor 7", "total_tokens": "5000", "issuer": "0x9000000000000000000000000000000000000009" }
        ],
        "participants": [
            { "address": "0x9000000000000000000000000000000000000009", "status": "VERIFIED" },
            { "address": "0xa000000000000000000000000000000000000001", "status": "VERIFIED" },
            { "address": "0xb000000000000000000000000000000000000002", "status": "VERIFIED" },
            { "address": "0xc000000000000000000000000000000000000003", "status": "PENDING" }
        ],
        "holdings": [
            { "asset": "BRK-TOWER-A", "holder": "0xa000000000000000000000000000000000000001", "quantity": "1000" },
            { "asset": "BRK-TOWER-A", "holder": "0xb000000000000000000000000000000000000002", "quantity": "1000" }
        ]
    }"#,
    )
    .unwrap()
}

/// Boots a marketplace and returns its router. The marketplace is
/// returned too so tests can keep the worker and repositories alive.
async fn test_app() -> (Router, Marketplace<SimulationClock>) {
    let mut market = Marketplace::simulated(test_config());
    let app = market.start().await.unwrap();
    (app, market)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn send(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn order_body(asset: &str, owner: &str, side: &str, price: &str, quantity: &str) -> Value {
    json!({
        "asset": asset,
        "owner": owner,
        "side": side,
        "price": price,
        "quantity": quantity,
    })
}

/// Polls the trade endpoint until settlement goes terminal.
async fn wait_for_settlement(app: &Router, trade_id: &str) -> Value {
    for _ in 0..100 {
        let (status, body) = get(app, &format!("/api/v1/trades/{trade_id}")).await;
        assert_eq!(status, StatusCode::OK);
        if body["settlementStatus"] != "PENDING" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("trade {trade_id} never settled");
}

// ============================================================================
// Basics
// ============================================================================

#[tokio::test]
async fn test_ping() {
    let (app, _market) = test_app().await;

    let (status, body) = get(&app, "/api/v1/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_server_time() {
    let (app, _market) = test_app().await;

    let (status, body) = get(&app, "/api/v1/time").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["serverTime"].as_str().unwrap().contains('T'));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _market) = test_app().await;

    let (status, _) = get(&app, "/api/v1/nonexistent").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Assets
// ============================================================================

#[tokio::test]
async fn test_list_assets() {
    let (app, _market) = test_app().await;

    let (status, body) = get(&app, "/api/v1/assets").await;
    assert_eq!(status, StatusCode::OK);

    let assets = body.as_array().unwrap();
    assert_eq!(assets.len(), 2);

    let tower = assets
        .iter()
        .find(|a| a["assetId"] == TOWER)
        .expect("BRK-TOWER-A listed");
    assert_eq!(tower["name"], "Tower A");
    assert_eq!(tower["totalTokens"], "10000");
    // Issuer keeps what the seeded holdings did not allocate.
    assert_eq!(tower["tokensAvailable"], "8000");
    assert_eq!(tower["issuer"], ISSUER);
    assert!(tower["bestBid"].is_null());
    assert!(tower["bestAsk"].is_null());
}

#[tokio::test]
async fn test_get_asset_includes_top_of_book() {
    let (app, _market) = test_app().await;

    send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, ALICE, "SELL", "10.50", "100"),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, BOB, "BUY", "9.75", "50"),
    )
    .await;

    let (status, body) = get(&app, &format!("/api/v1/assets/{TOWER}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bestAsk"], "10.50");
    assert_eq!(body["bestBid"], "9.75");

    let (status, body) = get(&app, "/api/v1/assets/NO-SUCH").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ASSET_NOT_FOUND");
}

// ============================================================================
// Depth
// ============================================================================

#[tokio::test]
async fn test_depth_reflects_resting_orders() {
    let (app, _market) = test_app().await;

    send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, ALICE, "SELL", "10.50", "100"),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, ALICE, "SELL", "10.50", "25"),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, BOB, "BUY", "9.75", "50"),
    )
    .await;

    let (status, body) = get(&app, &format!("/api/v1/depth?asset={TOWER}&levels=5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["asset"], TOWER);

    // Same-price orders aggregate into one level.
    let asks = body["asks"].as_array().unwrap();
    assert_eq!(asks.len(), 1);
    assert_eq!(asks[0][0], "10.50");
    assert_eq!(asks[0][1], "125");

    let bids = body["bids"].as_array().unwrap();
    assert_eq!(bids.len(), 1);
    assert_eq!(bids[0][0], "9.75");

    assert!(body["revision"].as_u64().unwrap() > 0);

    let (status, body) = get(&app, "/api/v1/depth?asset=NO-SUCH").await;
    // An unknown asset simply has an empty book.
    assert_eq!(status, StatusCode::OK);
    assert!(body["bids"].as_array().unwrap().is_empty());
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn test_create_order_and_match() {
    let (app, _market) = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, ALICE, "SELL", "10.00", "100"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], "OPEN");
    assert_eq!(body["order"]["side"], "SELL");
    assert_eq!(body["order"]["remainingQuantity"], "100");
    // No fills yet, so no trades key at all.
    assert!(body.get("trades").is_none());

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, BOB, "BUY", "10.25", "60"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order"]["status"], "FILLED");

    let trades = body["trades"].as_array().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0]["price"], "10.00");
    assert_eq!(trades[0]["quantity"], "60");
    assert_eq!(trades[0]["buyer"], BOB);
    assert_eq!(trades[0]["seller"], ALICE);
    assert_eq!(trades[0]["takerSide"], "BUY");
}

#[tokio::test]
async fn test_create_order_rejections() {
    let (app, _market) = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body("NO-SUCH", ALICE, "BUY", "10.00", "10"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ASSET_NOT_FOUND");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, ALICE, "SIDEWAYS", "10.00", "10"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PARAMETER");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, ALICE, "BUY", "not-a-price", "10"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PARAMETER");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, ALICE, "BUY", "10.00", "0"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION");

    // CAROL is still pending verification.
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, CAROL, "BUY", "10.00", "10"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NOT_ELIGIBLE");
}

#[tokio::test]
async fn test_self_trade_rejected_over_http() {
    let (app, _market) = test_app().await;

    send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, ALICE, "SELL", "10.00", "100"),
    )
    .await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, ALICE, "BUY", "10.00", "100"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "SELF_TRADE");
}

#[tokio::test]
async fn test_cancel_order_lifecycle() {
    let (app, _market) = test_app().await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, ALICE, "SELL", "10.00", "100"),
    )
    .await;
    let order_id = body["order"]["orderId"].as_str().unwrap().to_string();

    // Wrong owner cannot cancel.
    let (status, body) = delete(
        &app,
        &format!("/api/v1/orders/{order_id}?asset={TOWER}&owner={BOB}"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "NOT_OWNER");

    let (status, body) = delete(
        &app,
        &format!("/api/v1/orders/{order_id}?asset={TOWER}&owner={ALICE}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CANCELLED");

    // A second cancel is a conflict, not a repeat.
    let (status, body) = delete(
        &app,
        &format!("/api/v1/orders/{order_id}?asset={TOWER}&owner={ALICE}"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ORDER_ALREADY_CLOSED");
}

#[tokio::test]
async fn test_open_orders_filters() {
    let (app, _market) = test_app().await;

    send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, ALICE, "SELL", "10.50", "10"),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, ALICE, "SELL", "10.75", "10"),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, BOB, "BUY", "9.50", "10"),
    )
    .await;

    let (status, body) = get(&app, &format!("/api/v1/orders?asset={TOWER}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = get(&app, &format!("/api/v1/orders?asset={TOWER}&side=SELL")).await;
    let asks = body.as_array().unwrap();
    assert_eq!(asks.len(), 2);
    assert_eq!(asks[0]["price"], "10.50");

    let (_, body) = get(&app, &format!("/api/v1/orders?asset={TOWER}&owner={BOB}")).await;
    let bobs = body.as_array().unwrap();
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0]["owner"], BOB);

    let (status, body) = get(&app, &format!("/api/v1/orders?asset={TOWER}&side=UP")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PARAMETER");

    // Single order lookup requires the asset for shard routing.
    let order_id = asks[0]["orderId"].as_str().unwrap();
    let (status, body) = get(&app, &format!("/api/v1/orders/{order_id}?asset={TOWER}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orderId"], *order_id);
}

// ============================================================================
// Trades and settlement over the API
// ============================================================================

#[tokio::test]
async fn test_trade_tape_and_settlement_status() {
    let (app, _market) = test_app().await;

    send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, ALICE, "SELL", "10.00", "50"),
    )
    .await;
    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, BOB, "BUY", "10.00", "50"),
    )
    .await;
    let trade_id = body["trades"][0]["tradeId"].as_str().unwrap().to_string();

    let (status, body) = get(&app, &format!("/api/v1/trades?asset={TOWER}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let settled = wait_for_settlement(&app, &trade_id).await;
    assert_eq!(settled["settlementStatus"], "CONFIRMED");
    assert!(settled["txHash"].as_str().unwrap().starts_with("0x"));
    assert_eq!(settled["attempts"], 1);
    assert!(settled["settledAt"].is_string());

    let (status, body) = get(
        &app,
        "/api/v1/trades/00000000-0000-0000-0000-000000000000",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TRADE_NOT_FOUND");
}

#[tokio::test]
async fn test_holdings_follow_settlement() {
    let (app, _market) = test_app().await;

    let (status, body) = get(&app, &format!("/api/v1/holdings/{ALICE}")).await;
    assert_eq!(status, StatusCode::OK);
    let positions = body.as_array().unwrap();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0]["assetId"], TOWER);
    assert_eq!(positions[0]["balance"], "1000");

    send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, ALICE, "SELL", "10.00", "200"),
    )
    .await;
    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, BOB, "BUY", "10.00", "200"),
    )
    .await;
    let trade_id = body["trades"][0]["tradeId"].as_str().unwrap().to_string();
    wait_for_settlement(&app, &trade_id).await;

    let (_, body) = get(&app, &format!("/api/v1/holdings/{ALICE}")).await;
    assert_eq!(body.as_array().unwrap()[0]["balance"], "800");

    let (_, body) = get(&app, &format!("/api/v1/holdings/{BOB}")).await;
    assert_eq!(body.as_array().unwrap()[0]["balance"], "1200");

    // The participant's trade history shows both sides.
    let (_, body) = get(&app, &format!("/api/v1/holdings/{ALICE}/trades")).await;
    let trades = body.as_array().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0]["seller"], ALICE);
}

// ============================================================================
// Admin endpoints
// ============================================================================

#[tokio::test]
async fn test_admin_issue_asset() {
    let (app, _market) = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/admin/assets",
        json!({
            "id": "OAK-PLAZA-B",
            "name": "Oak Plaza B",
            "totalTokens": "2500",
            "issuer": ISSUER,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["assetId"], "OAK-PLAZA-B");
    assert_eq!(body["totalTokens"], "2500");

    let (_, body) = get(&app, "/api/v1/assets").await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    // The issuer holds the full supply and can sell immediately.
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body("OAK-PLAZA-B", ISSUER, "SELL", "50.00", "100"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_participant_lifecycle() {
    let (app, _market) = test_app().await;
    let dave = "0xd000000000000000000000000000000000000004";

    let (status, body) = send(
        &app,
        "POST",
        "/admin/participants",
        json!({ "address": dave }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "PENDING");

    // Pending participants cannot trade yet.
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, dave, "BUY", "10.00", "10"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/admin/participants/{dave}/verify"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "VERIFIED");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, dave, "BUY", "10.00", "10"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/admin/participants").await;
    let listed = body
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["address"] == dave)
        .unwrap()
        .clone();
    assert_eq!(listed["status"], "VERIFIED");

    // Revocation closes the gate again.
    let (status, body) = delete(&app, &format!("/admin/participants/{dave}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "NOT_SUBMITTED");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, dave, "SELL", "11.00", "10"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_distribution_and_claims() {
    let (app, _market) = test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/admin/distributions",
        json!({ "asset": TOWER, "totalAmount": "10000" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["holderCount"], 3);
    assert_eq!(body["distribution"]["perTokenAmount"], "1");
    let distribution_id = body["distribution"]["distributionId"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = get(&app, &format!("/api/v1/distributions?asset={TOWER}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = get(
        &app,
        &format!("/api/v1/distributions/{distribution_id}/claims/{ALICE}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "UNCLAIMED");
    assert_eq!(body["amount"], "1000");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/distributions/{distribution_id}/claims"),
        json!({ "holder": ALICE }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CLAIMED");
    assert!(body["claimedAt"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/distributions/{distribution_id}/claims"),
        json!({ "holder": ALICE }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_CLAIMED");

    // CAROL held nothing at the snapshot.
    let (status, body) = get(
        &app,
        &format!("/api/v1/distributions/{distribution_id}/claims/{CAROL}"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "CLAIM_NOT_FOUND");

    // Claims show up in the holder's portfolio.
    let (_, body) = get(&app, &format!("/api/v1/holdings/{ALICE}/claims")).await;
    let claims = body.as_array().unwrap();
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0]["status"], "CLAIMED");
}

#[tokio::test]
async fn test_admin_shard_stats() {
    let (app, _market) = test_app().await;

    send(
        &app,
        "POST",
        "/api/v1/orders",
        order_body(TOWER, ALICE, "SELL", "10.00", "10"),
    )
    .await;

    let (status, body) = get(&app, "/admin/shards").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["healthy"], true);

    let shards = body["shards"].as_array().unwrap();
    assert!(!shards.is_empty());
    let processed: u64 = shards
        .iter()
        .map(|s| s["ordersProcessed"].as_u64().unwrap())
        .sum();
    assert!(processed >= 1);
}

// ============================================================================
// Served over a real socket
// ============================================================================

#[tokio::test]
async fn test_api_over_live_server() {
    let mut market = Marketplace::simulated(test_config());
    let app = market.start().await.unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let client = reqwest::Client::new();
    let base = format!("http://{addr}");

    let response = client.get(format!("{base}/api/v1/ping")).send().await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let response = client
        .post(format!("{base}/api/v1/orders"))
        .json(&order_body(HARBOR, ISSUER, "SELL", "25.00", "40"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["order"]["status"], "OPEN");

    let response = client
        .get(format!("{base}/api/v1/depth"))
        .query(&[("asset", HARBOR)])
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["asks"].as_array().unwrap().len(), 1);
    assert_eq!(body["asks"][0][0], "25.00");
}
