//! Dividend distribution and claim tests against a fully wired
//! marketplace: snapshot pro-rata entitlements, exactly-once claims,
//! and the interaction between settlement timing and snapshots.

use estate_exchange::{
    Address, ClaimDividendCommand, ClaimDividendUseCase, ClaimStatus, DistributeDividendCommand,
    DistributeDividendUseCase, GetPortfolioUseCase, MarketError, MarketEvent, Marketplace,
    MarketplaceConfig, Quantity, SettlementStatus, Side, SubmitOrderCommand, SubmitOrderUseCase,
    TradeReader,
};
use estate_exchange::application::DistributeDividendResult;
use estate_exchange::domain::{EligibilityError, Price, StateError};
use estate_exchange::infrastructure::SimulationClock;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::timeout;

const ALICE: &str = "0xa000000000000000000000000000000000000001";
const BOB: &str = "0xb000000000000000000000000000000000000002";
const CAROL: &str = "0xc000000000000000000000000000000000000003";
const ISSUER: &str = "0x9000000000000000000000000000000000000009";

const TOWER: &str = "BRK-TOWER-A";

// ============================================================================
// Fixtures
// ============================================================================

fn test_config() -> MarketplaceConfig {
    MarketplaceConfig::from_json(
        r#"{
        "ledger": { "base_latency_ms": 0 },
        "assets": [
            { "id": "BRK-TOWER-A", "name": "Tower A", "total_tokens": "10000", "issuer": "0x9000000000000000000000000000000000000009" }
        ],
        "participants": [
            { "address": "0x9000000000000000000000000000000000000009", "status": "VERIFIED" },
            { "address": "0xa000000000000000000000000000000000000001", "status": "VERIFIED" },
            { "address": "0xb000000000000000000000000000000000000002", "status": "VERIFIED" },
            { "address": "0xc000000000000000000000000000000000000003", "status": "VERIFIED" }
        ],
        "holdings": [
            { "asset": "BRK-TOWER-A", "holder": "0xa000000000000000000000000000000000000001", "quantity": "1000" },
            { "asset": "BRK-TOWER-A", "holder": "0xb000000000000000000000000000000000000002", "quantity": "1000" }
        ]
    }"#,
    )
    .unwrap()
}

async fn setup_market() -> Marketplace<SimulationClock> {
    let mut market = Marketplace::simulated(test_config());
    let _ = market.start().await.unwrap();
    market
}

async fn distribute(
    market: &Marketplace<SimulationClock>,
    total_amount: Decimal,
) -> DistributeDividendResult {
    DistributeDividendUseCase::new(
        Arc::clone(&market.clock),
        Arc::clone(&market.asset_repo),
        Arc::clone(&market.holdings),
        Arc::clone(&market.distribution_repo),
        Arc::clone(&market.event_publisher),
    )
    .execute(DistributeDividendCommand {
        asset: TOWER.to_string(),
        total_amount,
    })
    .await
    .unwrap()
}

async fn claim(
    market: &Marketplace<SimulationClock>,
    distribution_id: &str,
    holder: &str,
) -> Result<estate_exchange::ClaimEntry, MarketError> {
    ClaimDividendUseCase::new(
        Arc::clone(&market.clock),
        Arc::clone(&market.distribution_repo),
        Arc::clone(&market.event_publisher),
    )
    .execute(ClaimDividendCommand {
        distribution_id: distribution_id.to_string(),
        holder: holder.to_string(),
    })
    .await
}

/// Crosses a sell from `seller` with a buy from `buyer` and waits for the
/// trade to settle.
async fn trade_and_settle(
    market: &Marketplace<SimulationClock>,
    seller: &str,
    buyer: &str,
    quantity: Decimal,
) {
    let mut events = market.event_publisher.subscribe();
    let submit = SubmitOrderUseCase::new(
        Arc::clone(&market.clock),
        Arc::clone(&market.engine),
        Arc::clone(&market.asset_repo),
        Arc::clone(&market.kyc),
        Arc::clone(&market.trade_repo),
        Arc::clone(&market.settlement_queue),
    );

    submit
        .execute(SubmitOrderCommand {
            asset: TOWER.to_string(),
            owner: seller.to_string(),
            side: Side::Sell,
            price: Price::from(dec!(10.00)),
            quantity: Quantity::from(quantity),
        })
        .await
        .unwrap();
    let result = submit
        .execute(SubmitOrderCommand {
            asset: TOWER.to_string(),
            owner: buyer.to_string(),
            side: Side::Buy,
            price: Price::from(dec!(10.00)),
            quantity: Quantity::from(quantity),
        })
        .await
        .unwrap();
    let trade_id = result.trades[0].id;

    next_event(&mut events, move |e| {
        matches!(e, MarketEvent::TradeSettled(s) if s.trade_id == trade_id)
    })
    .await;
    let trade = market.trade_repo.get(&trade_id).await.unwrap();
    assert_eq!(trade.settlement, SettlementStatus::Confirmed);
}

async fn next_event<F>(rx: &mut broadcast::Receiver<MarketEvent>, mut matches: F) -> MarketEvent
where
    F: FnMut(&MarketEvent) -> bool,
{
    loop {
        let event = timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for event")
            .expect("event channel closed");
        if matches(&event) {
            return event;
        }
    }
}

fn addr(s: &str) -> Address {
    Address::new(s).unwrap()
}

// ============================================================================
// Snapshot semantics
// ============================================================================

#[tokio::test]
async fn test_distribution_is_pro_rata_over_confirmed_holdings() {
    let market = setup_market().await;

    // Supply 10000: ALICE 1000, BOB 1000, ISSUER 8000. 10000 distributed
    // means exactly 1 per token.
    let result = distribute(&market, dec!(10000)).await;

    assert_eq!(result.holder_count, 3);
    assert_eq!(result.distribution.per_token_amount, dec!(1));
    assert_eq!(result.distribution.total_tokens, Quantity::from(dec!(10000)));

    use estate_exchange::application::ports::DistributionReader;
    let claims = market
        .distribution_repo
        .get_claims(&result.distribution.id)
        .await;
    assert_eq!(claims.len(), 3);

    let total_allocated: Decimal = claims.iter().map(|c| c.amount).sum();
    assert_eq!(total_allocated, dec!(10000));

    let alice_claim = claims.iter().find(|c| c.holder == addr(ALICE)).unwrap();
    assert_eq!(alice_claim.amount, dec!(1000));
    assert_eq!(alice_claim.status, ClaimStatus::Unclaimed);
}

#[tokio::test]
async fn test_snapshot_fixed_before_later_trades() {
    let market = setup_market().await;

    let first = distribute(&market, dec!(5000)).await;

    // ALICE sells half her stake after the snapshot was taken.
    trade_and_settle(&market, ALICE, BOB, dec!(500)).await;

    use estate_exchange::application::ports::DistributionReader;
    let alice_before = market
        .distribution_repo
        .get_claim(&first.distribution.id, &addr(ALICE))
        .await
        .unwrap();
    // Entitlement is still based on the 1000 tokens she held at snapshot.
    assert_eq!(alice_before.balance, Quantity::from(dec!(1000)));
    assert_eq!(alice_before.amount, dec!(500));

    // A new distribution sees the post-trade balances.
    let second = distribute(&market, dec!(5000)).await;
    let alice_after = market
        .distribution_repo
        .get_claim(&second.distribution.id, &addr(ALICE))
        .await
        .unwrap();
    let bob_after = market
        .distribution_repo
        .get_claim(&second.distribution.id, &addr(BOB))
        .await
        .unwrap();
    assert_eq!(alice_after.balance, Quantity::from(dec!(500)));
    assert_eq!(bob_after.balance, Quantity::from(dec!(1500)));
}

#[tokio::test]
async fn test_pending_trade_does_not_move_the_snapshot() {
    // No worker: the trade executes but never settles, so confirmed
    // holdings are unchanged when the snapshot is taken.
    let market = Marketplace::simulated(test_config());

    let submit = SubmitOrderUseCase::new(
        Arc::clone(&market.clock),
        Arc::clone(&market.engine),
        Arc::clone(&market.asset_repo),
        Arc::clone(&market.kyc),
        Arc::clone(&market.trade_repo),
        Arc::clone(&market.settlement_queue),
    );

    // Seed by hand since start() was never called.
    use estate_exchange::{KycRegistry, KycStatus, ListAssetCommand, ListAssetUseCase};
    ListAssetUseCase::new(
        Arc::clone(&market.clock),
        Arc::clone(&market.asset_repo),
        Arc::clone(&market.holdings),
    )
    .execute(ListAssetCommand {
        asset_id: TOWER.to_string(),
        name: "Tower A".to_string(),
        total_tokens: Quantity::from(dec!(10000)),
        decimals: 18,
        issuer: ISSUER.to_string(),
    })
    .await
    .unwrap();
    market.kyc.set_status(addr(ISSUER), KycStatus::Verified).await;
    market.kyc.set_status(addr(BOB), KycStatus::Verified).await;

    submit
        .execute(SubmitOrderCommand {
            asset: TOWER.to_string(),
            owner: ISSUER.to_string(),
            side: Side::Sell,
            price: Price::from(dec!(10.00)),
            quantity: Quantity::from(dec!(400)),
        })
        .await
        .unwrap();
    let result = submit
        .execute(SubmitOrderCommand {
            asset: TOWER.to_string(),
            owner: BOB.to_string(),
            side: Side::Buy,
            price: Price::from(dec!(10.00)),
            quantity: Quantity::from(dec!(400)),
        })
        .await
        .unwrap();
    assert_eq!(result.trades[0].settlement, SettlementStatus::Pending);

    let distribution = distribute(&market, dec!(1000)).await;

    // Only the issuer held confirmed tokens at the snapshot.
    assert_eq!(distribution.holder_count, 1);
    use estate_exchange::application::ports::DistributionReader;
    assert!(market
        .distribution_repo
        .get_claim(&distribution.distribution.id, &addr(BOB))
        .await
        .is_none());
}

// ============================================================================
// Claims
// ============================================================================

#[tokio::test]
async fn test_claim_pays_exactly_once() {
    let market = setup_market().await;
    let result = distribute(&market, dec!(10000)).await;
    let id = result.distribution.id.to_string();

    let entry = claim(&market, &id, ALICE).await.unwrap();
    assert_eq!(entry.status, ClaimStatus::Claimed);
    assert_eq!(entry.amount, dec!(1000));
    assert!(entry.claimed_at.is_some());

    let err = claim(&market, &id, ALICE).await.unwrap_err();
    assert!(matches!(
        err,
        MarketError::State(StateError::AlreadyClaimed(_))
    ));

    // BOB's entitlement is independent of ALICE's claim.
    let bob_entry = claim(&market, &id, BOB).await.unwrap();
    assert_eq!(bob_entry.amount, dec!(1000));
}

#[tokio::test]
async fn test_non_holder_cannot_claim() {
    let market = setup_market().await;
    let result = distribute(&market, dec!(10000)).await;

    // CAROL is verified but held nothing at the snapshot.
    let err = claim(&market, &result.distribution.id.to_string(), CAROL)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MarketError::Eligibility(EligibilityError::NotEligible(_))
    ));
}

#[tokio::test]
async fn test_claim_against_unknown_distribution() {
    let market = setup_market().await;

    let err = claim(&market, "00000000-0000-0000-0000-000000000000", ALICE)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        MarketError::State(StateError::DistributionNotFound(_))
    ));
}

#[tokio::test]
async fn test_claims_visible_in_portfolio() {
    let market = setup_market().await;
    let first = distribute(&market, dec!(10000)).await;
    let second = distribute(&market, dec!(2000)).await;

    claim(&market, &first.distribution.id.to_string(), ALICE)
        .await
        .unwrap();

    let portfolio = GetPortfolioUseCase::new(
        Arc::clone(&market.holdings),
        Arc::clone(&market.trade_repo),
        Arc::clone(&market.distribution_repo),
    );
    let claims = portfolio.claims(ALICE).await.unwrap();
    assert_eq!(claims.len(), 2);

    let claimed = claims
        .iter()
        .find(|c| c.distribution_id == first.distribution.id)
        .unwrap();
    assert_eq!(claimed.status, ClaimStatus::Claimed);

    let unclaimed = claims
        .iter()
        .find(|c| c.distribution_id == second.distribution.id)
        .unwrap();
    assert_eq!(unclaimed.status, ClaimStatus::Unclaimed);
    assert_eq!(unclaimed.amount, dec!(200));
}

// ============================================================================
// Events
// ============================================================================

#[tokio::test]
async fn test_distribution_and_claim_events() {
    let market = setup_market().await;
    let mut events = market.event_publisher.subscribe();

    let result = distribute(&market, dec!(10000)).await;

    let distributed = next_event(&mut events, |e| {
        matches!(e, MarketEvent::DividendDistributed(_))
    })
    .await;
    let MarketEvent::DividendDistributed(distributed) = distributed else {
        unreachable!()
    };
    assert_eq!(distributed.distribution_id, result.distribution.id);
    assert_eq!(distributed.total_amount, dec!(10000));
    assert_eq!(distributed.holder_count, 3);

    claim(&market, &result.distribution.id.to_string(), BOB)
        .await
        .unwrap();

    let claimed = next_event(&mut events, |e| {
        matches!(e, MarketEvent::DividendClaimed(_))
    })
    .await;
    let MarketEvent::DividendClaimed(claimed) = claimed else {
        unreachable!()
    };
    assert_eq!(claimed.holder, addr(BOB));
    assert_eq!(claimed.amount, dec!(1000));
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_distribution_rejects_bad_input() {
    let market = setup_market().await;

    let use_case = DistributeDividendUseCase::new(
        Arc::clone(&market.clock),
        Arc::clone(&market.asset_repo),
        Arc::clone(&market.holdings),
        Arc::clone(&market.distribution_repo),
        Arc::clone(&market.event_publisher),
    );

    let err = use_case
        .execute(DistributeDividendCommand {
            asset: "NO-SUCH-ASSET".to_string(),
            total_amount: dec!(1000),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::Validation(_)));

    let err = use_case
        .execute(DistributeDividendCommand {
            asset: TOWER.to_string(),
            total_amount: dec!(0),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::Validation(_)));
}
