use crate::application::ports::{SettlementLedger, TransferInstruction};
use crate::domain::errors::SettlementError;
use crate::domain::value_objects::{Address, AssetId, Quantity, TradeId};
use async_trait::async_trait;
use dashmap::DashMap;
use rand_distr::{Distribution, Normal};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// What the simulated ledger does with incoming transfers.
#[derive(Debug, Clone)]
pub enum LedgerBehavior {
    /// Every transfer succeeds
    Succeed,
    /// The first `times` transfers fail with a transient network error,
    /// later ones succeed
    FailTransiently { times: u32 },
    /// Every transfer is rejected permanently
    Reject { reason: String },
}

/// Simulated call latency: a base delay plus normal-distributed jitter.
#[derive(Debug, Clone)]
pub struct LedgerLatency {
    base: Duration,
    jitter: Option<Normal<f64>>,
}

impl LedgerLatency {
    pub fn new(base_ms: u64, jitter_std_dev_ms: f64) -> Self {
        Self {
            base: Duration::from_millis(base_ms),
            jitter: Normal::new(0.0, jitter_std_dev_ms)
                .ok()
                .filter(|_| jitter_std_dev_ms > 0.0),
        }
    }

    fn delay(&self) -> Duration {
        match &self.jitter {
            Some(normal) => {
                let jitter_ms = normal.sample(&mut rand::thread_rng()).abs();
                self.base + Duration::from_secs_f64(jitter_ms / 1000.0)
            }
            None => self.base,
        }
    }
}

/// In-process stand-in for the external settlement ledger
///
/// Mirrors the properties settlement has to cope with: latency,
/// transient outages, permanent rejections, and per-address compliance
/// blocks. Transfers are idempotent by trade id, so a retry after an
/// unobserved timeout returns the original transaction hash instead of
/// moving tokens twice.
///
/// Balance tracking is off until the first `seed_balance` call; a
/// ledger constructed purely for behavior simulation does not enforce
/// balances it was never told about.
pub struct SimulatedLedger {
    behavior: LedgerBehavior,
    latency: Option<LedgerLatency>,
    calls: AtomicUsize,
    balances: DashMap<(AssetId, Address), Quantity>,
    enforce_balances: AtomicBool,
    executed: DashMap<TradeId, String>,
    blocked_addresses: DashMap<Address, String>,
}

impl SimulatedLedger {
    pub fn new() -> Self {
        Self::with_behavior(LedgerBehavior::Succeed)
    }

    pub fn with_behavior(behavior: LedgerBehavior) -> Self {
        Self {
            behavior,
            latency: None,
            calls: AtomicUsize::new(0),
            balances: DashMap::new(),
            enforce_balances: AtomicBool::new(false),
            executed: DashMap::new(),
            blocked_addresses: DashMap::new(),
        }
    }

    pub fn with_latency(mut self, latency: LedgerLatency) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Seed an on-ledger balance. The first seed turns balance
    /// enforcement on for every subsequent transfer.
    pub fn seed_balance(&self, asset: &AssetId, holder: &Address, quantity: Quantity) {
        self.enforce_balances.store(true, Ordering::SeqCst);
        let mut entry = self
            .balances
            .entry((asset.clone(), holder.clone()))
            .or_insert(Quantity::ZERO);
        *entry = *entry + quantity;
    }

    /// Permanently reject transfers touching this address.
    pub fn block_address(&self, address: Address, reason: impl Into<String>) {
        self.blocked_addresses.insert(address, reason.into());
    }

    /// Number of transfer calls received, including failed ones.
    pub fn transfer_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// On-ledger balance, for test assertions.
    pub fn balance_of(&self, asset: &AssetId, holder: &Address) -> Quantity {
        self.balances
            .get(&(asset.clone(), holder.clone()))
            .map(|b| *b.value())
            .unwrap_or(Quantity::ZERO)
    }

    fn tx_hash_for(trade_id: &TradeId) -> String {
        let id = trade_id.simple().to_string();
        format!("0x{id}{id}")
    }
}

impl Default for SimulatedLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettlementLedger for SimulatedLedger {
    async fn transfer(&self, instruction: &TransferInstruction) -> Result<String, SettlementError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(latency) = &self.latency {
            tokio::time::sleep(latency.delay()).await;
        }

        match &self.behavior {
            LedgerBehavior::Succeed => {}
            LedgerBehavior::FailTransiently { times } => {
                if call <= *times as usize {
                    return Err(SettlementError::Network("simulated outage".into()));
                }
            }
            LedgerBehavior::Reject { reason } => {
                return Err(SettlementError::Rejected(reason.clone()));
            }
        }

        // A retry whose first attempt landed gets the original hash back
        if let Some(hash) = self.executed.get(&instruction.trade_id) {
            return Ok(hash.clone());
        }

        for party in [&instruction.from, &instruction.to] {
            if let Some(reason) = self.blocked_addresses.get(party) {
                return Err(SettlementError::Rejected(reason.clone()));
            }
        }

        if self.enforce_balances.load(Ordering::SeqCst) {
            {
                let mut sender = self
                    .balances
                    .get_mut(&(instruction.asset.clone(), instruction.from.clone()))
                    .ok_or(SettlementError::InsufficientBalance)?;
                if *sender < instruction.quantity {
                    return Err(SettlementError::InsufficientBalance);
                }
                *sender = *sender - instruction.quantity;
            }

            let mut receiver = self
                .balances
                .entry((instruction.asset.clone(), instruction.to.clone()))
                .or_insert(Quantity::ZERO);
            *receiver = *receiver + instruction.quantity;
        }

        let hash = Self::tx_hash_for(&instruction.trade_id);
        self.executed.insert(instruction.trade_id, hash.clone());
        Ok(hash)
    }
}
