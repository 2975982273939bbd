//! Marketplace configuration loaded from JSON.
//!
//! Every field has a sensible default so a bare `{}` file boots a working
//! marketplace. Listings, participants, holdings and resting orders can be
//! seeded declaratively; the DTOs here stay serde-friendly and convert into
//! domain types with validation at load time.

use crate::application::ports::KycStatus;
use crate::application::use_cases::SettlementPolicy;
use crate::domain::entities::Asset;
use crate::domain::value_objects::{Address, AssetId, Price, Quantity, Side};
use crate::infrastructure::market_shard::ShardManagerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level marketplace configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    /// Marketplace display name
    #[serde(default = "default_marketplace_name")]
    pub name: String,

    /// REST server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Matching engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Settlement retry policy
    #[serde(default)]
    pub settlement: SettlementConfig,

    /// Simulated ledger tuning
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Tokenized properties listed at startup
    #[serde(default)]
    pub assets: Vec<AssetConfig>,

    /// Participants registered at startup
    #[serde(default)]
    pub participants: Vec<ParticipantConfig>,

    /// Token balances granted at startup, on top of issuer supply
    #[serde(default)]
    pub holdings: Vec<HoldingConfig>,

    /// Orders resting on the books at startup
    #[serde(default)]
    pub seed_orders: Vec<SeedOrderConfig>,
}

fn default_marketplace_name() -> String {
    "estate-exchange".to_string()
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            name: default_marketplace_name(),
            server: ServerConfig::default(),
            engine: EngineConfig::default(),
            settlement: SettlementConfig::default(),
            ledger: LedgerConfig::default(),
            assets: Vec::new(),
            participants: Vec::new(),
            holdings: Vec::new(),
            seed_orders: Vec::new(),
        }
    }
}

impl MarketplaceConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// REST server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Buffer size of the market event broadcast channels
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_event_capacity() -> usize {
    10_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            event_capacity: default_event_capacity(),
        }
    }
}

/// Matching engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of regular shard threads. 0 means one per CPU core.
    #[serde(default)]
    pub num_shards: usize,

    /// Assets that get a dedicated shard thread
    #[serde(default)]
    pub hot_assets: Vec<String>,

    /// Command channel depth per shard
    #[serde(default = "default_command_buffer_size")]
    pub command_buffer_size: usize,

    /// Pin shard threads to CPU cores (Linux only)
    #[serde(default)]
    pub pin_to_cores: bool,
}

fn default_command_buffer_size() -> usize {
    10_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            num_shards: 0,
            hot_assets: Vec::new(),
            command_buffer_size: default_command_buffer_size(),
            pin_to_cores: false,
        }
    }
}

impl EngineConfig {
    /// Convert to the shard manager's runtime configuration
    pub fn to_manager_config(&self) -> ShardManagerConfig {
        let mut config = ShardManagerConfig::default()
            .with_hot_assets(self.hot_assets.iter().cloned())
            .with_core_pinning(self.pin_to_cores);
        if self.num_shards > 0 {
            config = config.with_num_shards(self.num_shards);
        }
        config.command_buffer_size = self.command_buffer_size;
        config
    }
}

/// Settlement retry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_attempt_timeout_ms() -> u64 {
    1_000
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
            initial_backoff_ms: default_initial_backoff_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl SettlementConfig {
    pub fn to_policy(&self) -> SettlementPolicy {
        SettlementPolicy {
            max_attempts: self.max_attempts,
            attempt_timeout_ms: self.attempt_timeout_ms,
            initial_backoff_ms: self.initial_backoff_ms,
            backoff_multiplier: self.backoff_multiplier,
        }
    }
}

/// Simulated ledger tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Base confirmation latency in milliseconds
    #[serde(default = "default_base_latency_ms")]
    pub base_latency_ms: u64,

    /// Standard deviation of latency jitter in milliseconds. 0 disables jitter.
    #[serde(default)]
    pub jitter_std_dev_ms: f64,
}

fn default_base_latency_ms() -> u64 {
    20
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_latency_ms: default_base_latency_ms(),
            jitter_std_dev_ms: 0.0,
        }
    }
}

fn default_decimals() -> u32 {
    crate::domain::entities::DEFAULT_DECIMALS
}

/// Tokenized property listed at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Asset identifier, e.g. "BRK-TOWER-A"
    pub id: String,

    /// Human-readable property name
    pub name: String,

    /// Total token supply, minted to the issuer
    pub total_tokens: Quantity,

    /// Token divisibility (fractional digits), ERC-20 style
    #[serde(default = "default_decimals")]
    pub decimals: u32,

    /// Issuer wallet address
    pub issuer: String,
}

impl AssetConfig {
    /// Convert to a domain asset
    pub fn to_asset(&self) -> Result<Asset, ConfigError> {
        let id = AssetId::new(&self.id)
            .map_err(|e| ConfigError::InvalidAsset(format!("{}: {}", self.id, e)))?;
        let issuer = Address::new(&self.issuer)
            .map_err(|e| ConfigError::InvalidAsset(format!("{}: {}", self.id, e)))?;
        if !self.total_tokens.is_positive() {
            return Err(ConfigError::InvalidAsset(format!(
                "{}: total_tokens must be positive",
                self.id
            )));
        }
        Ok(Asset::new(id, &self.name, self.total_tokens, issuer).with_decimals(self.decimals))
    }
}

/// Participant registered at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantConfig {
    /// Wallet address
    pub address: String,

    /// Verification state, e.g. "VERIFIED"
    #[serde(default)]
    pub status: KycStatus,
}

impl ParticipantConfig {
    pub fn to_address(&self) -> Result<Address, ConfigError> {
        Address::new(&self.address)
            .map_err(|e| ConfigError::InvalidParticipant(format!("{}: {}", self.address, e)))
    }
}

/// Token balance granted at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingConfig {
    pub asset: String,

    pub holder: String,

    pub quantity: Quantity,
}

impl HoldingConfig {
    pub fn to_parts(&self) -> Result<(AssetId, Address, Quantity), ConfigError> {
        let asset = AssetId::new(&self.asset)
            .map_err(|e| ConfigError::InvalidHolding(format!("{}: {}", self.asset, e)))?;
        let holder = Address::new(&self.holder)
            .map_err(|e| ConfigError::InvalidHolding(format!("{}: {}", self.holder, e)))?;
        if !self.quantity.is_positive() {
            return Err(ConfigError::InvalidHolding(format!(
                "{}/{}: quantity must be positive",
                self.asset, self.holder
            )));
        }
        Ok((asset, holder, self.quantity))
    }
}

/// Order resting on the books at startup. Submitted through the normal
/// validation and matching path, so the owner must be a verified
/// participant and crossing seed orders will trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedOrderConfig {
    pub asset: String,

    pub owner: String,

    /// "BUY" or "SELL"
    pub side: Side,

    pub price: Price,

    pub quantity: Quantity,
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// File I/O error
    Io { path: String, error: String },
    /// JSON parsing error
    Parse(String),
    /// Invalid asset configuration
    InvalidAsset(String),
    /// Invalid participant configuration
    InvalidParticipant(String),
    /// Invalid holding configuration
    InvalidHolding(String),
    /// Invalid seed order configuration
    InvalidSeedOrder(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, error } => {
                write!(f, "Failed to read config file '{}': {}", path, error)
            }
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::InvalidAsset(e) => write!(f, "Invalid asset config: {}", e),
            ConfigError::InvalidParticipant(e) => write!(f, "Invalid participant config: {}", e),
            ConfigError::InvalidHolding(e) => write!(f, "Invalid holding config: {}", e),
            ConfigError::InvalidSeedOrder(e) => write!(f, "Invalid seed order config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
