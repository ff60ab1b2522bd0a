//! # Node Configuration
//!
//! One [`ChainConfig`] per chain plus the relayer and watcher settings.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in two-chain default
//! 2. TOML file named by `ON_CONFIG`
//! 3. `ON_RECONCILIATION_POLICY`, `ON_WATCH_INTERVAL_SECS`, `ON_RELAY_INTERVAL_MS`
//!
//! Addresses are written as `0x`-prefixed hex strings. Amounts are in the
//! chain's smallest unit and limited to `u64`, the TOML integer range.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use on_01_domain_registry::{RegistryConfig, SECONDS_PER_YEAR};
use on_02_cross_chain_transfer::{CrossChainConfig, PeerChain, DEFAULT_ON_REVERT_GAS_LIMIT};
use on_03_marketplace::{MarketplaceConfig, BPS_DENOMINATOR, DEFAULT_CUT_BPS};
use on_04_reconciliation::{ReconciliationPolicy, WatcherConfig};
use shared_types::{Address, Amount, ChainId};

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_ENV: &str = "ON_CONFIG";
/// Environment override for the watcher policy.
pub const POLICY_ENV: &str = "ON_RECONCILIATION_POLICY";
/// Environment override for the watcher sweep interval.
pub const WATCH_INTERVAL_ENV: &str = "ON_WATCH_INTERVAL_SECS";
/// Environment override for the relayer interval.
pub const RELAY_INTERVAL_ENV: &str = "ON_RELAY_INTERVAL_MS";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`NodeConfig`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Environment override has an unusable value.
    #[error("Invalid value for {var}: '{value}'")]
    InvalidOverride {
        /// Variable name.
        var: &'static str,
        /// Rejected value.
        value: String,
    },

    /// Config is well-formed but unusable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Gateway relayer settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayerConfig {
    /// Deliver queued gateway messages automatically.
    pub enabled: bool,
    /// Milliseconds between delivery rounds.
    pub relay_interval_ms: u64,
}

impl Default for RelayerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            relay_interval_ms: 500,
        }
    }
}

/// Settings for one chain's registry, transfer contract and marketplace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain id.
    pub chain_id: ChainId,
    /// Registry admin (links marketplace and transfer agent, sweeps fees).
    #[serde(with = "hex_address")]
    pub admin: Address,
    /// Transfer contract; the registry's transfer agent.
    #[serde(with = "hex_address")]
    pub transfer_contract: Address,
    /// Marketplace account; the registry's operator.
    #[serde(with = "hex_address")]
    pub marketplace: Address,
    /// Marketplace treasury owner.
    #[serde(with = "hex_address")]
    pub marketplace_owner: Address,
    /// Suffix stripped from names.
    #[serde(default = "default_tld")]
    pub tld: String,
    /// Registration fee.
    pub registration_fee: u64,
    /// Renewal fee.
    pub renewal_fee: u64,
    /// Omnichain upgrade fee.
    #[serde(default)]
    pub omnichain_upgrade_fee: u64,
    /// Registration period.
    #[serde(default = "default_period")]
    pub registration_period_secs: u64,
    /// Minimum destination gas attached to a cross-chain transfer.
    pub destination_gas_fee: u64,
    /// Listing fee.
    pub listing_fee: u64,
    /// Marketplace cut in basis points.
    #[serde(default = "default_cut")]
    pub marketplace_cut_bps: u16,
}

fn default_tld() -> String {
    "omni".to_string()
}

fn default_period() -> u64 {
    SECONDS_PER_YEAR
}

fn default_cut() -> u16 {
    DEFAULT_CUT_BPS
}

impl ChainConfig {
    /// Local development chain. `index` keeps the accounts of several
    /// development chains apart.
    pub fn development(chain_id: ChainId, index: u8) -> Self {
        Self {
            chain_id,
            admin: Address::repeat(0xA0 + index),
            transfer_contract: Address::repeat(0xC0 + index),
            marketplace: Address::repeat(0x10 + index),
            marketplace_owner: Address::repeat(0xE0 + index),
            tld: default_tld(),
            registration_fee: 1_000_000_000_000_000,
            renewal_fee: 1_000_000_000_000_000,
            omnichain_upgrade_fee: 0,
            registration_period_secs: SECONDS_PER_YEAR,
            destination_gas_fee: 10_000_000_000_000_000,
            listing_fee: 1_000_000_000_000_000,
            marketplace_cut_bps: DEFAULT_CUT_BPS,
        }
    }

    /// Registry settings.
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            chain_id: self.chain_id,
            admin: self.admin,
            tld: self.tld.clone(),
            max_name_len: RegistryConfig::default().max_name_len,
            registration_fee: Amount::from(self.registration_fee),
            renewal_fee: Amount::from(self.renewal_fee),
            omnichain_upgrade_fee: Amount::from(self.omnichain_upgrade_fee),
            registration_period_secs: self.registration_period_secs,
        }
    }

    /// Transfer contract settings with `peers` as supported chains.
    pub fn transfer_config(&self, peers: Vec<PeerChain>) -> CrossChainConfig {
        CrossChainConfig {
            chain_id: self.chain_id,
            contract_address: self.transfer_contract,
            supported_chains: peers,
            destination_gas_fee: Amount::from(self.destination_gas_fee),
            on_revert_gas_limit: DEFAULT_ON_REVERT_GAS_LIMIT,
        }
    }

    /// Marketplace settings.
    pub fn marketplace_config(&self) -> MarketplaceConfig {
        MarketplaceConfig {
            address: self.marketplace,
            owner: self.marketplace_owner,
            listing_fee: Amount::from(self.listing_fee),
            marketplace_cut_bps: self.marketplace_cut_bps,
        }
    }
}

/// Complete node configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Chains hosted by this node. Every chain peers with every other.
    #[serde(rename = "chain")]
    pub chains: Vec<ChainConfig>,
    /// Gateway relayer.
    #[serde(default)]
    pub relayer: RelayerConfig,
    /// Reconciliation watcher.
    #[serde(default)]
    pub watcher: WatcherConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            chains: vec![
                ChainConfig::development(ChainId(7001), 1),
                ChainConfig::development(ChainId(11155111), 2),
            ],
            relayer: RelayerConfig::default(),
            watcher: WatcherConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Parse a TOML document.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&source)
    }

    /// Load from `ON_CONFIG` (or the default), apply environment overrides
    /// and validate.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(POLICY_ENV) {
            self.watcher.policy = value
                .parse::<ReconciliationPolicy>()
                .map_err(|_| ConfigError::InvalidOverride {
                    var: POLICY_ENV,
                    value,
                })?;
        }
        if let Some(value) = lookup(WATCH_INTERVAL_ENV) {
            self.watcher.interval_secs = parse_positive(WATCH_INTERVAL_ENV, value)?;
        }
        if let Some(value) = lookup(RELAY_INTERVAL_ENV) {
            self.relayer.relay_interval_ms = parse_positive(RELAY_INTERVAL_ENV, value)?;
        }
        Ok(())
    }

    /// Reject configurations the runtime cannot wire.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chains.is_empty() {
            return Err(ConfigError::Invalid("at least one chain is required".into()));
        }
        let mut ids = HashSet::new();
        for chain in &self.chains {
            if !ids.insert(chain.chain_id) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate chain id {}",
                    chain.chain_id
                )));
            }
            for (field, address) in [
                ("admin", chain.admin),
                ("transfer_contract", chain.transfer_contract),
                ("marketplace", chain.marketplace),
                ("marketplace_owner", chain.marketplace_owner),
            ] {
                if address.is_zero() {
                    return Err(ConfigError::Invalid(format!(
                        "chain {}: {} must not be the zero address",
                        chain.chain_id, field
                    )));
                }
            }
            if chain.marketplace_cut_bps > BPS_DENOMINATOR {
                return Err(ConfigError::Invalid(format!(
                    "chain {}: marketplace_cut_bps above {}",
                    chain.chain_id, BPS_DENOMINATOR
                )));
            }
        }
        if self.watcher.interval_secs == 0 || self.relayer.relay_interval_ms == 0 {
            return Err(ConfigError::Invalid("intervals must be positive".into()));
        }
        Ok(())
    }

    /// Peers of `chain`: every other configured chain.
    pub fn peers_of(&self, chain: ChainId) -> Vec<PeerChain> {
        self.chains
            .iter()
            .filter(|c| c.chain_id != chain)
            .map(|c| PeerChain {
                chain_id: c.chain_id,
                contract_address: c.transfer_contract,
            })
            .collect()
    }
}

fn parse_positive(var: &'static str, value: String) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidOverride { var, value }),
    }
}

mod hex_address {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use shared_types::Address;

    pub fn serialize<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(address)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
