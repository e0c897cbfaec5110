//! Client configuration
//!
//! Loaded from TOML, optionally preceded by a `.env` file, with `ASA_*`
//! environment variables taking precedence over file values. Unset
//! endpoint URLs fall back to the public endpoints of the chosen network.

use crate::explorer::ExplorerLinks;
use crate::tx_builder::MIN_TXN_FEE;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public network selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[serde(alias = "main")]
    MainNet,
    #[default]
    #[serde(alias = "test")]
    TestNet,
}

impl Network {
    pub fn default_node_url(&self) -> &'static str {
        match self {
            Network::MainNet => "https://mainnet-api.algonode.cloud",
            Network::TestNet => "https://testnet-api.algonode.cloud",
        }
    }

    pub fn default_indexer_url(&self) -> &'static str {
        match self {
            Network::MainNet => "https://mainnet-idx.algonode.cloud",
            Network::TestNet => "https://testnet-idx.algonode.cloud",
        }
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::MainNet),
            "testnet" | "test" => Ok(Network::TestNet),
            other => Err(format!("unknown network {:?}", other)),
        }
    }
}

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub network: Network,

    /// Node endpoint; URL defaults to the network's public node
    #[serde(default)]
    pub node: EndpointConfig,

    /// Indexer endpoint; URL defaults to the network's public indexer
    #[serde(default)]
    pub indexer: EndpointConfig,

    #[serde(default)]
    pub market: MarketConfig,

    /// Explorer link prefixes; defaults follow the network
    #[serde(default)]
    pub explorer: Option<ExplorerLinks>,

    #[serde(default)]
    pub fees: FeeConfig,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct EndpointConfig {
    pub url: Option<String>,
    /// Sent as `X-Algo-API-Token` when set
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarketConfig {
    #[serde(default = "default_price_url")]
    pub price_url: String,

    /// Explorer indexer serving verified descriptions; lookups are skipped when unset
    #[serde(default)]
    pub explorer_indexer_url: Option<String>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            price_url: default_price_url(),
            explorer_indexer_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeeConfig {
    /// Flat fee per transaction in micro-units
    #[serde(default = "default_flat_fee")]
    pub flat_fee: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            flat_fee: default_flat_fee(),
        }
    }
}

// Default value functions
fn default_timeout_secs() -> u64 {
    10
}

fn default_price_url() -> String {
    "https://free-api.vestige.fi".to_string()
}

fn default_flat_fee() -> u64 {
    MIN_TXN_FEE
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_network(Network::default())
    }
}

impl ClientConfig {
    /// Defaults for a network, no file involved
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            node: EndpointConfig::default(),
            indexer: EndpointConfig::default(),
            market: MarketConfig::default(),
            explorer: None,
            fees: FeeConfig::default(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: ClientConfig =
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` and `ASA_*` environment overrides
    pub fn from_file_with_env(path: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::from_file(path)?;
        config.apply_overrides_from(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ASA_*` overrides from any key lookup (the process environment in practice)
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(network) = lookup("ASA_NETWORK") {
            self.network = network.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(url) = lookup("ASA_NODE_URL") {
            self.node.url = Some(url);
        }
        if let Some(token) = lookup("ASA_NODE_TOKEN") {
            self.node.token = Some(token);
        }
        if let Some(url) = lookup("ASA_INDEXER_URL") {
            self.indexer.url = Some(url);
        }
        if let Some(token) = lookup("ASA_INDEXER_TOKEN") {
            self.indexer.token = Some(token);
        }
        if let Some(fee) = lookup("ASA_FLAT_FEE") {
            self.fees.flat_fee = fee
                .trim()
                .parse()
                .with_context(|| format!("ASA_FLAT_FEE is not an integer: {:?}", fee))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.fees.flat_fee < MIN_TXN_FEE {
            bail!(
                "fees.flat_fee {} is below the minimum of {}",
                self.fees.flat_fee,
                MIN_TXN_FEE
            );
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be positive");
        }
        Ok(())
    }

    pub fn node_url(&self) -> String {
        self.node
            .url
            .clone()
            .unwrap_or_else(|| self.network.default_node_url().to_string())
    }

    pub fn indexer_url(&self) -> String {
        self.indexer
            .url
            .clone()
            .unwrap_or_else(|| self.network.default_indexer_url().to_string())
    }

    pub fn explorer(&self) -> ExplorerLinks {
        self.explorer
            .clone()
            .unwrap_or_else(|| ExplorerLinks::for_network(self.network))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}
