//! Block explorer links

use crate::config::Network;
use crate::tx_builder::AssetId;
use serde::{Deserialize, Serialize};

/// URL prefixes of a block explorer; the id is appended verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerLinks {
    pub account_url: String,
    pub asset_url: String,
    pub tx_url: String,
}

impl ExplorerLinks {
    pub fn for_network(network: Network) -> Self {
        let base = match network {
            Network::MainNet => "https://allo.info",
            Network::TestNet => "https://testnet.allo.info",
        };
        Self {
            account_url: format!("{}/account/", base),
            asset_url: format!("{}/asset/", base),
            tx_url: format!("{}/tx/", base),
        }
    }

    pub fn account(&self, address: &str) -> String {
        format!("{}{}", self.account_url, address)
    }

    pub fn asset(&self, asset_id: AssetId) -> String {
        format!("{}{}", self.asset_url, asset_id)
    }

    pub fn transaction(&self, txid: &str) -> String {
        format!("{}{}", self.tx_url, txid)
    }
}
