//! Network-wide figures: the current transaction fee

use crate::amount::Amount;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::query::shape_default;
use crate::rpc::NodeClient;
use crate::structured_logging::StructuredLogger;

/// Network-wide figures from the node
#[derive(Debug, Clone)]
pub struct NetworkQuery {
    node: NodeClient,
    logger: StructuredLogger,
}

impl NetworkQuery {
    pub fn new(node: NodeClient) -> Self {
        Self {
            node,
            logger: StructuredLogger::default(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(NodeClient::from_config(config)?))
    }

    /// Fee a single transaction pays right now: the larger of the suggested
    /// per-byte fee and the minimum fee
    pub async fn network_fee(&self) -> Result<Amount> {
        match self.node.transaction_params().await? {
            Some(params) => Ok(Amount::native(params.fee.max(params.min_fee))),
            None => Ok(shape_default(
                &self.logger,
                &self.node.endpoint().url("/v2/transactions/params"),
                "genesis-hash",
            )),
        }
    }
}
