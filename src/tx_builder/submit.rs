//! Write-side service: build, sign and submit
//!
//! [`TxService`] owns the cached network parameters and a node handle. It is
//! the only stateful piece of the crate; read-only lookups live in
//! [`crate::query`].

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::explorer::ExplorerLinks;
use crate::metrics::{metrics, Timer};
use crate::rpc::{LedgerNode, NodeClient};
use crate::structured_logging::{CorrelationId, StructuredLogger};
use crate::tx_builder::builder::TxBuilder;
use crate::tx_builder::output::TxBuildOutput;
use crate::tx_builder::params::SuggestedParams;
use crate::tx_builder::transaction::GroupId;
use crate::tx_builder::TransactionBuilderError;
use crate::wallet::{SignedTransaction, Wallet};
use serde::Serialize;

/// What the node accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitReceipt {
    /// Id reported by the node (the first member of a group)
    pub txid: String,
    /// Explorer link for `txid`
    pub link: String,
    pub group_id: Option<GroupId>,
}

/// Builds transactions against cached parameters and submits them
pub struct TxService<N: LedgerNode> {
    node: N,
    params: SuggestedParams,
    explorer: ExplorerLinks,
}

impl TxService<NodeClient> {
    /// Connect to the configured node and fetch initial parameters at the configured flat fee
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let node = NodeClient::from_config(config)?;
        let mut service = Self::new(node, config.explorer()).await?;
        service.set_flat_fee(config.fees.flat_fee)?;
        Ok(service)
    }
}

impl<N: LedgerNode> TxService<N> {
    /// Create with parameters fetched from `node`
    pub async fn new(node: N, explorer: ExplorerLinks) -> Result<Self> {
        let params = node.suggested_params().await?;
        Ok(Self::with_params(node, params, explorer))
    }

    /// Create with known parameters, no network call
    pub fn with_params(node: N, params: SuggestedParams, explorer: ExplorerLinks) -> Self {
        Self {
            node,
            params,
            explorer,
        }
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn params(&self) -> &SuggestedParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SuggestedParams) {
        self.params = params;
    }

    /// Change the flat fee used for subsequent builds
    pub fn set_flat_fee(&mut self, fee: u64) -> Result<()> {
        self.params = self.params.clone().with_flat_fee(fee)?;
        Ok(())
    }

    /// Re-fetch rounds and genesis data, keeping the current flat fee if still valid
    pub async fn refresh_params(&mut self) -> Result<()> {
        let fee = self.params.fee;
        let fresh = self.node.suggested_params().await?;
        self.params = if fee >= fresh.min_fee {
            fresh.with_flat_fee(fee)?
        } else {
            fresh
        };
        Ok(())
    }

    /// Builder over a snapshot of the cached parameters
    pub fn builder(&self) -> TxBuilder {
        TxBuilder::new(self.params.clone())
    }

    /// Sign every member with `wallet` and submit the set
    ///
    /// Every transaction must be sent by the wallet's account; a mismatch
    /// fails before anything reaches the network.
    pub async fn submit(&self, output: TxBuildOutput, wallet: &Wallet) -> Result<SubmitReceipt> {
        let group_id = output.group_id();
        let signed = wallet.sign_all(output)?;
        self.submit_signed_with_group(&signed, group_id).await
    }

    /// Submit already signed transactions in order
    pub async fn submit_signed(&self, signed: &[SignedTransaction]) -> Result<SubmitReceipt> {
        let group_id = signed.first().and_then(|s| s.transaction().group);
        self.submit_signed_with_group(signed, group_id).await
    }

    async fn submit_signed_with_group(
        &self,
        signed: &[SignedTransaction],
        group_id: Option<GroupId>,
    ) -> Result<SubmitReceipt> {
        let Some(first) = signed.first() else {
            return Err(TransactionBuilderError::group("nothing to submit").into());
        };
        let logger = StructuredLogger::new(CorrelationId::new());
        logger.log_submit_attempt(&first.transaction().sender.to_string(), signed.len());

        // Encoding failures are local and must not reach the node
        let mut body = Vec::new();
        for stx in signed {
            body.extend_from_slice(&stx.to_bytes()?);
        }

        let timer = Timer::new();
        match self.node.broadcast(body).await {
            Ok(txid) => {
                let latency_ms = (timer.elapsed_secs() * 1000.0) as u64;
                metrics().tx_submitted.inc();
                logger.log_submit_success(&txid, latency_ms);
                Ok(SubmitReceipt {
                    link: self.explorer.transaction(&txid),
                    txid,
                    group_id,
                })
            }
            Err(e) => {
                let latency_ms = (timer.elapsed_secs() * 1000.0) as u64;
                metrics().tx_rejected.inc();
                logger.log_submit_failure(&e.to_string(), latency_ms);
                Err(Error::Rpc(e))
            }
        }
    }
}
