//! Ledger node (algod) client

use crate::config::ClientConfig;
use crate::metrics::metrics;
use crate::rpc::http::HttpEndpoint;
use crate::rpc::models::{AssetModel, NodeAccount, TransactionParamsResponse};
use crate::rpc::rpc_errors::RpcError;
use crate::rpc::{decode_body, take_key, LedgerNode};
use crate::tx_builder::{AssetId, SuggestedParams};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::time::Duration;

const SUBMIT_CONTENT_TYPE: &str = "application/x-binary";

#[derive(Debug, Clone)]
pub struct NodeClient {
    endpoint: HttpEndpoint,
}

impl NodeClient {
    pub fn new(endpoint: HttpEndpoint) -> Self {
        Self { endpoint }
    }

    pub fn connect(url: &str, token: Option<String>, timeout: Duration) -> Result<Self, RpcError> {
        Ok(Self::new(HttpEndpoint::new(url, token, timeout)?))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, RpcError> {
        Self::connect(&config.node_url(), config.node.token.clone(), config.timeout())
    }

    pub fn endpoint(&self) -> &HttpEndpoint {
        &self.endpoint
    }

    /// Account snapshot including holdings and minimum balance
    pub async fn account(&self, address: &str) -> Result<NodeAccount, RpcError> {
        metrics().record_query("node");
        let path = format!("/v2/accounts/{}", address);
        let body = self.endpoint.get_json(&path, &[]).await?;
        decode_body(body, &self.endpoint.url(&path))
    }

    /// Current asset parameters; `None` if the response carries no `params`
    pub async fn asset(&self, asset_id: AssetId) -> Result<Option<AssetModel>, RpcError> {
        metrics().record_query("node");
        let path = format!("/v2/assets/{}", asset_id);
        let body = self.endpoint.get_json(&path, &[]).await?;
        if body.get("params").is_none() {
            return Ok(None);
        }
        decode_body(body, &self.endpoint.url(&path)).map(Some)
    }

    /// Raw fee parameters, before conversion to [`SuggestedParams`]
    pub async fn transaction_params(&self) -> Result<Option<TransactionParamsResponse>, RpcError> {
        metrics().record_query("node");
        let path = "/v2/transactions/params";
        let body = self.endpoint.get_json(path, &[]).await?;
        if body.get("genesis-hash").is_none() {
            return Ok(None);
        }
        decode_body(body, &self.endpoint.url(path)).map(Some)
    }
}

fn decode_genesis_hash(encoded: &str, endpoint: &str) -> Result<[u8; 32], RpcError> {
    let bytes = BASE64.decode(encoded).map_err(|e| RpcError::Decode {
        endpoint: endpoint.to_string(),
        message: format!("genesis-hash is not base64: {}", e),
    })?;
    <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| RpcError::Decode {
        endpoint: endpoint.to_string(),
        message: format!("genesis-hash must be 32 bytes, got {}", bytes.len()),
    })
}

#[async_trait]
impl LedgerNode for NodeClient {
    async fn suggested_params(&self) -> Result<SuggestedParams, RpcError> {
        let endpoint = self.endpoint.url("/v2/transactions/params");
        // Building without a genesis hash cannot produce a valid transaction
        let raw = self.transaction_params().await?.ok_or_else(|| RpcError::Decode {
            endpoint: endpoint.clone(),
            message: "response has no genesis-hash".to_string(),
        })?;
        let genesis_hash = decode_genesis_hash(&raw.genesis_hash, &endpoint)?;

        let mut params =
            SuggestedParams::from_round(raw.last_round, raw.min_fee, raw.genesis_id, genesis_hash);
        params.consensus_version = raw.consensus_version;
        Ok(params)
    }

    async fn broadcast(&self, body: Vec<u8>) -> Result<String, RpcError> {
        let path = "/v2/transactions";
        let response = self
            .endpoint
            .post_bytes(path, SUBMIT_CONTENT_TYPE, body)
            .await?;
        take_key::<String>(response, "txId", &self.endpoint.url(path))?.ok_or_else(|| {
            RpcError::Decode {
                endpoint: self.endpoint.url(path),
                message: "response has no txId".to_string(),
            }
        })
    }
}
