//! Indexer client: historical and search queries

use crate::config::ClientConfig;
use crate::metrics::metrics;
use crate::rpc::http::HttpEndpoint;
use crate::rpc::models::{AssetModel, BalanceEntry, BlockModel, IndexerAccount, IndexerTransaction};
use crate::rpc::rpc_errors::RpcError;
use crate::rpc::{decode_body, take_key};
use crate::tx_builder::AssetId;
use std::time::Duration;

/// Filters for transaction searches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub address: Option<String>,
    /// `pay`, `axfer`, `acfg`, `afrz`
    pub tx_type: Option<&'static str>,
    pub limit: Option<u64>,
}

impl TransactionFilter {
    pub fn for_address(address: &str) -> Self {
        Self {
            address: Some(address.to_string()),
            ..Self::default()
        }
    }

    pub fn tx_type(mut self, tx_type: &'static str) -> Self {
        self.tx_type = Some(tx_type);
        self
    }

    pub fn limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(address) = &self.address {
            query.push(("address", address.clone()));
        }
        if let Some(tx_type) = self.tx_type {
            query.push(("tx-type", tx_type.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone)]
pub struct IndexerClient {
    endpoint: HttpEndpoint,
}

impl IndexerClient {
    pub fn new(endpoint: HttpEndpoint) -> Self {
        Self { endpoint }
    }

    pub fn connect(url: &str, token: Option<String>, timeout: Duration) -> Result<Self, RpcError> {
        Ok(Self::new(HttpEndpoint::new(url, token, timeout)?))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, RpcError> {
        Self::connect(
            &config.indexer_url(),
            config.indexer.token.clone(),
            config.timeout(),
        )
    }

    pub fn endpoint(&self) -> &HttpEndpoint {
        &self.endpoint
    }

    async fn get_key<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        key: &str,
    ) -> Result<Option<T>, RpcError> {
        metrics().record_query("indexer");
        let body = self.endpoint.get_json(path, query).await?;
        take_key(body, key, &self.endpoint.url(path))
    }

    pub async fn account(&self, address: &str) -> Result<Option<IndexerAccount>, RpcError> {
        self.get_key(&format!("/v2/accounts/{}", address), &[], "account")
            .await
    }

    pub async fn asset(&self, asset_id: AssetId) -> Result<Option<AssetModel>, RpcError> {
        self.get_key(&format!("/v2/assets/{}", asset_id), &[], "asset")
            .await
    }

    /// Holders of an asset, optionally bounded by balance (exclusive bounds)
    pub async fn asset_balances(
        &self,
        asset_id: AssetId,
        greater_than: Option<u64>,
        less_than: Option<u64>,
    ) -> Result<Option<Vec<BalanceEntry>>, RpcError> {
        let mut query = Vec::new();
        if let Some(min) = greater_than {
            query.push(("currency-greater-than", min.to_string()));
        }
        if let Some(max) = less_than {
            query.push(("currency-less-than", max.to_string()));
        }
        self.get_key(&format!("/v2/assets/{}/balances", asset_id), &query, "balances")
            .await
    }

    /// Transactions involving one asset
    pub async fn asset_transactions(
        &self,
        asset_id: AssetId,
        filter: &TransactionFilter,
    ) -> Result<Option<Vec<IndexerTransaction>>, RpcError> {
        self.get_key(
            &format!("/v2/assets/{}/transactions", asset_id),
            &filter.to_query(),
            "transactions",
        )
        .await
    }

    pub async fn search_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Option<Vec<IndexerTransaction>>, RpcError> {
        self.get_key("/v2/transactions", &filter.to_query(), "transactions")
            .await
    }

    pub async fn transaction(&self, txid: &str) -> Result<Option<IndexerTransaction>, RpcError> {
        self.get_key(&format!("/v2/transactions/{}", txid), &[], "transaction")
            .await
    }

    pub async fn block(&self, round: u64) -> Result<BlockModel, RpcError> {
        metrics().record_query("indexer");
        let path = format!("/v2/blocks/{}", round);
        let body = self.endpoint.get_json(&path, &[]).await?;
        decode_body(body, &self.endpoint.url(&path))
    }
}
