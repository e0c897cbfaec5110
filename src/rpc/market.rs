//! Best-effort market data: price, supply and verified description
//!
//! Market services are third parties outside the ledger. Any failure here
//! (unreachable host, error status, unexpected body) degrades to a default
//! value with a WARN log; it never fails the surrounding query.

use crate::amount::Amount;
use crate::config::MarketConfig;
use crate::metrics::metrics;
use crate::rpc::http::HttpEndpoint;
use crate::rpc::rpc_errors::RpcError;
use crate::tx_builder::AssetId;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// Market figures for one asset; zero or empty when unknown
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketData {
    pub price_usd: f64,
    pub circulating_supply: Option<Amount>,
    pub burned_supply: Option<Amount>,
    pub description: String,
}

impl MarketData {
    /// Circulating supply times price, zero when either is unknown
    pub fn market_cap(&self) -> f64 {
        self.circulating_supply
            .map(|supply| supply.to_f64() * self.price_usd)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone)]
pub struct MarketClient {
    price: HttpEndpoint,
    explorer: Option<HttpEndpoint>,
}

/// Accept both `123` and `"123"`
fn lenient_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl MarketClient {
    pub fn new(price: HttpEndpoint, explorer: Option<HttpEndpoint>) -> Self {
        Self { price, explorer }
    }

    pub fn from_config(config: &MarketConfig, timeout: Duration) -> Result<Self, RpcError> {
        let price = HttpEndpoint::new(&config.price_url, None, timeout)?;
        let explorer = config
            .explorer_indexer_url
            .as_deref()
            .map(|url| HttpEndpoint::new(url, None, timeout))
            .transpose()?;
        Ok(Self::new(price, explorer))
    }

    async fn fetch(&self, endpoint: &HttpEndpoint, path: &str, query: &[(&str, String)]) -> Option<Value> {
        metrics().record_query("market");
        match endpoint.get_json(path, query).await {
            Ok(body) => Some(body),
            Err(e) => {
                metrics().market_fallbacks.inc();
                warn!(endpoint = %endpoint.url(path), error = %e, "Market lookup failed, using defaults");
                None
            }
        }
    }

    /// USD price, zero when unknown
    pub async fn price_usd(&self, asset_id: AssetId) -> f64 {
        self.fetch(&self.price, &format!("/asset/{}/price", asset_id), &[])
            .await
            .and_then(|body| body.get("USD").and_then(lenient_f64))
            .unwrap_or(0.0)
    }

    /// Circulating and burned supply, each `None` when not reported
    pub async fn supply(&self, asset_id: AssetId) -> (Option<Amount>, Option<Amount>) {
        let Some(body) = self.fetch(&self.price, &format!("/asset/{}", asset_id), &[]).await else {
            return (None, None);
        };
        let decimals = body.get("decimals").and_then(lenient_u64).unwrap_or(0);
        let read = |key: &str| {
            body.get(key)
                .and_then(lenient_u64)
                .map(|raw| Amount::lenient(raw, decimals))
        };
        (read("circulating_supply"), read("burned_supply"))
    }

    /// Verified description from the explorer indexer, empty when unavailable
    pub async fn description(&self, asset_id: AssetId) -> String {
        let Some(explorer) = &self.explorer else {
            return String::new();
        };
        let query = [("include-all", "true".to_string())];
        self.fetch(explorer, &format!("/v2/assets/{}", asset_id), &query)
            .await
            .and_then(|body| {
                body.pointer("/asset/verification/description")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_default()
    }

    /// All market figures for an asset
    pub async fn market_data(&self, asset_id: AssetId) -> MarketData {
        let price_usd = self.price_usd(asset_id).await;
        let (circulating_supply, burned_supply) = self.supply(asset_id).await;
        let description = self.description(asset_id).await;
        MarketData {
            price_usd,
            circulating_supply,
            burned_supply,
            description,
        }
    }
}
