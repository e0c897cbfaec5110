//! Thin JSON-over-HTTP endpoint shared by the node, indexer and market clients

use crate::metrics::{metrics, Timer};
use crate::rpc::rpc_errors::RpcError;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Header carrying the API token for node and indexer services
pub const API_TOKEN_HEADER: &str = "X-Algo-API-Token";

/// One REST service at a fixed base URL
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl HttpEndpoint {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, RpcError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(RpcError::Configuration(format!(
                "endpoint URL must start with http:// or https://, got {:?}",
                base_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Configuration(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url,
            token: token.filter(|t| !t.is_empty()),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    fn with_token(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header(API_TOKEN_HEADER, token),
            None => request,
        }
    }

    /// GET `path` and return the JSON body of a success response
    pub async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, RpcError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let request = self.with_token(self.client.get(&url).query(query));
        self.execute(&url, request).await
    }

    /// POST raw bytes and return the JSON body of a success response
    pub async fn post_bytes(
        &self,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<Value, RpcError> {
        let url = self.url(path);
        debug!(url = %url, bytes = body.len(), "POST");
        let request = self.with_token(
            self.client
                .post(&url)
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(body),
        );
        self.execute(&url, request).await
    }

    async fn execute(&self, url: &str, request: reqwest::RequestBuilder) -> Result<Value, RpcError> {
        let timer = Timer::new();
        let response = request
            .send()
            .await
            .map_err(|e| RpcError::from_reqwest(e, url, self.timeout_ms()));
        timer.observe_duration(&metrics().rpc_latency);
        let response = response?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RpcError::from_reqwest(e, url, self.timeout_ms()))?;

        if !status.is_success() {
            return Err(RpcError::remote(url, status.as_u16(), &body));
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| RpcError::Decode {
            endpoint: url.to_string(),
            message: e.to_string(),
        })
    }
}
