//! REST clients for the ledger node, the indexer and market data services
//!
//! Each client performs one awaited request per call and never retries.
//! Non-success statuses become [`RpcError::Remote`] with the service's
//! message unmodified. Indexer lookups return `Ok(None)` when a success
//! response lacks its top-level key; the query layer decides what to do
//! with that.

pub mod http;
pub mod indexer;
pub mod market;
pub mod models;
pub mod node;
pub mod rpc_errors;

pub use http::HttpEndpoint;
pub use indexer::IndexerClient;
pub use market::{MarketClient, MarketData};
pub use node::NodeClient;
pub use rpc_errors::RpcError;

use crate::tx_builder::SuggestedParams;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// The write-side contract of a ledger node
///
/// [`crate::tx_builder::TxService`] only needs these two calls, which keeps
/// it testable against an in-memory node.
#[async_trait]
pub trait LedgerNode: Send + Sync {
    /// Current fee and validity parameters
    async fn suggested_params(&self) -> Result<SuggestedParams, RpcError>;

    /// Submit concatenated signed encodings; returns the id the node reports
    async fn broadcast(&self, body: Vec<u8>) -> Result<String, RpcError>;
}

/// Pull `key` out of a response body, `None` if absent or null
pub(crate) fn take_key<T: DeserializeOwned>(
    mut body: Value,
    key: &str,
    endpoint: &str,
) -> Result<Option<T>, RpcError> {
    match body.get_mut(key).map(Value::take) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| RpcError::Decode {
                endpoint: endpoint.to_string(),
                message: format!("field {:?}: {}", key, e),
            }),
    }
}

/// Decode a flat response body
pub(crate) fn decode_body<T: DeserializeOwned + Default>(
    body: Value,
    endpoint: &str,
) -> Result<T, RpcError> {
    if body.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(body).map_err(|e| RpcError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_take_key_missing_or_null() {
        let missing: Option<u64> = take_key(json!({"other": 1}), "asset", "e").unwrap();
        assert!(missing.is_none());
        let null: Option<u64> = take_key(json!({"asset": null}), "asset", "e").unwrap();
        assert!(null.is_none());
        let present: Option<u64> = take_key(json!({"asset": 3}), "asset", "e").unwrap();
        assert_eq!(present, Some(3));
    }

    #[test]
    fn test_take_key_wrong_shape_is_decode_error() {
        let err = take_key::<u64>(json!({"asset": "x"}), "asset", "e").unwrap_err();
        assert_eq!(err.category(), "decode");
    }
}
