use thiserror::Error;

/// Errors raised while talking to the node, indexer or market endpoints
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RpcError {
    /// Transport-level errors (network, connection, TLS)
    #[error("Transport error: {message} (endpoint: {endpoint})")]
    Transport { endpoint: String, message: String },

    /// Timeout errors
    #[error("Timeout after {timeout_ms}ms (endpoint: {endpoint})")]
    Timeout { endpoint: String, timeout_ms: u64 },

    /// The remote service answered with a non-success status
    ///
    /// `message` is the service's own explanation, unmodified.
    #[error("Remote error {status}: {message} (endpoint: {endpoint})")]
    Remote {
        endpoint: String,
        status: u16,
        message: String,
    },

    /// A success response whose body could not be decoded at all
    #[error("Decode error: {message} (endpoint: {endpoint})")]
    Decode { endpoint: String, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RpcError {
    /// Check if this error is retryable
    ///
    /// Nothing in this crate retries; the flag is for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            RpcError::Transport { .. } | RpcError::Timeout { .. } => true,
            RpcError::Remote { status, .. } => *status == 429 || (500..600).contains(status),
            RpcError::Decode { .. } | RpcError::Configuration(_) => false,
        }
    }

    /// HTTP status of a remote rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            RpcError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Get the endpoint associated with this error, if any
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            RpcError::Transport { endpoint, .. }
            | RpcError::Timeout { endpoint, .. }
            | RpcError::Remote { endpoint, .. }
            | RpcError::Decode { endpoint, .. } => Some(endpoint),
            RpcError::Configuration(_) => None,
        }
    }

    /// Get the error category for metrics and observability
    pub fn category(&self) -> &'static str {
        match self {
            RpcError::Transport { .. } => "transport",
            RpcError::Timeout { .. } => "timeout",
            RpcError::Remote { .. } => "remote",
            RpcError::Decode { .. } => "decode",
            RpcError::Configuration(_) => "config",
        }
    }

    /// Classify a reqwest failure
    pub fn from_reqwest(err: reqwest::Error, endpoint: &str, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            RpcError::Timeout {
                endpoint: endpoint.to_string(),
                timeout_ms,
            }
        } else if err.is_decode() {
            RpcError::Decode {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        } else if err.is_builder() {
            RpcError::Configuration(format!("{} ({})", err, endpoint))
        } else {
            RpcError::Transport {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// Build a remote error from a non-success response body
    ///
    /// Node and indexer errors are JSON objects with a `message` field; any
    /// other body is passed through as text.
    pub fn remote(endpoint: &str, status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());
        RpcError::Remote {
            endpoint: endpoint.to_string(),
            status,
            message,
        }
    }
}
