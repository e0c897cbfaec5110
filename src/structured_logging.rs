//! Structured logging and request correlation

use anyhow::anyhow;
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Correlation ID tying together the log lines of one build-and-submit
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CorrelationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Structured logger for transaction and query events
#[derive(Debug, Clone, Default)]
pub struct StructuredLogger {
    context_id: CorrelationId,
}

impl StructuredLogger {
    pub fn new(context_id: CorrelationId) -> Self {
        Self { context_id }
    }

    pub fn context_id(&self) -> &CorrelationId {
        &self.context_id
    }

    pub fn log_build(&self, operation: &str, tx_count: usize, grouped: bool) {
        tracing::debug!(
            context_id = %self.context_id,
            operation = %operation,
            tx_count = %tx_count,
            grouped = %grouped,
            "Transaction built"
        );
    }

    pub fn log_submit_attempt(&self, sender: &str, tx_count: usize) {
        tracing::info!(
            context_id = %self.context_id,
            sender = %sender,
            tx_count = %tx_count,
            "Submitting transactions"
        );
    }

    pub fn log_submit_success(&self, txid: &str, latency_ms: u64) {
        tracing::info!(
            context_id = %self.context_id,
            txid = %txid,
            latency_ms = %latency_ms,
            "Submission accepted"
        );
    }

    pub fn log_submit_failure(&self, error: &str, latency_ms: u64) {
        tracing::warn!(
            context_id = %self.context_id,
            error = %error,
            latency_ms = %latency_ms,
            "Submission failed"
        );
    }

    /// A response lacked its top-level key and a default record was returned
    pub fn log_shape_default(&self, endpoint: &str, missing_key: &str, record: &str) {
        tracing::warn!(
            context_id = %self.context_id,
            endpoint = %endpoint,
            missing_key = %missing_key,
            record = %record,
            "Response missing expected key, returning default record"
        );
    }
}

/// Install a global `tracing` subscriber
///
/// `RUST_LOG` takes precedence over the verbosity flag. Returns an error if a
/// subscriber is already installed.
pub fn init_tracing(verbose: bool, json: bool) -> anyhow::Result<()> {
    let default_filter = if verbose {
        "asa_client=debug,info"
    } else {
        "asa_client=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };
    result.map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))
}
