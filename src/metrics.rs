//! Metrics collection and export module

use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};
use std::time::Instant;

/// Global metrics registry
pub struct Metrics {
    registry: Registry,

    // Counters
    pub tx_built: IntCounter,
    pub tx_submitted: IntCounter,
    pub tx_rejected: IntCounter,
    pub queries_total: IntCounterVec,
    pub query_defaults: IntCounterVec,
    pub market_fallbacks: IntCounter,

    // Histograms
    pub rpc_latency: Histogram,
    pub build_latency: Histogram,
}

impl Metrics {
    /// Create new metrics instance
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let tx_built = IntCounter::with_opts(Opts::new(
            "tx_built_total",
            "Number of transactions built, fee legs included",
        ))?;

        let tx_submitted = IntCounter::with_opts(Opts::new(
            "tx_submitted_total",
            "Number of submissions accepted by the node",
        ))?;

        let tx_rejected = IntCounter::with_opts(Opts::new(
            "tx_rejected_total",
            "Number of submissions rejected by the node or transport",
        ))?;

        let queries_total = IntCounterVec::new(
            Opts::new("queries_total", "Read-only REST queries issued"),
            &["service"],
        )?;

        let query_defaults = IntCounterVec::new(
            Opts::new(
                "query_defaults_total",
                "Responses missing their top-level key, replaced by a default record",
            ),
            &["record"],
        )?;

        let market_fallbacks = IntCounter::with_opts(Opts::new(
            "market_fallbacks_total",
            "Market lookups that failed and fell back to defaults",
        ))?;

        let rpc_latency = Histogram::with_opts(
            HistogramOpts::new("rpc_latency_seconds", "REST call latency")
                .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        )?;

        let build_latency = Histogram::with_opts(
            HistogramOpts::new("build_latency_seconds", "Transaction build latency")
                .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]),
        )?;

        // Register all metrics
        registry.register(Box::new(tx_built.clone()))?;
        registry.register(Box::new(tx_submitted.clone()))?;
        registry.register(Box::new(tx_rejected.clone()))?;
        registry.register(Box::new(queries_total.clone()))?;
        registry.register(Box::new(query_defaults.clone()))?;
        registry.register(Box::new(market_fallbacks.clone()))?;
        registry.register(Box::new(rpc_latency.clone()))?;
        registry.register(Box::new(build_latency.clone()))?;

        Ok(Self {
            registry,
            tx_built,
            tx_submitted,
            tx_rejected,
            queries_total,
            query_defaults,
            market_fallbacks,
            rpc_latency,
            build_latency,
        })
    }

    /// Get the registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_query(&self, service: &str) {
        self.queries_total.with_label_values(&[service]).inc();
    }

    pub fn record_default(&self, record: &str) {
        self.query_defaults.with_label_values(&[record]).inc();
    }
}

/// Global metrics instance
pub fn metrics() -> &'static Metrics {
    static METRICS: once_cell::sync::Lazy<Metrics> =
        once_cell::sync::Lazy::new(|| Metrics::new().expect("Failed to initialize metrics"));
    &METRICS
}

/// Timer helper for measuring operation duration
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn observe_duration(&self, histogram: &Histogram) {
        histogram.observe(self.elapsed_secs());
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_register_and_export() {
        let m = Metrics::new().unwrap();
        m.record_query("account");
        m.record_default("AccountSummary");
        m.tx_built.inc();

        assert_eq!(m.queries_total.with_label_values(&["account"]).get(), 1);
        assert_eq!(
            m.query_defaults.with_label_values(&["AccountSummary"]).get(),
            1
        );
        assert_eq!(m.tx_built.get(), 1);
    }

    #[test]
    fn test_timer_observes() {
        let m = Metrics::new().unwrap();
        let timer = Timer::new();
        timer.observe_duration(&m.build_latency);
        assert_eq!(m.build_latency.get_sample_count(), 1);
    }
}
