use prometheus::{
    proto::MetricFamily, Counter, CounterVec, Histogram, HistogramOpts, Opts, Registry,
};
use std::sync::Arc;

/// Prometheus metrics for the word dictionary
#[derive(Clone)]
pub struct DictMetrics {
    // Counters
    pub lookups_total: CounterVec,
    pub allocations: Counter,
    pub overflows: Counter,
    pub degraded_reads: Counter,

    // Histograms
    pub scan_latency: Histogram,

    // Registry
    registry: Arc<Registry>,
}

impl DictMetrics {
    /// Create a new DictMetrics instance on its own registry
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let lookups_total = CounterVec::new(
            Opts::new(
                "wordsdict_lookups_total",
                "Bucket lookups for multi-character words by result",
            ),
            &["result"],
        )?;
        registry.register(Box::new(lookups_total.clone()))?;

        let allocations = Counter::with_opts(Opts::new(
            "wordsdict_allocations_total",
            "Total number of freshly allocated word indices",
        ))?;
        registry.register(Box::new(allocations.clone()))?;

        let overflows = Counter::with_opts(Opts::new(
            "wordsdict_overflows_total",
            "Allocations refused because the leading character range is exhausted",
        ))?;
        registry.register(Box::new(overflows.clone()))?;

        let degraded_reads = Counter::with_opts(Opts::new(
            "wordsdict_degraded_reads_total",
            "Bucket reads that failed and were treated as empty",
        ))?;
        registry.register(Box::new(degraded_reads.clone()))?;

        let scan_latency = Histogram::with_opts(
            HistogramOpts::new("wordsdict_scan_latency_seconds", "Bucket file scan latency")
                .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        )?;
        registry.register(Box::new(scan_latency.clone()))?;

        Ok(Self {
            lookups_total,
            allocations,
            overflows,
            degraded_reads,
            scan_latency,
            registry: Arc::new(registry),
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Collect all metric families
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Record a bucket lookup
    pub fn record_lookup(&self, hit: bool, duration_secs: f64) {
        let result = if hit { "hit" } else { "miss" };
        self.lookups_total.with_label_values(&[result]).inc();
        self.scan_latency.observe(duration_secs);
    }

    pub fn record_allocation(&self) {
        self.allocations.inc();
    }

    pub fn record_overflow(&self) {
        self.overflows.inc();
    }

    pub fn record_degraded_read(&self) {
        self.degraded_reads.inc();
    }

    pub fn lookup_count(&self, hit: bool) -> u64 {
        let result = if hit { "hit" } else { "miss" };
        self.lookups_total.with_label_values(&[result]).get() as u64
    }
}
