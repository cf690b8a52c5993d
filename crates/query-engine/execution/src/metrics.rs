//! Metrics for the queries the gateway runs.

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

/// The collection of metrics, registered once at startup.
#[derive(Debug, Clone)]
pub struct Metrics {
    queries_total: IntCounterVec,
    query_errors_total: IntCounterVec,
    query_duration_seconds: HistogramVec,
}

impl Metrics {
    /// Create and register the metrics.
    pub fn initialize(metrics_registry: &mut Registry) -> Result<Self, prometheus::Error> {
        let queries_total = add_int_counter_vec_metric(
            metrics_registry,
            "gateway_queries_total",
            "Total number of queries sent to the warehouse.",
        )?;
        let query_errors_total = add_int_counter_vec_metric(
            metrics_registry,
            "gateway_query_errors_total",
            "Total number of queries the warehouse failed to answer.",
        )?;
        let query_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "gateway_query_duration_seconds",
                "Time taken by the warehouse to answer a query.",
            ),
            &["endpoint"],
        )?;
        metrics_registry.register(Box::new(query_duration_seconds.clone()))?;

        Ok(Self {
            queries_total,
            query_errors_total,
            query_duration_seconds,
        })
    }

    pub fn record_query(&self, endpoint: &str) {
        self.queries_total.with_label_values(&[endpoint]).inc();
    }

    pub fn record_query_error(&self, endpoint: &str) {
        self.query_errors_total.with_label_values(&[endpoint]).inc();
    }

    pub fn observe_query_duration(&self, endpoint: &str, seconds: f64) {
        self.query_duration_seconds
            .with_label_values(&[endpoint])
            .observe(seconds);
    }
}

fn add_int_counter_vec_metric(
    metrics_registry: &mut Registry,
    name: &str,
    help: &str,
) -> Result<IntCounterVec, prometheus::Error> {
    let int_counter = IntCounterVec::new(Opts::new(name, help), &["endpoint"])?;
    metrics_registry.register(Box::new(int_counter.clone()))?;
    Ok(int_counter)
}
