//! Prometheus metrics for observability and monitoring.
//!
//! This module provides metric collection for all runtime components:
//! - Store action throughput and reducer latency
//! - Effect handling
//! - Ticker activity
//! - Queue, cart, checkout and snapshot counters
//!
//! # Example
//!
//! ```rust,no_run
//! use fila_runtime::metrics::MetricsServer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Serve metrics on port 9090
//! let server = MetricsServer::new("0.0.0.0:9090".parse()?);
//! server.start().await?;
//!
//! // Metrics available at http://localhost:9090/metrics
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use std::net::SocketAddr;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus metrics server.
///
/// Installs the process-global recorder and serves the scrape endpoint on
/// the configured address.
#[derive(Debug, Clone, Copy)]
pub struct MetricsServer {
    addr: SocketAddr,
}

impl MetricsServer {
    /// Create a new metrics server.
    ///
    /// # Arguments
    ///
    /// * `addr` - Socket address to bind (e.g., `0.0.0.0:9090`)
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Install the Prometheus recorder and start serving metrics.
    ///
    /// The exporter task is spawned onto the current Tokio runtime. If a
    /// recorder is already installed (another store in the same process),
    /// the existing one is reused.
    ///
    /// # Errors
    ///
    /// Returns an error if the exporter cannot be built or installed.
    pub async fn start(&self) -> Result<(), MetricsError> {
        let builder = PrometheusBuilder::new()
            .with_http_listener(self.addr)
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install() {
            Ok(()) => {
                register_metrics();
                tracing::info!(addr = %self.addr, "Metrics server started");
                Ok(())
            },
            Err(e) if e.to_string().contains("initialized") => {
                tracing::debug!("Metrics recorder already installed, reusing");
                Ok(())
            },
            Err(e) => Err(MetricsError::Install(e.to_string())),
        }
    }
}

/// Register all metrics with descriptions.
///
/// Called automatically by `MetricsServer::start()`.
pub fn register_metrics() {
    // Store metrics
    describe_counter!(
        "fila_store_actions_total",
        "Total number of actions accepted by the store"
    );
    describe_counter!(
        "fila_store_rejected_actions_total",
        "Actions rejected because the store was shutting down"
    );
    describe_counter!(
        "fila_store_effects_total",
        "Effects executed, labeled by effect type"
    );
    describe_counter!("fila_store_shutdowns_total", "Store shutdown attempts");
    describe_histogram!(
        "fila_store_reduce_duration_seconds",
        "Time spent inside the reducer per action"
    );

    // Ticker metrics
    describe_counter!("fila_ticker_ticks_total", "Ticker actions sent to stores");

    // Queue metrics
    describe_counter!("fila_queue_joins_total", "Virtual queue join attempts");
    describe_counter!(
        "fila_queue_notified_total",
        "Queue entries that reached the front and were notified"
    );
    describe_counter!("fila_queue_expired_total", "Queue entries that expired");
    describe_counter!("fila_queue_holds_total", "Successful queue position holds");
    describe_gauge!(
        "fila_queue_position",
        "Current position of the local queue entry"
    );

    // Cart and checkout metrics
    describe_counter!("fila_cart_adds_total", "Items added to the cart");
    describe_counter!(
        "fila_checkout_completed_total",
        "Checkouts that settled successfully"
    );

    // Snapshot metrics
    describe_counter!("fila_snapshot_writes_total", "Snapshot writes attempted");
    describe_counter!(
        "fila_snapshot_write_errors_total",
        "Snapshot writes that failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn start_binds_an_ephemeral_port() {
        let addr: SocketAddr = "127.0.0.1:0"
            .parse()
            .unwrap_or_else(|_| unreachable!("valid literal addr"));
        let server = MetricsServer::new(addr);
        assert!(server.start().await.is_ok());
    }

    #[test]
    fn register_metrics_is_idempotent() {
        register_metrics();
        register_metrics();
    }
}
