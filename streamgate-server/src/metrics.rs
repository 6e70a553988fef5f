//! Simple metrics collection for observability
//!
//! Lightweight atomic counters with a Prometheus text export. This is the
//! server's own telemetry; the getMetrics RPC reports rate-limit store
//! statistics instead and lives in the gateway.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Core metrics collected by the server
pub struct Metrics {
    /// Server start time
    start_time: Instant,

    /// Total requests received
    pub total_requests: AtomicU64,

    /// Requests by operation
    pub stream_requests: AtomicU64,
    pub search_requests: AtomicU64,
    pub health_requests: AtomicU64,
    pub metrics_requests: AtomicU64,

    /// Outcomes
    pub requests_succeeded: AtomicU64,
    pub requests_denied: AtomicU64,
    pub requests_failed: AtomicU64,

    /// Request latency buckets (in microseconds)
    pub latency_under_10ms: AtomicU64,
    pub latency_under_100ms: AtomicU64,
    pub latency_under_1s: AtomicU64,
    pub latency_under_10s: AtomicU64,
    pub latency_over_10s: AtomicU64,

    /// Histogram support
    pub latency_sum_micros: AtomicU64,
    pub latency_count: AtomicU64,
}

/// Operation type for metrics tracking
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    Stream,
    Search,
    Health,
    Metrics,
}

/// How a request ended, from the caller's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Completed successfully
    Succeeded,
    /// Rejected by validation or the rate limiter
    Denied,
    /// Provider or internal failure
    Failed,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            total_requests: AtomicU64::new(0),
            stream_requests: AtomicU64::new(0),
            search_requests: AtomicU64::new(0),
            health_requests: AtomicU64::new(0),
            metrics_requests: AtomicU64::new(0),
            requests_succeeded: AtomicU64::new(0),
            requests_denied: AtomicU64::new(0),
            requests_failed: AtomicU64::new(0),
            latency_under_10ms: AtomicU64::new(0),
            latency_under_100ms: AtomicU64::new(0),
            latency_under_1s: AtomicU64::new(0),
            latency_under_10s: AtomicU64::new(0),
            latency_over_10s: AtomicU64::new(0),
            latency_sum_micros: AtomicU64::new(0),
            latency_count: AtomicU64::new(0),
        }
    }

    /// Record a request, its latency, and how it ended
    pub fn record_request(&self, operation: Operation, latency_us: u64, outcome: Outcome) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);

        match operation {
            Operation::Stream => self.stream_requests.fetch_add(1, Ordering::Relaxed),
            Operation::Search => self.search_requests.fetch_add(1, Ordering::Relaxed),
            Operation::Health => self.health_requests.fetch_add(1, Ordering::Relaxed),
            Operation::Metrics => self.metrics_requests.fetch_add(1, Ordering::Relaxed),
        };

        match outcome {
            Outcome::Succeeded => self.requests_succeeded.fetch_add(1, Ordering::Relaxed),
            Outcome::Denied => self.requests_denied.fetch_add(1, Ordering::Relaxed),
            Outcome::Failed => self.requests_failed.fetch_add(1, Ordering::Relaxed),
        };

        match latency_us {
            0..=9_999 => self.latency_under_10ms.fetch_add(1, Ordering::Relaxed),
            10_000..=99_999 => self.latency_under_100ms.fetch_add(1, Ordering::Relaxed),
            100_000..=999_999 => self.latency_under_1s.fetch_add(1, Ordering::Relaxed),
            1_000_000..=9_999_999 => self.latency_under_10s.fetch_add(1, Ordering::Relaxed),
            _ => self.latency_over_10s.fetch_add(1, Ordering::Relaxed),
        };

        self.latency_sum_micros
            .fetch_add(latency_us, Ordering::Relaxed);
        self.latency_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        let mut output = String::with_capacity(1500);

        output.push_str("# HELP streamgate_uptime_seconds Time since server start in seconds\n");
        output.push_str("# TYPE streamgate_uptime_seconds gauge\n");
        output.push_str(&format!(
            "streamgate_uptime_seconds {}\n\n",
            self.uptime_seconds()
        ));

        output.push_str("# HELP streamgate_requests_total Total number of requests processed\n");
        output.push_str("# TYPE streamgate_requests_total counter\n");
        output.push_str(&format!(
            "streamgate_requests_total {}\n\n",
            self.total_requests.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP streamgate_requests_by_operation Total requests by operation\n");
        output.push_str("# TYPE streamgate_requests_by_operation counter\n");
        output.push_str(&format!(
            "streamgate_requests_by_operation{{operation=\"stream\"}} {}\n",
            self.stream_requests.load(Ordering::Relaxed)
        ));
        output.push_str(&format!(
            "streamgate_requests_by_operation{{operation=\"search\"}} {}\n",
            self.search_requests.load(Ordering::Relaxed)
        ));
        output.push_str(&format!(
            "streamgate_requests_by_operation{{operation=\"health\"}} {}\n",
            self.health_requests.load(Ordering::Relaxed)
        ));
        output.push_str(&format!(
            "streamgate_requests_by_operation{{operation=\"metrics\"}} {}\n\n",
            self.metrics_requests.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP streamgate_requests_succeeded Total requests succeeded\n");
        output.push_str("# TYPE streamgate_requests_succeeded counter\n");
        output.push_str(&format!(
            "streamgate_requests_succeeded {}\n\n",
            self.requests_succeeded.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP streamgate_requests_denied Requests rejected by validation or rate limiting\n");
        output.push_str("# TYPE streamgate_requests_denied counter\n");
        output.push_str(&format!(
            "streamgate_requests_denied {}\n\n",
            self.requests_denied.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP streamgate_requests_failed Provider or internal failures\n");
        output.push_str("# TYPE streamgate_requests_failed counter\n");
        output.push_str(&format!(
            "streamgate_requests_failed {}\n\n",
            self.requests_failed.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP streamgate_request_duration_bucket Request latency distribution\n");
        output.push_str("# TYPE streamgate_request_duration_bucket histogram\n");
        let under_10ms = self.latency_under_10ms.load(Ordering::Relaxed);
        let under_100ms = under_10ms + self.latency_under_100ms.load(Ordering::Relaxed);
        let under_1s = under_100ms + self.latency_under_1s.load(Ordering::Relaxed);
        let under_10s = under_1s + self.latency_under_10s.load(Ordering::Relaxed);
        output.push_str(&format!(
            "streamgate_request_duration_bucket{{le=\"0.01\"}} {under_10ms}\n"
        ));
        output.push_str(&format!(
            "streamgate_request_duration_bucket{{le=\"0.1\"}} {under_100ms}\n"
        ));
        output.push_str(&format!(
            "streamgate_request_duration_bucket{{le=\"1\"}} {under_1s}\n"
        ));
        output.push_str(&format!(
            "streamgate_request_duration_bucket{{le=\"10\"}} {under_10s}\n"
        ));
        output.push_str(&format!(
            "streamgate_request_duration_bucket{{le=\"+Inf\"}} {}\n",
            self.total_requests.load(Ordering::Relaxed)
        ));

        let latency_sum_seconds =
            self.latency_sum_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0;
        output.push_str(&format!(
            "streamgate_request_duration_sum {latency_sum_seconds:.6}\n"
        ));
        output.push_str(&format!(
            "streamgate_request_duration_count {}\n",
            self.latency_count.load(Ordering::Relaxed)
        ));

        output
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.total_requests.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.requests_succeeded.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.requests_denied.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.requests_failed.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_request() {
        let metrics = Metrics::new();

        metrics.record_request(Operation::Stream, 5_000, Outcome::Succeeded);

        assert_eq!(metrics.total_requests.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.stream_requests.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.requests_succeeded.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.latency_under_10ms.load(Ordering::Relaxed), 1);

        metrics.record_request(Operation::Search, 250_000, Outcome::Denied);

        assert_eq!(metrics.total_requests.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.search_requests.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.requests_denied.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.latency_under_1s.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_latency_buckets() {
        let metrics = Metrics::new();

        metrics.record_request(Operation::Stream, 5_000, Outcome::Succeeded);
        metrics.record_request(Operation::Stream, 50_000, Outcome::Succeeded);
        metrics.record_request(Operation::Stream, 500_000, Outcome::Succeeded);
        metrics.record_request(Operation::Stream, 5_000_000, Outcome::Succeeded);
        metrics.record_request(Operation::Stream, 50_000_000, Outcome::Succeeded);

        assert_eq!(metrics.latency_under_10ms.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.latency_under_100ms.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.latency_under_1s.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.latency_under_10s.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.latency_over_10s.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_prometheus_export() {
        let metrics = Metrics::new();

        metrics.record_request(Operation::Stream, 5_000, Outcome::Succeeded);
        metrics.record_request(Operation::Search, 15_000, Outcome::Failed);

        let output = metrics.export_prometheus();

        assert!(output.contains("streamgate_uptime_seconds"));
        assert!(output.contains("streamgate_requests_total 2"));
        assert!(output.contains("streamgate_requests_succeeded 1"));
        assert!(output.contains("streamgate_requests_failed 1"));
        assert!(output.contains("streamgate_requests_by_operation{operation=\"stream\"} 1"));
        assert!(output.contains("streamgate_requests_by_operation{operation=\"search\"} 1"));
    }
}
