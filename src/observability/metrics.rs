//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): completed requests by path, method, status
//! - `process_*` (cpu, memory, fds, threads, start time), refreshed per scrape
//!
//! # Design Decisions
//! - The registry is an owned value built at server setup and handed to
//!   handlers through router state. No recorder is installed globally, so
//!   independent servers (and tests) never share counters.
//! - Counter updates are atomic; concurrent increments are never lost.

use std::sync::Arc;

use metrics::{Key, Label, Level, Metadata, Recorder};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use metrics_process::Collector;

/// Name of the request counter.
pub const REQUESTS_TOTAL: &str = "http_requests_total";

/// Status label recorded when the real response code is not tracked.
pub const PLACEHOLDER_STATUS: &str = "200";

static METADATA: Metadata<'static> =
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()));

/// Label set identifying one request counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestLabels {
    pub path: String,
    pub method: String,
    pub status: String,
}

impl RequestLabels {
    pub fn new(path: impl Into<String>, method: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            status: status.into(),
        }
    }

    fn to_key(&self) -> Key {
        Key::from_parts(
            REQUESTS_TOTAL,
            vec![
                Label::new("path", self.path.clone()),
                Label::new("method", self.method.clone()),
                Label::new("status", self.status.clone()),
            ],
        )
    }
}

/// Request counter registry backed by a local Prometheus recorder.
///
/// Process metrics (CPU, memory, open fds, threads, start time) are
/// collected into the same recorder on every snapshot.
#[derive(Clone)]
pub struct RequestMetrics {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
    process: Arc<Collector>,
}

impl RequestMetrics {
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        recorder.describe_counter(REQUESTS_TOTAL.into(), None, "Total HTTP requests".into());

        let process = Collector::default();
        metrics::with_local_recorder(&recorder, || process.describe());

        let handle = recorder.handle();
        Self {
            recorder: Arc::new(recorder),
            handle,
            process: Arc::new(process),
        }
    }

    /// Add one to the counter for `labels`.
    pub fn increment(&self, labels: &RequestLabels) {
        self.recorder
            .register_counter(&labels.to_key(), &METADATA)
            .increment(1);
    }

    /// Refresh process metrics and render everything in the Prometheus text
    /// exposition format.
    pub fn snapshot(&self) -> String {
        metrics::with_local_recorder(self.recorder.as_ref(), || self.process.collect());
        self.handle.render()
    }
}

impl Default for RequestMetrics {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{count, scraped_count};
    use super::*;

    #[test]
    fn test_increment_and_snapshot() {
        let metrics = RequestMetrics::new();
        let root = RequestLabels::new("/", "GET", PLACEHOLDER_STATUS);

        metrics.increment(&root);
        metrics.increment(&root);
        metrics.increment(&RequestLabels::new("/healthz", "GET", "200"));

        let text = metrics.snapshot();
        assert!(text.contains("# TYPE http_requests_total counter"));
        assert_eq!(scraped_count(&text, &root), Some(2.0));
        assert_eq!(count(&metrics, &RequestLabels::new("/healthz", "GET", "200")), 1.0);
        assert_eq!(count(&metrics, &RequestLabels::new("/healthz", "POST", "200")), 0.0);
    }

    #[test]
    fn test_registries_are_independent() {
        let a = RequestMetrics::new();
        let b = RequestMetrics::new();
        let labels = RequestLabels::new("/", "GET", "200");

        a.increment(&labels);
        assert_eq!(count(&a, &labels), 1.0);
        assert_eq!(count(&b, &labels), 0.0);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = RequestMetrics::new();
        let clone = metrics.clone();
        let labels = RequestLabels::new("/foo", "PUT", "200");

        clone.increment(&labels);
        assert_eq!(count(&metrics, &labels), 1.0);
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let metrics = RequestMetrics::new();
        let labels = RequestLabels::new("/", "GET", "200");

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let metrics = metrics.clone();
                let labels = labels.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        metrics.increment(&labels);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(count(&metrics, &labels), 2000.0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_snapshot_includes_process_metrics() {
        let text = RequestMetrics::new().snapshot();

        assert!(text.contains("process_cpu_seconds_total"));
        assert!(text.contains("process_resident_memory_bytes"));
        assert!(text.contains("process_open_fds"));
    }
}
