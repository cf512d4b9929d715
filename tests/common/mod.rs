//! Shared utilities for integration testing.

use std::time::Duration;

use podinfo_lite::config::ServiceConfig;
use podinfo_lite::http::HttpServer;
use podinfo_lite::observability::metrics::{RequestLabels, RequestMetrics, REQUESTS_TOTAL};
use prometheus_parse::{Scrape, Value};

/// Config listening on loopback at `port`.
pub fn loopback_config(port: u16) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = port;
    config
}

/// Bind and spawn a server, returning its metrics registry.
pub async fn start_server(config: ServiceConfig) -> RequestMetrics {
    let server = HttpServer::new(config);
    let metrics = server.metrics().clone();
    let listener = server.bind().await.unwrap();

    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;
    metrics
}

/// Client that never pools or proxies, so every request opens a fresh connection.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Value of the `http_requests_total` sample for `labels` in a scrape body.
pub fn scraped_count(exposition: &str, labels: &RequestLabels) -> Option<f64> {
    let lines = exposition
        .lines()
        .map(|line| Ok::<_, std::io::Error>(line.to_string()));
    let scrape = Scrape::parse(lines).unwrap();

    scrape
        .samples
        .into_iter()
        .find(|sample| {
            sample.metric == REQUESTS_TOTAL
                && sample.labels.get("path") == Some(labels.path.as_str())
                && sample.labels.get("method") == Some(labels.method.as_str())
                && sample.labels.get("status") == Some(labels.status.as_str())
        })
        .and_then(|sample| match sample.value {
            Value::Counter(v) | Value::Untyped(v) | Value::Gauge(v) => Some(v),
            _ => None,
        })
}
