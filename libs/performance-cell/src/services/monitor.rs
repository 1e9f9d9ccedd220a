// =====================================================================================
// PERFORMANCE MONITOR
// =====================================================================================

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::future::Future;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::models::{MetricKind, MetricStats, PerformanceHealth, PerformanceIssue};

/// Samples retained per series; older samples are dropped first.
pub const MAX_SAMPLES: usize = 100;
/// Series with fewer samples are not judged by the health check.
pub const MIN_SAMPLES_FOR_HEALTH: usize = 10;
pub const API_P95_THRESHOLD_MS: f64 = 5000.0;
pub const RENDER_P95_THRESHOLD_MS: f64 = 100.0;

#[derive(Debug)]
struct MetricSeries {
    kind: MetricKind,
    samples: VecDeque<f64>,
}

impl MetricSeries {
    fn new(kind: MetricKind) -> Self {
        Self {
            kind,
            samples: VecDeque::with_capacity(MAX_SAMPLES),
        }
    }

    fn push(&mut self, value: f64) {
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    fn stats(&self) -> Option<MetricStats> {
        let samples: Vec<f64> = self.samples.iter().copied().collect();
        MetricStats::from_samples(self.kind, &samples)
    }
}

/// Rolling duration statistics for API calls and renders.
#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    series: RwLock<HashMap<String, MetricSeries>>,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Times `operation` and records the duration under `label`, or under
    /// `{label}_error` when it fails. The operation's result is returned as is.
    pub async fn measure_api_call<F, T, E>(&self, label: &str, operation: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let start = Instant::now();
        let result = operation.await;
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => self.record_api_call(label, elapsed).await,
            Err(_) => self.record_api_call(&format!("{}_error", label), elapsed).await,
        }

        result
    }

    /// Records an API call duration measured elsewhere.
    pub async fn record_api_call(&self, label: &str, duration: Duration) {
        self.record(label, MetricKind::Api, duration).await;
    }

    pub async fn record_render(&self, component: &str, duration: Duration) {
        self.record(&format!("render_{}", component), MetricKind::Render, duration)
            .await;
    }

    pub async fn record_metric(&self, key: &str, value_ms: f64) {
        self.push_sample(key, MetricKind::Custom, value_ms).await;
    }

    async fn record(&self, key: &str, kind: MetricKind, duration: Duration) {
        self.push_sample(key, kind, duration.as_secs_f64() * 1000.0)
            .await;
    }

    async fn push_sample(&self, key: &str, kind: MetricKind, value_ms: f64) {
        let mut series = self.series.write().await;
        series
            .entry(key.to_string())
            .or_insert_with(|| MetricSeries::new(kind))
            .push(value_ms);
        debug!(metric = %key, value_ms, "Recorded performance sample");
    }

    pub async fn get_stats(&self, key: &str) -> Option<MetricStats> {
        let series = self.series.read().await;
        series.get(key).and_then(MetricSeries::stats)
    }

    pub async fn all_stats(&self) -> BTreeMap<String, MetricStats> {
        let series = self.series.read().await;
        series
            .iter()
            .filter_map(|(key, s)| s.stats().map(|stats| (key.clone(), stats)))
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn check_performance_health(&self) -> PerformanceHealth {
        let mut issues = Vec::new();

        for (metric, stats) in self.all_stats().await {
            if stats.count < MIN_SAMPLES_FOR_HEALTH {
                continue;
            }

            let threshold_ms = match stats.kind {
                MetricKind::Api => API_P95_THRESHOLD_MS,
                MetricKind::Render => RENDER_P95_THRESHOLD_MS,
                MetricKind::Custom => continue,
            };

            if stats.p95 > threshold_ms {
                let message = match stats.kind {
                    MetricKind::Render => format!(
                        "Slow render: {} p95 {:.0}ms exceeds {:.0}ms",
                        metric, stats.p95, threshold_ms
                    ),
                    _ => format!(
                        "Slow API: {} p95 {:.0}ms exceeds {:.0}ms",
                        metric, stats.p95, threshold_ms
                    ),
                };
                warn!(
                    metric = %metric,
                    p95_ms = stats.p95,
                    threshold_ms,
                    samples = stats.count,
                    "{}", message
                );

                issues.push(PerformanceIssue {
                    metric,
                    kind: stats.kind,
                    samples: stats.count,
                    p95_ms: stats.p95,
                    threshold_ms,
                    message,
                });
            }
        }

        PerformanceHealth {
            healthy: issues.is_empty(),
            issues,
            checked_at: chrono::Utc::now(),
        }
    }

    pub async fn clear(&self) {
        self.series.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tokio_test::assert_err;

    #[tokio::test]
    async fn test_empty_series_has_no_stats() {
        let monitor = PerformanceMonitor::new();
        assert!(monitor.get_stats("api_holdings").await.is_none());
    }

    #[tokio::test]
    async fn test_failed_call_records_error_series_and_propagates() {
        let monitor = PerformanceMonitor::new();

        let result: Result<(), String> = monitor
            .measure_api_call("x", async { Err("upstream exploded".to_string()) })
            .await;

        assert_eq!(assert_err!(result), "upstream exploded");
        assert!(monitor.get_stats("x").await.is_none());

        let stats = monitor.get_stats("x_error").await.unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.kind, MetricKind::Api);
    }

    #[tokio::test]
    async fn test_successful_call_returns_value() {
        let monitor = PerformanceMonitor::new();

        let result: Result<u32, String> = monitor.measure_api_call("ok", async { Ok(7) }).await;

        assert_matches!(result, Ok(7));
        assert_eq!(monitor.get_stats("ok").await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_window_keeps_most_recent_hundred() {
        let monitor = PerformanceMonitor::new();
        for value in 1..=150 {
            monitor.record_metric("latency", f64::from(value)).await;
        }

        let stats = monitor.get_stats("latency").await.unwrap();
        assert_eq!(stats.count, MAX_SAMPLES);
        assert_eq!(stats.min, 51.0);
        assert_eq!(stats.max, 150.0);
        assert_eq!(stats.avg, 100.5);
    }

    #[tokio::test]
    async fn test_health_flags_slow_renders() {
        let monitor = PerformanceMonitor::new();
        for _ in 0..MIN_SAMPLES_FOR_HEALTH {
            monitor
                .record_render("HoldingsTable", Duration::from_millis(250))
                .await;
        }

        let health = monitor.check_performance_health().await;

        assert!(!health.healthy);
        assert_eq!(health.issues.len(), 1);
        assert_eq!(health.issues[0].metric, "render_HoldingsTable");
        assert_eq!(health.issues[0].threshold_ms, RENDER_P95_THRESHOLD_MS);
    }

    #[tokio::test]
    async fn test_health_flags_slow_api_calls() {
        let monitor = PerformanceMonitor::new();
        for _ in 0..MIN_SAMPLES_FOR_HEALTH {
            monitor
                .record_api_call("GET /risk/", Duration::from_millis(5200))
                .await;
        }

        let health = monitor.check_performance_health().await;

        assert!(!health.healthy);
        assert_eq!(health.issues.len(), 1);
        assert_eq!(health.issues[0].metric, "GET /risk/");
        assert_eq!(health.issues[0].kind, MetricKind::Api);
        assert_eq!(health.issues[0].threshold_ms, API_P95_THRESHOLD_MS);
    }

    #[tokio::test]
    async fn test_api_threshold_is_exclusive() {
        let monitor = PerformanceMonitor::new();
        for _ in 0..MIN_SAMPLES_FOR_HEALTH {
            monitor
                .record_api_call("GET /insights/latest", Duration::from_millis(5000))
                .await;
        }

        assert_eq!(monitor.get_stats("GET /insights/latest").await.unwrap().p95, 5000.0);
        assert!(monitor.check_performance_health().await.healthy);
    }

    #[tokio::test]
    async fn test_health_ignores_sparse_series() {
        let monitor = PerformanceMonitor::new();
        for _ in 0..MIN_SAMPLES_FOR_HEALTH - 1 {
            monitor
                .record_render("Dashboard", Duration::from_millis(900))
                .await;
        }

        assert!(monitor.check_performance_health().await.healthy);
    }

    #[tokio::test]
    async fn test_health_ignores_custom_series_and_fast_apis() {
        let monitor = PerformanceMonitor::new();
        for _ in 0..20 {
            monitor.record_metric("bundle_size_kb", 9000.0).await;
            monitor
                .measure_api_call("GET /stocks/popular", async { Ok::<_, ()>(()) })
                .await
                .ok();
        }

        let health = monitor.check_performance_health().await;
        assert!(health.healthy);
        assert!(health.issues.is_empty());
    }

    #[tokio::test]
    async fn test_clear_drops_all_series() {
        let monitor = PerformanceMonitor::new();
        monitor.record_metric("a", 1.0).await;
        monitor.clear().await;

        assert!(monitor.all_stats().await.is_empty());
    }
}
