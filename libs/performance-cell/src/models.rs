use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub total_entries: u64,
    pub expired_evictions: u64,
}

/// What a metric series measures. Drives the thresholds used by the health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Api,
    Render,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricStats {
    pub kind: MetricKind,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
    pub p95: f64,
}

impl MetricStats {
    /// Summarises a window of samples, `None` when the window is empty.
    pub fn from_samples(kind: MetricKind, samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let sum: f64 = sorted.iter().sum();
        let p95_index = ((count as f64 * 0.95) as usize).min(count - 1);

        Some(Self {
            kind,
            count,
            min: sorted[0],
            max: sorted[count - 1],
            avg: sum / count as f64,
            median: sorted[count / 2],
            p95: sorted[p95_index],
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceIssue {
    pub metric: String,
    pub kind: MetricKind,
    pub samples: usize,
    pub p95_ms: f64,
    pub threshold_ms: f64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceHealth {
    pub healthy: bool,
    pub issues: Vec<PerformanceIssue>,
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub cache_stats: CacheStats,
    pub metrics: BTreeMap<String, MetricStats>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheClearResponse {
    pub cleared_entries: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum PerformanceError {
    #[error("No samples recorded for metric '{0}'")]
    MetricNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_of_empty_window() {
        assert!(MetricStats::from_samples(MetricKind::Api, &[]).is_none());
    }

    #[test]
    fn test_stats_of_single_sample() {
        let stats = MetricStats::from_samples(MetricKind::Render, &[42.0]).unwrap();

        assert_eq!(stats.count, 1);
        assert_eq!(stats.min, 42.0);
        assert_eq!(stats.max, 42.0);
        assert_eq!(stats.median, 42.0);
        assert_eq!(stats.p95, 42.0);
    }

    #[test]
    fn test_stats_ignore_insertion_order() {
        let samples = [30.0, 10.0, 50.0, 20.0, 40.0];
        let stats = MetricStats::from_samples(MetricKind::Api, &samples).unwrap();

        assert_eq!(stats.count, 5);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 50.0);
        assert_eq!(stats.avg, 30.0);
        assert_eq!(stats.median, 30.0);
        assert_eq!(stats.p95, 50.0);
    }

    #[test]
    fn test_p95_of_hundred_samples() {
        let samples: Vec<f64> = (1..=100).map(f64::from).collect();
        let stats = MetricStats::from_samples(MetricKind::Api, &samples).unwrap();

        assert_eq!(stats.median, 51.0);
        assert_eq!(stats.p95, 96.0);
        assert_eq!(stats.avg, 50.5);
    }
}
