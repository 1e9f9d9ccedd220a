use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::models::{
    CacheClearResponse, CacheStats, MetricStats, PerformanceError, PerformanceHealth,
    PerformanceStats,
};
use crate::services::{CacheManager, PerformanceMonitor};

pub struct PerformanceHandlers {
    cache: Arc<CacheManager>,
    monitor: Arc<PerformanceMonitor>,
}

impl PerformanceHandlers {
    pub fn new(cache: Arc<CacheManager>, monitor: Arc<PerformanceMonitor>) -> Self {
        Self { cache, monitor }
    }
}

pub async fn get_performance_stats(
    State(handlers): State<Arc<PerformanceHandlers>>,
) -> Result<Json<PerformanceStats>, PerformanceError> {
    Ok(Json(PerformanceStats {
        cache_stats: handlers.cache.stats().await,
        metrics: handlers.monitor.all_stats().await,
        timestamp: chrono::Utc::now(),
    }))
}

pub async fn get_metric_stats(
    State(handlers): State<Arc<PerformanceHandlers>>,
    Path(key): Path<String>,
) -> Result<Json<MetricStats>, PerformanceError> {
    handlers
        .monitor
        .get_stats(&key)
        .await
        .map(Json)
        .ok_or(PerformanceError::MetricNotFound(key))
}

pub async fn get_performance_health(
    State(handlers): State<Arc<PerformanceHandlers>>,
) -> Json<PerformanceHealth> {
    Json(handlers.monitor.check_performance_health().await)
}

pub async fn get_cache_stats(State(handlers): State<Arc<PerformanceHandlers>>) -> Json<CacheStats> {
    Json(handlers.cache.stats().await)
}

pub async fn clear_cache(
    State(handlers): State<Arc<PerformanceHandlers>>,
) -> Json<CacheClearResponse> {
    let cleared = handlers.cache.clear().await;
    tracing::info!("Response cache cleared: {} entries", cleared);

    Json(CacheClearResponse {
        cleared_entries: cleared as u64,
        timestamp: chrono::Utc::now(),
    })
}

// Error response implementation
use axum::{http::StatusCode, response::IntoResponse};

impl IntoResponse for PerformanceError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            PerformanceError::MetricNotFound(_) => StatusCode::NOT_FOUND,
        };

        (status, Json(serde_json::json!({
            "error": self.to_string(),
            "timestamp": chrono::Utc::now()
        }))).into_response()
    }
}
