use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

use crate::handlers::{
    clear_cache, get_cache_stats, get_metric_stats, get_performance_health,
    get_performance_stats, PerformanceHandlers,
};
use crate::services::{CacheManager, PerformanceMonitor};

pub fn create_performance_router(
    cache: Arc<CacheManager>,
    monitor: Arc<PerformanceMonitor>,
) -> Router {
    let handlers = Arc::new(PerformanceHandlers::new(cache, monitor));

    Router::new()
        .route("/stats", get(get_performance_stats))
        .route("/stats/{key}", get(get_metric_stats))
        .route("/health", get(get_performance_health))
        .route("/cache/stats", get(get_cache_stats))
        .route("/cache/clear", delete(clear_cache))
        .with_state(handlers)
}
