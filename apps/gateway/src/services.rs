use std::sync::Arc;

use api_client_cell::{OptimizedApiClient, StockwiseApi};
use performance_cell::{CacheManager, PerformanceMonitor};
use shared_config::AppConfig;
use shared_models::ApiError;

/// Process-wide services, built once at startup and shared by `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub cache: Arc<CacheManager>,
    pub monitor: Arc<PerformanceMonitor>,
    pub api: StockwiseApi,
}

impl AppServices {
    pub fn build(config: &AppConfig) -> Result<Self, ApiError> {
        let cache = Arc::new(CacheManager::new());
        let monitor = Arc::new(PerformanceMonitor::new());
        let client = OptimizedApiClient::new(config, cache.clone(), monitor.clone())?;

        Ok(Self {
            cache,
            monitor,
            api: StockwiseApi::new(Arc::new(client)),
        })
    }
}
