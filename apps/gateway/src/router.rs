use axum::{routing::get, Router};

use dashboard_cell::create_dashboard_router;
use performance_cell::create_performance_router;

use crate::services::AppServices;

pub fn create_router(services: AppServices) -> Router {
    Router::new()
        .route("/", get(|| async { "StockWise gateway is running!" }))
        .nest(
            "/performance",
            create_performance_router(services.cache.clone(), services.monitor.clone()),
        )
        .nest("/dashboard", create_dashboard_router(services.api))
}
