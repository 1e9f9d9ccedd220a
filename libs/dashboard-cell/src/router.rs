use axum::{routing::get, Router};
use std::sync::Arc;

use api_client_cell::StockwiseApi;

use crate::handlers::get_dashboard_summary;
use crate::services::DashboardService;

pub fn create_dashboard_router(api: StockwiseApi) -> Router {
    let service = Arc::new(DashboardService::new(api));

    Router::new()
        .route("/summary", get(get_dashboard_summary))
        .with_state(service)
}
