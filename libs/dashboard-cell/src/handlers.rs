use axum::{extract::State, Json};
use std::sync::Arc;

use crate::models::{DashboardError, DashboardSummary};
use crate::services::DashboardService;

pub async fn get_dashboard_summary(
    State(service): State<Arc<DashboardService>>,
) -> Result<Json<DashboardSummary>, DashboardError> {
    service.summary().await.map(Json)
}

// Error response implementation
use axum::{http::StatusCode, response::IntoResponse};

impl IntoResponse for DashboardError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            DashboardError::PortfolioUnavailable(source) => source
                .status()
                .and_then(|status| StatusCode::from_u16(status).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
        };

        tracing::error!("Dashboard error: {}: {}", status, self);

        (status, Json(serde_json::json!({
            "error": self.to_string(),
            "timestamp": chrono::Utc::now()
        }))).into_response()
    }
}
