use serde::{Deserialize, Serialize};

use shared_models::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformerCard {
    pub ticker: String,
    pub profit_loss: f64,
    pub profit_loss_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskCard {
    pub level: String,
    pub score: f64,
}

/// Data behind the dashboard summary cards.
///
/// Only the portfolio figures are required; risk and insight cards are left
/// empty when their source is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_value: f64,
    pub total_cost: f64,
    pub total_profit_loss: f64,
    pub total_profit_loss_percentage: f64,
    pub holdings_count: u32,
    pub best_performer: Option<PerformerCard>,
    pub worst_performer: Option<PerformerCard>,
    pub risk: Option<RiskCard>,
    pub top_recommendation: Option<String>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Portfolio unavailable: {0}")]
    PortfolioUnavailable(#[source] ApiError),
}
