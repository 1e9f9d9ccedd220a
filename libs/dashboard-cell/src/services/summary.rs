use serde_json::Value;
use tracing::{instrument, warn};

use api_client_cell::StockwiseApi;
use shared_models::holding::Holding;
use shared_models::insight::InsightResponse;
use shared_models::ApiError;

use crate::models::{DashboardError, DashboardSummary, PerformerCard, RiskCard};

/// Builds the dashboard summary cards from the cached backend endpoints.
#[derive(Clone)]
pub struct DashboardService {
    api: StockwiseApi,
}

impl DashboardService {
    pub fn new(api: StockwiseApi) -> Self {
        Self { api }
    }

    /// Portfolio, risk and insight are fetched concurrently. Only the
    /// portfolio is required; the other two cards are dropped on failure.
    #[instrument(skip(self))]
    pub async fn summary(&self) -> Result<DashboardSummary, DashboardError> {
        let (portfolio, risk, insight) = tokio::join!(
            self.api.portfolio_summary(),
            self.api.risk_analysis(),
            self.api.latest_insight()
        );

        let portfolio = portfolio.map_err(DashboardError::PortfolioUnavailable)?;
        let risk = optional("risk analysis", risk).and_then(|value| risk_card(&value));
        let top_recommendation = optional("latest insight", insight).and_then(top_recommendation);

        Ok(DashboardSummary {
            total_value: portfolio.total_value,
            total_cost: portfolio.total_cost,
            total_profit_loss: portfolio.total_profit_loss,
            total_profit_loss_percentage: portfolio.total_profit_loss_percentage,
            holdings_count: portfolio.holdings_count,
            best_performer: portfolio.best_performer().map(performer_card),
            worst_performer: portfolio.worst_performer().map(performer_card),
            risk,
            top_recommendation,
            generated_at: chrono::Utc::now(),
        })
    }
}

fn optional<T>(what: &str, result: Result<T, ApiError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Dashboard {} unavailable: {}", what, e);
            None
        }
    }
}

fn performer_card(holding: &Holding) -> PerformerCard {
    PerformerCard {
        ticker: holding.ticker.clone(),
        profit_loss: holding.profit_loss,
        profit_loss_percentage: holding.profit_loss_percentage,
    }
}

fn risk_card(analysis: &Value) -> Option<RiskCard> {
    Some(RiskCard {
        level: analysis.get("risk_level")?.as_str()?.to_string(),
        score: analysis.get("overall_risk_score")?.as_f64()?,
    })
}

fn top_recommendation(response: InsightResponse) -> Option<String> {
    response.insight.key_recommendations.into_iter().next()
}
