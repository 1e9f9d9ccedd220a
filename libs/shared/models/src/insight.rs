use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightRequest {
    pub analysis_type: String,
}

impl Default for InsightRequest {
    fn default() -> Self {
        Self {
            analysis_type: "full".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskSummary {
    pub overall_risk_level: String,
    pub risk_score: f64,
    #[serde(default)]
    pub main_concerns: Vec<String>,
    pub volatility_estimate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiversificationSuggestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub current_exposure: f64,
    pub recommended_exposure: f64,
    pub suggestion: String,
    pub priority: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcentrationAlert {
    #[serde(rename = "type")]
    pub kind: String,
    pub asset_name: String,
    pub concentration_percentage: f64,
    pub risk_level: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiInsight {
    pub id: String,
    pub user_id: i64,
    pub generated_at: DateTime<Utc>,
    pub risk_summary: RiskSummary,
    #[serde(default)]
    pub diversification_suggestions: Vec<DiversificationSuggestion>,
    #[serde(default)]
    pub concentration_alerts: Vec<ConcentrationAlert>,
    #[serde(default)]
    pub key_recommendations: Vec<String>,
    pub confidence_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightResponse {
    pub insight: AiInsight,
    #[serde(default)]
    pub portfolio_snapshot: HashMap<String, serde_json::Value>,
    pub processing_time_ms: u64,
}
