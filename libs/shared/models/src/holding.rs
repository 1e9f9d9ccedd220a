use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    #[default]
    Stock,
    Crypto,
    Etf,
    Bond,
    Commodity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub id: i64,
    pub user_id: i64,
    pub ticker: String,
    #[serde(default)]
    pub asset_type: AssetType,
    pub quantity: f64,
    pub buy_price: f64,
    pub buy_date: DateTime<Utc>,
    pub current_price: f64,
    pub sector: Option<String>,
    pub country: Option<String>,
    pub market_cap: Option<f64>,
    pub total_value: f64,
    pub total_cost: f64,
    pub profit_loss: f64,
    pub profit_loss_percentage: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateHoldingRequest {
    pub ticker: String,
    pub asset_type: AssetType,
    pub quantity: f64,
    pub buy_price: f64,
    pub buy_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateHoldingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub total_cost: f64,
    pub total_profit_loss: f64,
    pub total_profit_loss_percentage: f64,
    pub holdings_count: u32,
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

impl PortfolioSummary {
    pub fn best_performer(&self) -> Option<&Holding> {
        self.holdings
            .iter()
            .max_by(|a, b| a.profit_loss_percentage.total_cmp(&b.profit_loss_percentage))
    }

    pub fn worst_performer(&self) -> Option<&Holding> {
        self.holdings
            .iter()
            .min_by(|a, b| a.profit_loss_percentage.total_cmp(&b.profit_loss_percentage))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationData {
    pub by_asset_type: HashMap<String, f64>,
    pub by_sector: HashMap<String, f64>,
    pub by_country: HashMap<String, f64>,
    #[serde(default)]
    pub top_performers: Vec<Holding>,
    #[serde(default)]
    pub worst_performers: Vec<Holding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSearchResult {
    pub ticker: String,
    pub name: String,
    pub sector: Option<String>,
    pub exchange: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockQuote {
    pub ticker: String,
    pub price: f64,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
}
