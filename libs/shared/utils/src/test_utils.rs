use serde_json::{json, Value};

use shared_config::AppConfig;

pub struct TestConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api/v1".to_string(),
            api_token: Some("test-access-token".to_string()),
        }
    }
}

impl TestConfig {
    /// Points the client at a mock upstream, typically `MockServer::uri()`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            api_base_url: self.api_base_url.clone(),
            api_token: self.api_token.clone(),
            request_timeout_secs: 5,
            ..AppConfig::default()
        }
    }
}

pub struct MockStockwiseResponses;

impl MockStockwiseResponses {
    pub fn holding(id: i64, ticker: &str, profit_loss_percentage: f64) -> Value {
        let buy_price = 100.0;
        let current_price = buy_price * (1.0 + profit_loss_percentage / 100.0);
        json!({
            "id": id,
            "user_id": 1,
            "ticker": ticker,
            "asset_type": "stock",
            "quantity": 10.0,
            "buy_price": buy_price,
            "buy_date": "2024-01-02T00:00:00Z",
            "current_price": current_price,
            "sector": "Technology",
            "country": "US",
            "market_cap": null,
            "total_value": current_price * 10.0,
            "total_cost": buy_price * 10.0,
            "profit_loss": (current_price - buy_price) * 10.0,
            "profit_loss_percentage": profit_loss_percentage,
            "created_at": "2024-01-02T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z"
        })
    }

    pub fn portfolio_summary() -> Value {
        let holdings = vec![
            Self::holding(1, "AAPL", 12.5),
            Self::holding(2, "TSLA", -8.0),
            Self::holding(3, "MSFT", 4.0),
        ];
        json!({
            "total_value": 3085.0,
            "total_cost": 3000.0,
            "total_profit_loss": 85.0,
            "total_profit_loss_percentage": 2.83,
            "holdings_count": holdings.len(),
            "holdings": holdings
        })
    }

    pub fn popular_stocks() -> Value {
        json!([
            { "ticker": "AAPL", "name": "Apple Inc.", "sector": "Technology", "exchange": "NASDAQ" },
            { "ticker": "MSFT", "name": "Microsoft Corporation", "sector": "Technology", "exchange": "NASDAQ" },
            { "ticker": "SPY", "name": "SPDR S&P 500 ETF", "sector": null, "exchange": "NYSE" }
        ])
    }

    pub fn risk_analysis() -> Value {
        json!({
            "overall_risk_score": 54.2,
            "risk_level": "medium",
            "concentration_risk": 61.0,
            "sector_risk": 70.5,
            "country_risk": 35.0,
            "volatility_risk": 48.0,
            "recommendations": ["Consider diversifying across sectors"]
        })
    }

    pub fn latest_insight() -> Value {
        json!({
            "insight": {
                "id": "insight-1",
                "user_id": 1,
                "generated_at": "2024-06-01T12:00:00Z",
                "risk_summary": {
                    "overall_risk_level": "medium",
                    "risk_score": 54.2,
                    "main_concerns": ["Technology concentration"],
                    "volatility_estimate": 0.21
                },
                "diversification_suggestions": [],
                "concentration_alerts": [],
                "key_recommendations": [
                    "Reduce technology exposure below 40%",
                    "Add fixed income allocation"
                ],
                "confidence_score": 0.8
            },
            "portfolio_snapshot": {},
            "processing_time_ms": 420
        })
    }

    pub fn token(access_token: &str) -> Value {
        json!({
            "access_token": access_token,
            "token_type": "bearer"
        })
    }

    pub fn error_response(detail: &str) -> Value {
        json!({ "detail": detail })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::with_base_url("http://127.0.0.1:9999").to_app_config();

        assert_eq!(config.api_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.api_token.as_deref(), Some("test-access-token"));
        assert!(config.is_configured());
    }

    #[test]
    fn test_portfolio_summary_fixture_is_consistent() {
        let summary = MockStockwiseResponses::portfolio_summary();
        let holdings = summary["holdings"].as_array().unwrap();

        assert_eq!(summary["holdings_count"], holdings.len());
        assert_eq!(holdings[0]["ticker"], "AAPL");
    }
}
