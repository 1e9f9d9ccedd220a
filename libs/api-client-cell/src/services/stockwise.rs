use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument, warn};

use shared_models::auth::{LoginRequest, RegisterRequest, Token, User};
use shared_models::holding::{
    AllocationData, CreateHoldingRequest, Holding, PortfolioSummary, StockQuote,
    StockSearchResult, UpdateHoldingRequest,
};
use shared_models::insight::{InsightRequest, InsightResponse};
use shared_models::ApiError;

use crate::services::OptimizedApiClient;

/// Typed endpoints of the StockWise backend.
///
/// Paths are relative to the configured base URL (`.../api/v1`).
#[derive(Clone)]
pub struct StockwiseApi {
    client: Arc<OptimizedApiClient>,
}

impl StockwiseApi {
    pub fn new(client: Arc<OptimizedApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<OptimizedApiClient> {
        &self.client
    }

    // ---------------------------------------------------------------------------------
    // Auth
    // ---------------------------------------------------------------------------------

    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiError> {
        self.client.post_json("/auth/register", request).await
    }

    /// Logs in with the password grant and keeps the token for later calls.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Token, ApiError> {
        let token: Token = self
            .client
            .post_form(
                "/auth/login",
                vec![
                    ("username".to_string(), credentials.username.clone()),
                    ("password".to_string(), credentials.password.clone()),
                ],
            )
            .await?;

        self.client.set_auth_token(token.access_token.clone()).await;
        info!("Logged in");
        Ok(token)
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        self.client.get_json("/auth/me").await
    }

    pub async fn refresh(&self) -> Result<Token, ApiError> {
        let token: Token = self.client.post_json("/auth/refresh", &Value::Null).await?;
        self.client.set_auth_token(token.access_token.clone()).await;
        Ok(token)
    }

    /// Ends the session. Local credentials and every cached response are
    /// dropped even when the backend call fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.client.post("/auth/logout", Value::Null).await;

        self.client.clear_auth_token().await;
        let cleared = self.client.clear_cache().await;
        info!("Logged out, {} cached responses dropped", cleared);

        if let Err(err) = &result {
            warn!("Logout request failed: {}", err);
        }
        result.map(|_| ())
    }

    // ---------------------------------------------------------------------------------
    // Holdings
    // ---------------------------------------------------------------------------------

    pub async fn list_holdings(&self) -> Result<Vec<Holding>, ApiError> {
        self.client.get_json("/holdings/").await
    }

    pub async fn create_holding(&self, request: &CreateHoldingRequest) -> Result<Holding, ApiError> {
        self.client.post_json("/holdings/", request).await
    }

    pub async fn update_holding(
        &self,
        holding_id: i64,
        request: &UpdateHoldingRequest,
    ) -> Result<Holding, ApiError> {
        self.client
            .put_json(&format!("/holdings/{}", holding_id), request)
            .await
    }

    pub async fn delete_holding(&self, holding_id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/holdings/{}", holding_id))
            .await
            .map(|_| ())
    }

    pub async fn portfolio_summary(&self) -> Result<PortfolioSummary, ApiError> {
        self.client.get_json("/holdings/portfolio").await
    }

    pub async fn allocation(&self) -> Result<AllocationData, ApiError> {
        self.client.get_json("/holdings/allocation").await
    }

    // ---------------------------------------------------------------------------------
    // Risk
    // ---------------------------------------------------------------------------------

    pub async fn risk_analysis(&self) -> Result<Value, ApiError> {
        self.client.get("/risk/").await
    }

    pub async fn risk_heatmap(&self) -> Result<Value, ApiError> {
        self.client.get("/risk/heatmap").await
    }

    pub async fn risk_metrics(&self) -> Result<Value, ApiError> {
        self.client.get("/risk/metrics").await
    }

    // ---------------------------------------------------------------------------------
    // Insights
    // ---------------------------------------------------------------------------------

    pub async fn generate_insight(&self, request: &InsightRequest) -> Result<InsightResponse, ApiError> {
        self.client.post_json("/insights/", request).await
    }

    pub async fn latest_insight(&self) -> Result<InsightResponse, ApiError> {
        self.client.get_json("/insights/latest").await
    }

    // ---------------------------------------------------------------------------------
    // News & stocks
    // ---------------------------------------------------------------------------------

    pub async fn news(&self, limit: Option<u32>) -> Result<Value, ApiError> {
        match limit {
            Some(limit) => self.client.get(&format!("/news/?limit={}", limit)).await,
            None => self.client.get("/news/").await,
        }
    }

    pub async fn market_sentiment(&self) -> Result<Value, ApiError> {
        self.client.get("/news/sentiment").await
    }

    pub async fn popular_stocks(&self) -> Result<Vec<StockSearchResult>, ApiError> {
        self.client.get_json("/stocks/popular").await
    }

    pub async fn search_stocks(&self, query: &str) -> Result<Vec<StockSearchResult>, ApiError> {
        self.client
            .get_json(&format!("/stocks/search?q={}", urlencoding::encode(query)))
            .await
    }

    pub async fn stock_quote(&self, ticker: &str) -> Result<StockQuote, ApiError> {
        self.client
            .get_json(&format!("/stocks/quote/{}", urlencoding::encode(&ticker.to_uppercase())))
            .await
    }
}
