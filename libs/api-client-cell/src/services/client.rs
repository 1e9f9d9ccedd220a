// =====================================================================================
// OPTIMIZED API CLIENT
// =====================================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::channel::oneshot;
use futures::future::{FutureExt, Shared};
use reqwest::{header::ACCEPT, Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, instrument, warn};

use performance_cell::{CacheManager, PerformanceMonitor};
use shared_config::AppConfig;
use shared_models::ApiError;

use crate::models::{RequestBody, RequestOptions};
use crate::services::policy::{resource_prefix, CachePolicy};

type ApiResult = Result<Value, ApiError>;

/// Handle on a running request. Every clone resolves to the same settled result.
type PendingResponse = Shared<oneshot::Receiver<ApiResult>>;

type PendingMap = Arc<Mutex<HashMap<String, PendingResponse>>>;

/// Mutation count per resource prefix. A response is only cached when no
/// mutation on its resource succeeded while it was in flight.
type Generations = Arc<Mutex<HashMap<String, u64>>>;

/// HTTP client for the StockWise backend with response caching and
/// de-duplication of concurrent identical requests.
///
/// The network call of a request runs in its own task: callers that stop
/// waiting do not cancel it, and its result still lands in the cache.
pub struct OptimizedApiClient {
    http: Client,
    base_url: String,
    auth_token: RwLock<Option<String>>,
    policy: CachePolicy,
    cache: Arc<CacheManager>,
    monitor: Arc<PerformanceMonitor>,
    pending: PendingMap,
    generations: Generations,
}

/// Everything the spawned request task needs, owned.
struct RequestJob {
    key: String,
    label: String,
    url: String,
    endpoint: String,
    options: RequestOptions,
    token: Option<String>,
    cache_ttl: Option<Duration>,
    generation: u64,
}

impl OptimizedApiClient {
    pub fn new(
        config: &AppConfig,
        cache: Arc<CacheManager>,
        monitor: Arc<PerformanceMonitor>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            auth_token: RwLock::new(config.api_token.clone()),
            policy: CachePolicy::stockwise(),
            cache,
            monitor,
            pending: Arc::new(Mutex::new(HashMap::new())),
            generations: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn with_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> &Arc<CacheManager> {
        &self.cache
    }

    pub fn monitor(&self) -> &Arc<PerformanceMonitor> {
        &self.monitor
    }

    pub async fn set_auth_token(&self, token: impl Into<String>) {
        *self.auth_token.write().await = Some(token.into());
    }

    pub async fn clear_auth_token(&self) {
        *self.auth_token.write().await = None;
    }

    pub async fn has_auth_token(&self) -> bool {
        self.auth_token.read().await.is_some()
    }

    pub async fn clear_cache(&self) -> usize {
        self.cache.clear().await
    }

    /// Number of network calls currently outstanding.
    pub async fn in_flight(&self) -> usize {
        self.pending.lock().await.len()
    }

    fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> ApiResult {
        let url = self.url_for(endpoint);
        let key = options.cache_key(&url);
        let cacheable = self.policy.is_cacheable(&options.method, endpoint);

        let response = {
            // Held across the cache lookup so that a request settling in between
            // is observed either in the cache or in the pending map.
            let mut pending = self.pending.lock().await;

            if cacheable {
                if let Some(data) = self.cache.get(&key).await {
                    return Ok(data);
                }
            }

            if let Some(response) = pending.get(&key) {
                debug!("Joining in-flight request: {} {}", options.method, url);
                response.clone()
            } else {
                let generation = self.generation_of(endpoint).await;
                let job = RequestJob {
                    key: key.clone(),
                    label: format!("{} {}", options.method, endpoint),
                    url,
                    endpoint: endpoint.to_string(),
                    cache_ttl: cacheable.then(|| self.policy.ttl_for(endpoint)),
                    token: self.auth_token.read().await.clone(),
                    options,
                    generation,
                };
                let response = self.spawn_request(job);
                pending.insert(key, response.clone());
                response
            }
        };

        response.await.unwrap_or_else(|_| {
            Err(ApiError::Cancelled(
                "request task ended without a result".to_string(),
            ))
        })
    }

    async fn generation_of(&self, endpoint: &str) -> u64 {
        match resource_prefix(endpoint) {
            Some(prefix) => self.generations.lock().await.get(&prefix).copied().unwrap_or(0),
            None => 0,
        }
    }

    fn spawn_request(&self, job: RequestJob) -> PendingResponse {
        let (sender, receiver) = oneshot::channel();

        let http = self.http.clone();
        let cache = self.cache.clone();
        let monitor = self.monitor.clone();
        let pending = self.pending.clone();
        let generations = self.generations.clone();

        tokio::spawn(async move {
            let method = job.options.method.clone();
            let result = monitor
                .measure_api_call(
                    &job.label,
                    execute(&http, method.clone(), &job.url, job.token, job.options.body),
                )
                .await;

            if let Ok(data) = &result {
                let prefix = resource_prefix(&job.endpoint);
                // Held across the check and the cache write so that an
                // invalidation cannot land in between.
                let mut counts = generations.lock().await;

                if let Some(ttl) = job.cache_ttl {
                    let current = prefix
                        .as_ref()
                        .and_then(|prefix| counts.get(prefix).copied())
                        .unwrap_or(0);
                    if current == job.generation {
                        cache.set(&job.key, data.clone(), ttl).await;
                    } else {
                        debug!("Discarding stale response: {}", job.label);
                    }
                }
                if method != Method::GET {
                    if let Some(prefix) = prefix {
                        cache.invalidate_matching(&prefix).await;
                        *counts.entry(prefix).or_insert(0) += 1;
                    }
                }
            }

            // Leave the pending map before publishing, so later callers either
            // see the cached value or start a fresh request.
            pending.lock().await.remove(&job.key);
            sender.send(result).ok();
        });

        receiver.shared()
    }

    pub async fn get(&self, endpoint: &str) -> ApiResult {
        self.request(endpoint, RequestOptions::get()).await
    }

    pub async fn post(&self, endpoint: &str, body: Value) -> ApiResult {
        self.request(endpoint, RequestOptions::with_json(Method::POST, body))
            .await
    }

    pub async fn put(&self, endpoint: &str, body: Value) -> ApiResult {
        self.request(endpoint, RequestOptions::with_json(Method::PUT, body))
            .await
    }

    pub async fn delete(&self, endpoint: &str) -> ApiResult {
        self.request(endpoint, RequestOptions::delete()).await
    }

    pub async fn get_json<T>(&self, endpoint: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let data = self.get(endpoint).await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let data = self.post(endpoint, serde_json::to_value(body)?).await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn put_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let data = self.put(endpoint, serde_json::to_value(body)?).await?;
        Ok(serde_json::from_value(data)?)
    }

    pub async fn post_form<T>(&self, endpoint: &str, fields: Vec<(String, String)>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let data = self
            .request(endpoint, RequestOptions::with_form(Method::POST, fields))
            .await?;
        Ok(serde_json::from_value(data)?)
    }
}

async fn execute(
    http: &Client,
    method: Method,
    url: &str,
    token: Option<String>,
    body: Option<RequestBody>,
) -> ApiResult {
    debug!("Making request: {} {}", method, url);

    let mut request = http
        .request(method.clone(), url)
        .header(ACCEPT, "application/json");

    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    request = match body {
        Some(RequestBody::Json(value)) => request.json(&value),
        Some(RequestBody::Form(fields)) => request.form(&fields),
        None => request,
    };

    let response = request.send().await.map_err(|e| {
        error!("Request failed: {} {}: {}", method, url, e);
        ApiError::from(e)
    })?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        warn!("API error ({}) for {} {}: {}", status, method, url, error_text);

        return Err(ApiError::Http {
            status: status.as_u16(),
            message: error_message(status, &error_text),
        });
    }

    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }

    Ok(serde_json::from_slice(&bytes)?)
}

/// The backend's `detail` field when present, otherwise the status reason phrase.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("detail").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string())
}
