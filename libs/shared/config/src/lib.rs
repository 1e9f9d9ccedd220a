use std::env;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout_secs: u64,
    pub gateway_host: String,
    pub gateway_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            gateway_host: "127.0.0.1".to_string(),
            gateway_port: 3000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            api_base_url: env::var("STOCKWISE_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| {
                    warn!("STOCKWISE_API_URL not set, using {}", DEFAULT_API_URL);
                    defaults.api_base_url.clone()
                }),
            api_token: env::var("STOCKWISE_API_TOKEN")
                .ok()
                .filter(|token| !token.is_empty()),
            request_timeout_secs: parse_or_default(
                "STOCKWISE_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            ),
            gateway_host: env::var("GATEWAY_HOST").unwrap_or(defaults.gateway_host),
            gateway_port: parse_or_default("GATEWAY_PORT", defaults.gateway_port),
        };

        if !config.is_configured() {
            warn!("STOCKWISE_API_TOKEN not set - authenticated endpoints will be rejected upstream");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty() && self.api_token.is_some()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.gateway_host, self.gateway_port)
    }
}

fn parse_or_default<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert!(!config.is_configured());
    }

    #[test]
    fn test_configured_with_token() {
        let config = AppConfig {
            api_token: Some("token".to_string()),
            ..AppConfig::default()
        };

        assert!(config.is_configured());
    }
}
