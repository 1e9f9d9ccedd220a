use std::time::Duration;

use reqwest::Method;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheRule {
    pub pattern: String,
    pub ttl: Duration,
}

/// Decides which responses are cached and for how long.
///
/// Caching is opt-in: only GET requests whose endpoint contains one of the
/// allow-listed substrings are stored. The TTL comes from the first matching
/// rule, falling back to `default_ttl`.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    allow_list: Vec<String>,
    ttl_rules: Vec<CacheRule>,
    default_ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::stockwise()
    }
}

impl CachePolicy {
    /// A policy that caches nothing.
    pub fn disabled() -> Self {
        Self {
            allow_list: Vec::new(),
            ttl_rules: Vec::new(),
            default_ttl: DEFAULT_TTL,
        }
    }

    /// The StockWise endpoint table. More specific patterns come first.
    pub fn stockwise() -> Self {
        Self::disabled()
            // static reference data
            .with_rule("/stocks/popular", Duration::from_secs(24 * HOUR))
            .with_rule("/news/sources", Duration::from_secs(24 * HOUR))
            .with_rule("/news/sectors", Duration::from_secs(24 * HOUR))
            .with_rule("/stocks/search", Duration::from_secs(2 * HOUR))
            // derived analytics
            .with_rule("/insights/latest", Duration::from_secs(30 * MINUTE))
            .with_rule("/charts/", Duration::from_secs(30 * MINUTE))
            .with_rule("/risk", Duration::from_secs(15 * MINUTE))
            .with_rule("/news", Duration::from_secs(10 * MINUTE))
            // prices and portfolio summaries
            .with_rule("/stocks/quote", Duration::from_secs(5 * MINUTE))
            .with_rule("/holdings/portfolio", Duration::from_secs(5 * MINUTE))
            .with_rule("/holdings/allocation", Duration::from_secs(5 * MINUTE))
            .allow("/holdings")
            .allow("/auth/me")
    }

    /// Makes `pattern` cacheable with its own TTL.
    pub fn with_rule(mut self, pattern: &str, ttl: Duration) -> Self {
        self.ttl_rules.push(CacheRule {
            pattern: pattern.to_string(),
            ttl,
        });
        self.allow(pattern)
    }

    /// Makes `pattern` cacheable with the default TTL.
    pub fn allow(mut self, pattern: &str) -> Self {
        if !self.allow_list.iter().any(|p| p == pattern) {
            self.allow_list.push(pattern.to_string());
        }
        self
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn is_cacheable(&self, method: &Method, endpoint: &str) -> bool {
        *method == Method::GET && self.allow_list.iter().any(|p| endpoint.contains(p.as_str()))
    }

    pub fn ttl_for(&self, endpoint: &str) -> Duration {
        self.ttl_rules
            .iter()
            .find(|rule| endpoint.contains(rule.pattern.as_str()))
            .map(|rule| rule.ttl)
            .unwrap_or(self.default_ttl)
    }

    pub fn rules(&self) -> &[CacheRule] {
        &self.ttl_rules
    }
}

/// First path segment of an endpoint, e.g. `/holdings` for `/holdings/42`.
///
/// A successful mutation invalidates every cached key containing it.
pub fn resource_prefix(endpoint: &str) -> Option<String> {
    let path = endpoint.split(['?', '#']).next().unwrap_or_default();
    path.split('/')
        .find(|segment| !segment.is_empty())
        .map(|segment| format!("/{}", segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_get_requests_are_cacheable() {
        let policy = CachePolicy::stockwise();

        assert!(policy.is_cacheable(&Method::GET, "/stocks/popular"));
        assert!(!policy.is_cacheable(&Method::POST, "/stocks/popular"));
        assert!(!policy.is_cacheable(&Method::DELETE, "/holdings/7"));
    }

    #[test]
    fn test_unlisted_endpoints_are_not_cacheable() {
        let policy = CachePolicy::stockwise();

        assert!(!policy.is_cacheable(&Method::GET, "/bookmarks"));
        assert!(!policy.is_cacheable(&Method::GET, "/auth/refresh"));
    }

    #[test]
    fn test_ttl_lookup() {
        let policy = CachePolicy::stockwise();

        assert_eq!(policy.ttl_for("/stocks/popular"), Duration::from_secs(86_400));
        assert_eq!(policy.ttl_for("/news/sources"), Duration::from_secs(86_400));
        assert_eq!(policy.ttl_for("/news/?limit=20"), Duration::from_secs(600));
        assert_eq!(policy.ttl_for("/stocks/search?q=AAPL"), Duration::from_secs(7_200));
        assert_eq!(policy.ttl_for("/holdings/portfolio"), Duration::from_secs(300));
        assert_eq!(policy.ttl_for("/risk/heatmap"), Duration::from_secs(900));
    }

    #[test]
    fn test_allow_only_pattern_uses_default_ttl() {
        let policy = CachePolicy::stockwise();

        assert!(policy.is_cacheable(&Method::GET, "/holdings/"));
        assert_eq!(policy.ttl_for("/holdings/"), DEFAULT_TTL);
    }

    #[test]
    fn test_custom_policy() {
        let policy = CachePolicy::disabled()
            .with_default_ttl(Duration::from_secs(1))
            .allow("/ping");

        assert!(policy.is_cacheable(&Method::GET, "/ping"));
        assert!(!policy.is_cacheable(&Method::GET, "/stocks/popular"));
        assert_eq!(policy.ttl_for("/ping"), Duration::from_secs(1));
        assert!(policy.rules().is_empty());
    }

    #[test]
    fn test_resource_prefix() {
        assert_eq!(resource_prefix("/holdings/42").as_deref(), Some("/holdings"));
        assert_eq!(resource_prefix("holdings/").as_deref(), Some("/holdings"));
        assert_eq!(resource_prefix("/news/1/bookmark?x=1").as_deref(), Some("/news"));
        assert_eq!(resource_prefix("/"), None);
    }
}
