use reqwest::Method;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    /// `application/x-www-form-urlencoded` fields, in order.
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Stable text form of the body, used as the last segment of the cache key.
    pub fn serialize(&self) -> String {
        match self {
            RequestBody::Json(value) => value.to_string(),
            RequestBody::Form(fields) => fields
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("&"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<RequestBody>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn delete() -> Self {
        Self {
            method: Method::DELETE,
            body: None,
        }
    }

    pub fn with_json(method: Method, body: Value) -> Self {
        Self {
            method,
            body: Some(RequestBody::Json(body)),
        }
    }

    pub fn with_form(method: Method, fields: Vec<(String, String)>) -> Self {
        Self {
            method,
            body: Some(RequestBody::Form(fields)),
        }
    }

    /// `METHOD:url:serialized-body`, with an empty last segment when there is no body.
    pub fn cache_key(&self, url: &str) -> String {
        let body = self
            .body
            .as_ref()
            .map(RequestBody::serialize)
            .unwrap_or_default();
        format!("{}:{}:{}", self.method, url, body)
    }
}
