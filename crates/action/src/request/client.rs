use std::time::{Duration, Instant};

use async_trait::async_trait;
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::{RequestError, Response};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An outbound HTTP request built by a cloud action.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub json: Option<Value>,
    /// Map non-2xx responses to [`RequestError::Status`].
    pub validate_status: bool,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            json: None,
            validate_status: true,
        }
    }

    /// Creates a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Creates a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Adds a header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.json = Some(body);
        self
    }

    #[must_use]
    pub fn validate_status(mut self, validate: bool) -> Self {
        self.validate_status = validate;
        self
    }

    /// First header value with the given name (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Sends [`HttpRequest`]s. Cloud actions receive one of these.
#[async_trait]
pub trait RequestClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<Response, RequestError>;
}

/// Client-wide options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Per-request timeout.
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("conduit/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// Durations as whole seconds in config files.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// [`RequestClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Creates a new client with default settings
    pub fn new() -> Result<Self, RequestError> {
        Self::with_config(&HttpClientConfig::default())
    }

    pub fn with_config(config: &HttpClientConfig) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RequestError::Build(format!("failed to build client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RequestClient for HttpClient {
    async fn send(&self, request: HttpRequest) -> Result<Response, RequestError> {
        let url = Url::parse(&request.url).map_err(|e| RequestError::InvalidUrl {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;

        let mut builder = self.client.request(request.method.clone(), url);
        for (name, value) in &request.headers {
            let name = http::HeaderName::try_from(name.as_str())
                .map_err(|_| RequestError::InvalidHeader(name.clone()))?;
            let value = http::HeaderValue::try_from(value.as_str())
                .map_err(|_| RequestError::InvalidHeader(name.to_string()))?;
            builder = builder.header(name, value);
        }
        if let Some(json) = &request.json {
            builder = builder.json(json);
        }

        let started = Instant::now();
        let response = builder.send().await?;
        let response = Response::from_reqwest(response, started).await?;

        tracing::debug!(
            method = %request.method,
            url = %response.url,
            status = response.status,
            duration_ms = response.duration_ms,
            "request completed"
        );

        if request.validate_status {
            response.validate_status()
        } else {
            Ok(response)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_collects_parts() {
        let request = HttpRequest::post("https://api.example.com/events")
            .header("X-Api-Key", "k")
            .json(json!({"a": 1}));

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.header_value("x-api-key"), Some("k"));
        assert_eq!(request.json, Some(json!({"a": 1})));
        assert!(request.validate_status);
    }

    #[test]
    fn config_defaults_and_serde() {
        let config = HttpClientConfig::default();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.user_agent.starts_with("conduit/"));

        let parsed: HttpClientConfig =
            serde_json::from_value(json!({"timeout": 5})).unwrap();
        assert_eq!(parsed.timeout, Duration::from_secs(5));
        assert_eq!(parsed.user_agent, config.user_agent);
    }

    #[tokio::test]
    async fn rejects_invalid_url() {
        let client = HttpClient::new().unwrap();
        let err = client.send(HttpRequest::get("not a url")).await.unwrap_err();
        assert!(matches!(err, RequestError::InvalidUrl { .. }));
    }
}
