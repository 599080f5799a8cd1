use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RequestError;

/// Response status category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatusCategory {
    Informational,
    Success,
    Redirection,
    ClientError,
    ServerError,
    Unknown,
}

/// HTTP response as seen by an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code
    pub status: u16,

    /// Response headers, names lowercased.
    pub headers: HashMap<String, String>,

    /// Body parsed as JSON, when it was JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    /// Raw body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Final URL.
    pub url: String,

    /// Request duration in milliseconds
    pub duration_ms: u64,
}

impl Response {
    pub fn new(status: u16, url: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
            text: None,
            url: url.into(),
            duration_ms: 0,
        }
    }

    pub(crate) async fn from_reqwest(
        response: reqwest::Response,
        started: Instant,
    ) -> Result<Self, RequestError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_owned(), v.to_owned()))
            })
            .collect();

        let text = response.text().await?;
        let body = if text.is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };

        Ok(Self {
            status,
            headers,
            body,
            text: (!text.is_empty()).then_some(text),
            url,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    pub fn status_category(&self) -> ResponseStatusCategory {
        match self.status {
            100..=199 => ResponseStatusCategory::Informational,
            200..=299 => ResponseStatusCategory::Success,
            300..=399 => ResponseStatusCategory::Redirection,
            400..=499 => ResponseStatusCategory::ClientError,
            500..=599 => ResponseStatusCategory::ServerError,
            _ => ResponseStatusCategory::Unknown,
        }
    }

    /// Gets a header by name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Parse the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        match (&self.body, &self.text) {
            (Some(value), _) => Ok(T::deserialize(value)?),
            (None, Some(text)) => Ok(serde_json::from_str(text)?),
            (None, None) => Ok(serde_json::from_value(Value::Null)?),
        }
    }

    #[must_use]
    pub fn with_json(mut self, json: Value) -> Self {
        self.text = Some(json.to_string());
        self.body = Some(json);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Turn a non-2xx response into [`RequestError::Status`].
    pub fn validate_status(self) -> Result<Self, RequestError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(RequestError::Status {
                status: self.status,
                body: self.text.unwrap_or_default(),
            })
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Response [{}] {} ({} ms) - {} bytes",
            self.status,
            self.url,
            self.duration_ms,
            self.text.as_ref().map_or(0, String::len)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_categories() {
        assert!(Response::new(204, "u").is_success());
        assert!(Response::new(404, "u").is_client_error());
        assert!(Response::new(502, "u").is_server_error());
        assert_eq!(
            Response::new(301, "u").status_category(),
            ResponseStatusCategory::Redirection
        );
    }

    #[test]
    fn validate_status_keeps_body() {
        let ok = Response::new(200, "u").validate_status();
        assert!(ok.is_ok());

        let err = Response::new(401, "u")
            .with_json(json!({"error": "bad key"}))
            .validate_status()
            .unwrap_err();
        match err {
            RequestError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, r#"{"error":"bad key"}"#);
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let response = Response::new(200, "u").with_header("content-type", "application/json");
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn json_reads_body() {
        #[derive(Deserialize)]
        struct Ack {
            ok: bool,
        }
        let response = Response::new(200, "u").with_json(json!({"ok": true}));
        assert!(response.json::<Ack>().unwrap().ok);
    }
}
