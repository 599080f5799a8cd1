use thiserror::Error;

/// Errors that can occur when sending a request.
#[derive(Error, Debug)]
pub enum RequestError {
    /// The URL could not be parsed.
    #[error("invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A header name or value is not valid HTTP.
    #[error("invalid header `{0}`")]
    InvalidHeader(String),

    /// The underlying client could not be built.
    #[error("build error: {0}")]
    Build(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection, DNS or transport failure.
    #[error("request failed: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RequestError {
    /// HTTP status code, when the server responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a caller-side retry could succeed.
    ///
    /// Only classifies; nothing in this crate retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Network(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidUrl { .. }
            | Self::InvalidHeader(_)
            | Self::Build(_)
            | Self::Serialization(_) => false,
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_builder() {
            Self::Build(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(400, false)]
    #[case(401, false)]
    #[case(404, false)]
    #[case(429, true)]
    #[case(500, true)]
    #[case(503, true)]
    fn status_retryability(#[case] status: u16, #[case] retryable: bool) {
        let err = RequestError::Status {
            status,
            body: String::new(),
        };
        assert_eq!(err.is_retryable(), retryable);
        assert_eq!(err.status(), Some(status));
    }

    #[test]
    fn transport_errors_are_retryable() {
        assert!(RequestError::Network("connection reset".into()).is_retryable());
        assert!(RequestError::Timeout("30s".into()).is_retryable());
        assert!(!RequestError::InvalidHeader("X-Bad\n".into()).is_retryable());
    }
}
