use std::time::Duration;

use conduit_core::{ActionKeyError, SlugError};
use conduit_mapping::MappingError;
use conduit_schema::SchemaError;

use crate::request::RequestError;
use crate::subscription::SubscriptionError;

/// Error type for all action operations.
///
/// Distinguishes retryable from fatal errors so the caller can decide
/// retry policy. Nothing in this crate retries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ActionError {
    /// Payload or settings failed validation before `perform` ran.
    #[error("validation: {0}")]
    Validation(String),

    /// The vendor answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never got a response.
    #[error("network: {0}")]
    Network(String),

    /// Permanent failure; never retry.
    #[error("fatal: {0}")]
    Fatal(String),

    /// The SDK did not become ready in time.
    #[error("SDK not ready after {waited:?}")]
    ReadinessTimeout { waited: Duration },

    /// Execution cancelled via cancellation token.
    #[error("cancelled")]
    Cancelled,

    /// No action with this key is registered on the destination.
    #[error("unknown action `{action}` on destination `{destination}`")]
    UnknownAction { destination: String, action: String },
}

impl ActionError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a fatal (non-retryable) error.
    pub fn fatal(msg: impl Into<String>) -> Self {
        Self::Fatal(msg.into())
    }

    /// Returns `true` if the caller could reasonably retry.
    ///
    /// 5xx, 429 and transport failures are retryable; everything else is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::Network(_) => true,
            _ => false,
        }
    }

    /// HTTP status, for [`ActionError::Http`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Machine-readable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ACTION_VALIDATION",
            Self::Http { .. } => "ACTION_HTTP",
            Self::Network(_) => "ACTION_NETWORK",
            Self::Fatal(_) => "ACTION_FATAL",
            Self::ReadinessTimeout { .. } => "ACTION_READINESS_TIMEOUT",
            Self::Cancelled => "ACTION_CANCELLED",
            Self::UnknownAction { .. } => "ACTION_UNKNOWN",
        }
    }

    /// Broad error category for grouping in logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::UnknownAction { .. } => "validation",
            Self::Http { .. } | Self::Network(_) => "network",
            Self::ReadinessTimeout { .. } | Self::Cancelled => "readiness",
            Self::Fatal(_) => "fatal",
        }
    }
}

impl From<MappingError> for ActionError {
    fn from(err: MappingError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<SchemaError> for ActionError {
    fn from(err: SchemaError) -> Self {
        Self::Validation(format!("settings: {err}"))
    }
}

impl From<RequestError> for ActionError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Status { status, body } => Self::Http { status, body },
            RequestError::Network(msg) | RequestError::Timeout(msg) => Self::Network(msg),
            other => Self::Fatal(other.to_string()),
        }
    }
}

impl From<SubscriptionError> for ActionError {
    fn from(err: SubscriptionError) -> Self {
        Self::Fatal(format!("invalid subscription: {err}"))
    }
}

impl From<ActionKeyError> for ActionError {
    fn from(err: ActionKeyError) -> Self {
        Self::Fatal(err.to_string())
    }
}

impl From<SlugError> for ActionError {
    fn from(err: SlugError) -> Self {
        Self::Fatal(err.to_string())
    }
}

impl From<serde_json::Error> for ActionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(format!("payload: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(400, false)]
    #[case(403, false)]
    #[case(429, true)]
    #[case(500, true)]
    #[case(502, true)]
    fn http_retryability(#[case] status: u16, #[case] retryable: bool) {
        let err: ActionError = RequestError::Status {
            status,
            body: "nope".into(),
        }
        .into();
        assert_eq!(err.status(), Some(status));
        assert_eq!(err.is_retryable(), retryable);
        assert_eq!(err.code(), "ACTION_HTTP");
    }

    #[test]
    fn transport_failures_are_retryable() {
        let err: ActionError = RequestError::Timeout("30s".into()).into();
        assert_eq!(err, ActionError::Network("30s".into()));
        assert!(err.is_retryable());
    }

    #[test]
    fn malformed_requests_are_fatal() {
        let err: ActionError = RequestError::InvalidHeader("X\n".into()).into();
        assert!(matches!(err, ActionError::Fatal(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn mapping_errors_become_validation() {
        let err: ActionError = MappingError::MissingRequired {
            field: "user_keys".into(),
        }
        .into();
        assert_eq!(
            err,
            ActionError::Validation("missing required field `user_keys`".into())
        );
        assert_eq!(err.category(), "validation");
    }

    #[test]
    fn readiness_errors() {
        let err = ActionError::ReadinessTimeout {
            waited: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "SDK not ready after 5s");
        assert!(!err.is_retryable());
        assert_eq!(ActionError::Cancelled.category(), "readiness");
    }
}
