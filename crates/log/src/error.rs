use thiserror::Error;

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LogError {
    /// The level directive is not a valid `EnvFilter`.
    #[error("invalid filter `{directive}`: {reason}")]
    Filter { directive: String, reason: String },

    /// The log format name is unknown.
    #[error("unknown log format `{0}`")]
    Format(String),

    /// A global subscriber is already installed.
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(String),
}

pub type LogResult<T> = Result<T, LogError>;
