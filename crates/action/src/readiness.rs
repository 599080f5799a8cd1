//! Waiting for a vendor SDK to finish loading.

use std::future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::ActionError;

/// Polling interval used when a destination does not pick its own.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Bounds on a readiness wait.
///
/// The default has neither a timeout nor a token: the wait lasts until
/// the predicate holds, however long that takes.
#[derive(Debug, Clone, Default)]
pub struct ReadinessOptions {
    pub timeout: Option<Duration>,
    pub cancellation: Option<CancellationToken>,
}

impl ReadinessOptions {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Resolve once `predicate` returns `true`.
///
/// The predicate is checked immediately, then once per `interval`.
///
/// # Errors
///
/// - [`ActionError::ReadinessTimeout`] when `options.timeout` elapses first.
/// - [`ActionError::Cancelled`] when `options.cancellation` fires first.
pub async fn resolve_when<F>(
    mut predicate: F,
    interval: Duration,
    options: ReadinessOptions,
) -> Result<(), ActionError>
where
    F: FnMut() -> bool + Send,
{
    let started = Instant::now();

    let ready = async {
        loop {
            if predicate() {
                return;
            }
            tokio::time::sleep(interval).await;
        }
    };

    let cancelled = async {
        match &options.cancellation {
            Some(token) => token.cancelled().await,
            None => future::pending().await,
        }
    };

    let deadline = async {
        match options.timeout {
            Some(limit) => tokio::time::sleep(limit).await,
            None => future::pending().await,
        }
    };

    tokio::select! {
        biased;
        () = ready => {
            tracing::debug!(waited_ms = started.elapsed().as_millis() as u64, "sdk ready");
            Ok(())
        }
        () = cancelled => Err(ActionError::Cancelled),
        () = deadline => {
            let waited = started.elapsed();
            tracing::warn!(waited_ms = waited.as_millis() as u64, "sdk readiness timed out");
            Err(ActionError::ReadinessTimeout { waited })
        }
    }
}
