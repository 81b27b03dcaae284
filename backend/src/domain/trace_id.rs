//! Request-scoped trace identifier for correlation across logs and errors.
//!
//! `TraceId` lives in task-local storage so the current identifier is
//! available without threading it through every call. Task-locals are not
//! inherited by spawned tasks or blocking threads; use [`TraceId::scope`] for
//! futures and [`TraceId::run_blocking`] for CPU-bound work such as password
//! hashing.

use std::future::Future;

use tokio::task::JoinError;
use tokio::task_local;
use uuid::Uuid;

/// Response header carrying the trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static TRACE_ID: TraceId;
}

/// Per-request trace identifier exposed via task-local storage.
///
/// # Examples
/// ```
/// use tracklist::TraceId;
///
/// async fn handler() -> Option<String> {
///     TraceId::current().map(|id| id.to_string())
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a new random trace identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the current trace identifier if one is in scope.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Execute the provided future with the supplied trace identifier in scope.
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }

    /// Run a blocking closure on Tokio's blocking pool, carrying the current
    /// trace identifier (if any) onto the worker thread.
    ///
    /// # Errors
    /// Returns the [`JoinError`] when the closure panics or the runtime shuts
    /// down before it completes.
    pub async fn run_blocking<F, R>(work: F) -> Result<R, JoinError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let current = Self::current();
        tokio::task::spawn_blocking(move || match current {
            Some(trace_id) => TRACE_ID.sync_scope(trace_id, work),
            None => work(),
        })
        .await
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn current_reflects_scope() {
        let expected = TraceId::generate();
        let observed = TraceId::scope(expected, async move { TraceId::current() }).await;
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn current_is_none_out_of_scope() {
        assert!(TraceId::current().is_none());
    }

    #[tokio::test]
    async fn run_blocking_carries_trace_id() {
        let expected = TraceId::generate();
        let observed = TraceId::scope(expected, async {
            TraceId::run_blocking(TraceId::current).await
        })
        .await
        .expect("blocking task completes");
        assert_eq!(observed, Some(expected));
    }

    #[tokio::test]
    async fn run_blocking_without_scope_has_no_trace_id() {
        let observed = TraceId::run_blocking(TraceId::current)
            .await
            .expect("blocking task completes");
        assert!(observed.is_none());
    }

    #[test]
    fn from_str_round_trips() {
        let uuid = Uuid::nil();
        let trace_id: TraceId = uuid.to_string().parse().expect("parse uuid");
        assert_eq!(trace_id.to_string(), uuid.to_string());
    }
}
