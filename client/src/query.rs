//! Read helper that retries transient failures once.
//!
//! Mutations never go through here: a duplicated `POST` is worse than a
//! visible error.

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;

use std::future::Future;

use crate::error::ApiError;

/// Run `op`; if it fails with a retryable error, run it exactly once more.
///
/// # Errors
///
/// Returns the first non-retryable error, or the second attempt's error.
pub async fn fetch<T, F, Fut>(mut op: F) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    match op().await {
        Err(error) if error.retryable() => {
            tracing::debug!(%error, "retrying read once");
            op().await
        }
        other => other,
    }
}
