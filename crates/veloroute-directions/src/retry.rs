//! Bounded retry for transient directions-provider faults.
//!
//! The provider occasionally answers 429/500/503 under load. Those are worth
//! a small fixed number of extra attempts after a short fixed delay; every
//! other failure (bad request, empty path set, malformed body) is returned
//! immediately because retrying cannot change the answer.

use std::future::Future;
use std::time::Duration;

use crate::error::DirectionsError;

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors, sleeping `retry_delay_ms` before each retry.
///
/// With `max_retries = 1` the operation runs at most twice. Non-transient
/// errors are returned without sleeping.
pub(crate) async fn retry_transient<T, F, Fut>(
    max_retries: u32,
    retry_delay_ms: u64,
    mut operation: F,
) -> Result<T, DirectionsError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DirectionsError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_transient() || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                tracing::warn!(
                    attempt,
                    max_retries,
                    retry_delay_ms,
                    error = %err,
                    "transient directions provider error, retrying after delay"
                );
                tokio::time::sleep(Duration::from_millis(retry_delay_ms)).await;
            }
        }
    }
}
