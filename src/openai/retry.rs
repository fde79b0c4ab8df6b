use std::time::{Duration, Instant};

use tokio::time::sleep;

use crate::check_cancelled;
use crate::constants::{RETRY_BASE_DELAY_MS, RETRY_MAX_ATTEMPTS, RETRY_MAX_DELAY_MS};
use crate::error::ProxyError;
use crate::handlers::RequestScope;
use crate::logging::log_attempt;

/// Exponential backoff delay before retry `n` (0-based): min(1s * 2^n, 30s).
pub fn backoff_delay(retry: u32) -> Duration {
    let base = Duration::from_millis(RETRY_BASE_DELAY_MS);
    let cap = Duration::from_millis(RETRY_MAX_DELAY_MS);
    base.saturating_mul(1u32 << retry.min(16)).min(cap)
}

/// Run a backend call with the gateway retry policy: one initial attempt
/// plus up to three retries, only for retryable failure classes. Each
/// attempt emits a metadata log record. Cancellation is honored between
/// attempts and during backoff sleeps.
pub async fn execute_with_retry<F, Fut, T>(
    operation: &str,
    scope: &RequestScope,
    op: F,
) -> Result<T, ProxyError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<(T, u16), ProxyError>>,
{
    let mut attempt = 0u32;
    loop {
        check_cancelled!(scope.token);

        let start = Instant::now();
        match op().await {
            Ok((value, status)) => {
                log_attempt(&scope.correlation_id, operation, attempt + 1, Ok(status), start);
                return Ok(value);
            }
            Err(e) if e.is_cancelled() => return Err(e),
            Err(e) => {
                log_attempt(
                    &scope.correlation_id,
                    operation,
                    attempt + 1,
                    Err(&e.message),
                    start,
                );

                if attempt + 1 >= RETRY_MAX_ATTEMPTS || !e.is_retryable() {
                    return Err(e);
                }

                tokio::select! {
                    _ = sleep(backoff_delay(attempt)) => {}
                    _ = scope.token.cancelled() => {
                        return Err(ProxyError::request_cancelled());
                    }
                }
                attempt += 1;
            }
        }
    }
}
