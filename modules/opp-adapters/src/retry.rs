use std::future::Future;
use std::time::Duration;

use opp_common::error::OppError;
use tracing::warn;

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_SECS: u64 = 2;

/// Retries a fallible call with exponential backoff (base 2, max 3
/// attempts). Does NOT feed the circuit breaker itself — callers record
/// success/failure once all attempts here are exhausted.
pub async fn with_backoff<F, Fut, T>(mut attempt: F) -> Result<T, OppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, OppError>>,
{
    let mut last_err = None;
    for n in 0..MAX_ATTEMPTS {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                warn!(attempt = n + 1, error = %err, "adapter call failed, retrying");
                if n + 1 < MAX_ATTEMPTS {
                    let backoff = Duration::from_secs(BACKOFF_BASE_SECS.pow(n + 1));
                    tokio::time::sleep(backoff).await;
                }
                last_err = Some(err);
            }
        }
    }
    Err(last_err.expect("at least one attempt always runs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_without_retry_when_first_attempt_works() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, OppError> = with_backoff(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(42) }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, OppError> = with_backoff(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(OppError::TransientNetwork("timeout".to_string())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }
}
