//! Retry with exponential back-off and jitter for provider requests.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (timeouts, HTTP 429/502/503/504). Everything else,
//! including other 4xx responses, malformed bodies, and connection failures
//! such as DNS errors, is returned after the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

/// HTTP statuses that signal a shared provider is overloaded or restarting.
const RETRIABLE_STATUSES: [u16; 4] = [429, 502, 503, 504];

/// How many times to retry and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    /// Base delay; the n-th retry waits `initial_delay_ms * 2^n` plus jitter.
    pub initial_delay_ms: u64,
    /// Jitter is drawn uniformly from `0..max_jitter_ms`.
    pub max_jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1_000,
            max_jitter_ms: 1_000,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries immediately. Useful against mock servers.
    #[must_use]
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay_ms: 0,
            max_jitter_ms: 0,
        }
    }

    /// Delay before the retry with zero-based index `retry`, given a jitter sample.
    #[must_use]
    pub fn delay_ms(&self, retry: u32, jitter_ms: u64) -> u64 {
        self.initial_delay_ms
            .saturating_mul(1u64 << retry.min(20))
            .saturating_add(jitter_ms)
    }

    fn sample_jitter_ms(&self) -> u64 {
        if self.max_jitter_ms == 0 {
            0
        } else {
            rand::random_range(0..self.max_jitter_ms)
        }
    }
}

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** request or connect timeouts, and HTTP 429, 502, 503, 504.
///
/// **Not retriable:** any other status, malformed bodies, non-timeout
/// transport failures (refused connections, DNS), and errors that already
/// went through a retry loop.
pub(crate) fn is_retriable(err: &FetchError) -> bool {
    match err {
        FetchError::Http(e) => e.is_timeout(),
        FetchError::UnexpectedStatus { status, .. } => RETRIABLE_STATUSES.contains(status),
        FetchError::MalformedResponse { .. }
        | FetchError::ProviderUnavailable { .. }
        | FetchError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `policy.max_retries` additional attempts on
/// transient errors.
///
/// Every failed attempt is logged with `provider`, `label`, and the attempt
/// number. When retries run out the final error is wrapped in
/// [`FetchError::ProviderUnavailable`]; non-retriable errors come back
/// unchanged.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    provider: &'static str,
    label: &str,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let retriable = is_retriable(&err);
                tracing::warn!(
                    provider,
                    category = label,
                    attempt,
                    max_retries = policy.max_retries,
                    retriable,
                    error = %err,
                    "provider request failed"
                );
                if !retriable {
                    return Err(err);
                }
                if attempt > policy.max_retries {
                    return Err(FetchError::ProviderUnavailable {
                        provider,
                        attempts: attempt,
                        source: Box::new(err),
                    });
                }
                let delay_ms = policy.delay_ms(attempt - 1, policy.sample_jitter_ms());
                tracing::debug!(provider, category = label, delay_ms, "backing off before retry");
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn status_err(status: u16) -> FetchError {
        FetchError::UnexpectedStatus {
            status,
            url: "http://provider.test/api".to_owned(),
        }
    }

    #[test]
    fn overload_statuses_are_retriable() {
        for status in [429, 502, 503, 504] {
            assert!(is_retriable(&status_err(status)), "{status} should retry");
        }
    }

    #[test]
    fn client_errors_are_not_retriable() {
        for status in [400, 401, 403, 404, 500] {
            assert!(!is_retriable(&status_err(status)), "{status} should not retry");
        }
    }

    #[test]
    fn malformed_response_is_not_retriable() {
        assert!(!is_retriable(&FetchError::malformed("overpass", "missing elements")));
    }

    #[test]
    fn exhausted_error_is_not_retried_again() {
        let err = FetchError::ProviderUnavailable {
            provider: "overpass",
            attempts: 4,
            source: Box::new(status_err(503)),
        };
        assert!(!is_retriable(&err));
    }

    #[test]
    fn delay_doubles_per_retry() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_ms(0, 0), 1_000);
        assert_eq!(policy.delay_ms(1, 0), 2_000);
        assert_eq!(policy.delay_ms(2, 250), 4_250);
    }

    #[test]
    fn jitter_stays_below_bound() {
        let policy = RetryPolicy::default();
        for _ in 0..100 {
            assert!(policy.sample_jitter_ms() < 1_000);
        }
        assert_eq!(RetryPolicy::immediate(3).sample_jitter_ms(), 0);
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&RetryPolicy::immediate(3), "overpass", "test", || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, FetchError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn always_unavailable_stops_after_four_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&RetryPolicy::immediate(3), "overpass", "test", || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(status_err(503))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(matches!(
            result,
            Err(FetchError::ProviderUnavailable { attempts: 4, .. })
        ));
    }

    #[tokio::test]
    async fn unauthorized_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&RetryPolicy::immediate(3), "overpass", "test", || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(status_err(401))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1, "401 must not be retried");
        assert!(matches!(
            result,
            Err(FetchError::UnexpectedStatus { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&RetryPolicy::immediate(3), "nominatim", "test", || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err::<u32, _>(status_err(429))
                } else {
                    Ok(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_retries_wraps_first_transient_failure() {
        let result = retry_with_backoff(&RetryPolicy::immediate(0), "overpass", "test", || async {
            Err::<u32, _>(status_err(504))
        })
        .await;
        assert!(matches!(
            result,
            Err(FetchError::ProviderUnavailable { attempts: 1, .. })
        ));
    }
}
