//! Unified backoff-and-fallback policy.
//!
//! Every generative call site goes through [`retry_with_fallback`]
//! instead of rolling its own loop: bounded attempts with a doubling
//! delay, then a deterministic fallback supplier. Transient errors are
//! absorbed here and never escape as run failures.

use std::future::Future;
use std::time::Duration;

use siteforge_shared::Result;
use tracing::{debug, warn};

/// Retry knobs for one class of calls.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts before falling back (>= 1).
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles each retry.
    pub backoff_base: Duration,
}

impl RetryPolicy {
    /// Backoff delay before the given retry (attempt numbers start at 1;
    /// there is no delay before the first attempt).
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            Duration::ZERO
        } else {
            self.backoff_base * 2u32.saturating_pow(attempt - 2)
        }
    }
}

/// Outcome of a retried operation.
#[derive(Debug, Clone)]
pub struct Retried<T> {
    /// The produced value, from the operation or the fallback.
    pub value: T,
    /// Attempts made against the real operation.
    pub attempts: u32,
    /// Whether the deterministic fallback supplied the value.
    pub fell_back: bool,
}

/// Run `operation` up to `policy.max_attempts` times with exponential
/// backoff between attempts; on exhaustion, produce the value from
/// `fallback` instead of failing.
pub async fn retry_with_fallback<T, Op, Fut, Fb>(
    policy: RetryPolicy,
    label: &str,
    operation: Op,
    fallback: Fb,
) -> Retried<T>
where
    Op: Fn(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
    Fb: FnOnce() -> T,
{
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let delay = policy.delay_before(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match operation(attempt).await {
            Ok(value) => {
                debug!(label, attempt, "operation succeeded");
                return Retried {
                    value,
                    attempts: attempt,
                    fell_back: false,
                };
            }
            Err(e) => {
                warn!(label, attempt, max_attempts, error = %e, "attempt failed");
            }
        }
    }

    warn!(label, max_attempts, "retries exhausted, using deterministic fallback");
    Retried {
        value: fallback(),
        attempts: max_attempts,
        fell_back: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use siteforge_shared::SiteForgeError;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            backoff_base: Duration::from_millis(1),
        }
    }

    #[test]
    fn delays_double_per_retry() {
        let policy = RetryPolicy {
            max_attempts: 4,
            backoff_base: Duration::from_millis(250),
        };
        assert_eq!(policy.delay_before(1), Duration::ZERO);
        assert_eq!(policy.delay_before(2), Duration::from_millis(250));
        assert_eq!(policy.delay_before(3), Duration::from_millis(500));
        assert_eq!(policy.delay_before(4), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn first_attempt_success_skips_retry() {
        let calls = AtomicU32::new(0);
        let result = retry_with_fallback(
            policy(),
            "test",
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, SiteForgeError>("generated") }
            },
            || "fallback",
        )
        .await;
        assert_eq!(result.value, "generated");
        assert_eq!(result.attempts, 1);
        assert!(!result.fell_back);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn succeeds_on_third_attempt() {
        // Scenario: first two attempts fail, third succeeds.
        let calls = AtomicU32::new(0);
        let result = retry_with_fallback(
            policy(),
            "test",
            |attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(SiteForgeError::Generation("transient".into()))
                    } else {
                        Ok("third time")
                    }
                }
            },
            || "fallback",
        )
        .await;
        assert_eq!(result.value, "third time");
        assert_eq!(result.attempts, 3);
        assert!(!result.fell_back);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_uses_fallback() {
        let result = retry_with_fallback(
            policy(),
            "test",
            |_| async { Err::<&str, _>(SiteForgeError::Generation("always down".into())) },
            || "fallback",
        )
        .await;
        assert_eq!(result.value, "fallback");
        assert_eq!(result.attempts, 3);
        assert!(result.fell_back);
    }

    #[tokio::test]
    async fn zero_attempts_clamps_to_one() {
        let bad_policy = RetryPolicy {
            max_attempts: 0,
            backoff_base: Duration::from_millis(1),
        };
        let result = retry_with_fallback(
            bad_policy,
            "test",
            |_| async { Ok::<_, SiteForgeError>(1) },
            || 0,
        )
        .await;
        assert_eq!(result.value, 1);
        assert_eq!(result.attempts, 1);
    }
}
