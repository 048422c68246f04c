//! Exponential backoff for transient chat completion failures.

use std::future::Future;
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use revline_core::RevlineError;
use tracing::warn;

const INITIAL_INTERVAL: Duration = Duration::from_secs(1);
const MAX_INTERVAL: Duration = Duration::from_secs(30);

/// How many times, and how patiently, a failed request is retried.
///
/// # Examples
///
/// ```
/// use revline_review::retry::RetryPolicy;
///
/// let policy = RetryPolicy::new(2);
/// assert_eq!(policy.max_retries, 2);
/// assert_eq!(RetryPolicy::none().max_retries, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    /// Wait before the first retry.
    pub initial_interval: Duration,
    /// Upper bound for any single wait.
    pub max_interval: Duration,
}

impl RetryPolicy {
    /// Policy with the default 1s..30s backoff window.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_interval: INITIAL_INTERVAL,
            max_interval: MAX_INTERVAL,
        }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self::new(0)
    }

    /// Override the backoff window.
    pub fn with_intervals(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_interval = initial;
        self.max_interval = max;
        self
    }

    fn backoff(&self) -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff {
            initial_interval: self.initial_interval,
            max_interval: self.max_interval,
            max_elapsed_time: None,
            ..Default::default()
        };
        backoff.reset();
        backoff
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Run `attempt` until it succeeds, fails permanently, or retries run out.
///
/// Only errors for which [`RevlineError::is_transient`] is true are retried;
/// the last error is returned unchanged once the policy is exhausted.
pub async fn retry_transient<T, F, Fut>(
    policy: &RetryPolicy,
    mut attempt: F,
) -> Result<T, RevlineError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RevlineError>>,
{
    let mut backoff = policy.backoff();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempts <= policy.max_retries => {
                let wait = backoff.next_backoff().unwrap_or(policy.max_interval);
                warn!(
                    attempt = attempts,
                    wait_ms = wait.as_millis() as u64,
                    error = %e,
                    "transient LLM failure, retrying"
                );
                tokio::time::sleep(wait).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries)
            .with_intervals(Duration::from_millis(1), Duration::from_millis(2))
    }

    #[tokio::test]
    async fn succeeds_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = retry_transient(&fast(3), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, RevlineError>("ok")
        })
        .await;
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_errors_until_success() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = retry_transient(&fast(3), move || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(RevlineError::llm_transient("503"))
            } else {
                Ok(n)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), _> = retry_transient(&fast(2), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(RevlineError::llm_transient("429"))
        })
        .await;
        assert!(result.unwrap_err().is_transient());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), _> = retry_transient(&fast(5), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(RevlineError::llm("401 Unauthorized"))
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_retry_policy_makes_one_attempt() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let _: Result<(), _> = retry_transient(&RetryPolicy::none(), move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(RevlineError::llm_transient("timeout"))
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
