//! Reusable throttling-retry policy.
//!
//! Ported from the ad-hoc retry loop in the original Bedrock helper into a
//! policy object so callers outside the LLM client (the orchestrator's own
//! collaborator calls, say) can reuse the same attempts/backoff/jitter
//! contract (`§9` cross-language substitutions).
//!
//! Revision History
//! - 2026-02-09T00:00:00Z @AI: Initial RetryPolicy: exponential backoff with
//!   jitter, predicate-gated on error kind.

/// Classifies an error as worth retrying or not, without the policy needing
/// to know the concrete error type.
pub trait RetryableError {
    fn is_throttling(&self) -> bool;
}

impl RetryableError for idp_core::IdpError {
    fn is_throttling(&self) -> bool {
        matches!(self, idp_core::IdpError::LlmThrottled(_))
    }
}

/// Exponential backoff with jitter, gated on a predicate over the error kind.
///
/// Delay for attempt `k` (1-indexed) is `base_secs^k * jitter`, where jitter
/// is drawn uniformly from `[jitter_low, jitter_high]`. The default
/// constructor matches the extraction interface's retry contract exactly:
/// up to 5 attempts, base 2, jitter in `0.8..1.2`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_secs: f64,
    pub jitter_low: f64,
    pub jitter_high: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_secs: 2.0,
            jitter_low: 0.8,
            jitter_high: 1.2,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Backoff delay for attempt `k` (1-indexed), in seconds.
    pub fn delay_secs(&self, attempt: u32) -> f64 {
        let jitter = self.jitter_low + rand::random::<f64>() * (self.jitter_high - self.jitter_low);
        self.base_secs.powi(attempt as i32) * jitter
    }

    /// Runs `call` up to `max_attempts` times, sleeping between attempts
    /// using [`Self::delay_secs`], but only while the error satisfies
    /// [`RetryableError::is_throttling`]. Any other error is returned
    /// immediately without retrying. A terminal throttling failure after the
    /// retry budget is returned as-is; the caller (the Bedrock adapter) is
    /// responsible for mapping it onto `IdpError::LlmThrottled`.
    ///
    /// Returns `(result, attempts_made)` so callers can expose a retry count
    /// for instrumentation (`S6`).
    pub async fn run<F, Fut, T, E>(&self, mut call: F) -> (std::result::Result<T, E>, u32)
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<T, E>>,
        E: RetryableError,
    {
        let mut attempt = 0u32;
        loop {
            let outcome = call().await;
            match outcome {
                std::result::Result::Ok(value) => return (std::result::Result::Ok(value), attempt),
                std::result::Result::Err(err) => {
                    if !err.is_throttling() || attempt >= self.max_attempts {
                        return (std::result::Result::Err(err), attempt);
                    }
                    attempt += 1;
                    let delay = self.delay_secs(attempt);
                    tracing::warn!(attempt, delay_secs = delay, "LLM call throttled, retrying");
                    tokio::time::sleep(std::time::Duration::from_secs_f64(delay)).await;
                }
            }
        }
    }
}
