//! Bounded retry with exponential backoff
//!
//! Only errors for which [`PipelineError::is_retryable`] holds are retried.
//! With the default policy an operation runs at most 3 times, sleeping 1s
//! and then 2s between attempts.

use crate::error::{PipelineError, PipelineResult};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, warn};

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_multiplier() -> f64 {
    2.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

impl RetryPolicy {
    /// Delay after the failed attempt number `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let millis = self.base_delay_ms as f64 * self.multiplier.powi(exponent);
        Duration::from_millis(millis.max(0.0) as u64)
    }
}

/// Blocks the current run between attempts
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Clone)]
pub struct Retrier {
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for Retrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retrier")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for Retrier {
    fn default() -> Self {
        Self::new(RetryPolicy::default(), Arc::new(ThreadSleeper))
    }
}

impl Retrier {
    pub fn new(policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { policy, sleeper }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `op` until it succeeds, fails terminally, or the attempt budget is spent.
    pub fn run<T, F>(&self, operation: &str, mut op: F) -> PipelineResult<T>
    where
        F: FnMut() -> PipelineResult<T>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let delay = self.policy.delay_after(attempt);
                    warn!(
                        "{} failed ({}). Retrying in {:?}... (attempt {}/{})",
                        operation, err, delay, attempt, max_attempts
                    );
                    self.sleeper.sleep(delay);
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_retryable() {
                        error!("{} failed after {} attempts: {}", operation, attempt, err);
                    } else if matches!(err, PipelineError::AuthFailure { .. }) {
                        error!("{}: authentication failed - not retrying", operation);
                    }
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSleeper {
        delays: Mutex<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.delays.lock().unwrap().push(duration);
        }
    }

    fn retrier() -> (Retrier, Arc<RecordingSleeper>) {
        let sleeper = Arc::new(RecordingSleeper::default());
        (Retrier::new(RetryPolicy::default(), sleeper.clone()), sleeper)
    }

    #[test]
    fn test_default_delays() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.delay_after(3), Duration::from_secs(4));
    }

    #[test]
    fn test_transient_failure_then_success() {
        let (retrier, sleeper) = retrier();
        let mut calls = 0;
        let result = retrier.run("assess", || {
            calls += 1;
            if calls == 1 {
                Err(PipelineError::rate_limited("openrouter"))
            } else {
                Ok(42)
            }
        });

        assert_eq!(result, Ok(42));
        assert_eq!(calls, 2);
        assert_eq!(*sleeper.delays.lock().unwrap(), vec![Duration::from_secs(1)]);
    }

    #[test]
    fn test_persistent_rate_limit_exhausts_budget() {
        let (retrier, sleeper) = retrier();
        let mut calls = 0;
        let result: PipelineResult<()> = retrier.run("assess", || {
            calls += 1;
            Err(PipelineError::rate_limited("openrouter"))
        });

        assert_eq!(result, Err(PipelineError::rate_limited("openrouter")));
        assert_eq!(calls, 3);
        assert_eq!(
            *sleeper.delays.lock().unwrap(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[test]
    fn test_auth_failure_is_not_retried() {
        let (retrier, sleeper) = retrier();
        let mut calls = 0;
        let result: PipelineResult<()> = retrier.run("render", || {
            calls += 1;
            Err(PipelineError::auth_failure("together"))
        });

        assert!(matches!(result, Err(PipelineError::AuthFailure { .. })));
        assert_eq!(calls, 1);
        assert!(sleeper.delays.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dependency_errors_are_not_retried() {
        let (retrier, _) = retrier();
        let mut calls = 0;
        let _: PipelineResult<()> = retrier.run("fetch", || {
            calls += 1;
            Err(PipelineError::dependency("github", Some(502), "bad gateway"))
        });
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_policy_deserializes_with_defaults() {
        let policy: RetryPolicy = toml::from_str("max_attempts = 5").unwrap();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay_ms, 1000);
        assert_eq!(policy.multiplier, 2.0);
    }
}
