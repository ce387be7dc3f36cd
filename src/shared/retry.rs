//! Retry With Exponential Backoff
//!
//! Operations are retried by name. A [`RetryRegistry`] holds an ordered list
//! of rules; the first rule whose pattern matches an operation name decides
//! the policy. Operations that match no rule run exactly once.
//!
//! Patterns:
//! - `models.load.fraud` - exact operation name
//! - `models.*` - every operation under the `models.` prefix
//! - `*` - every operation
//!
//! The delay after the n-th failed attempt is
//! `initial_delay * multiplier^(n - 1)`, capped at `max_delay` when set.
//! After the last attempt the original error is returned unchanged.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::config::{RetryRuleSettings, RetrySettings};
use crate::infrastructure::metrics;

/// Errors that know whether a retry may succeed.
pub trait Retryable {
    /// `false` stops the retry loop on the first occurrence.
    fn is_retryable(&self) -> bool;
}

/// How many times an operation is attempted and how long to wait in between.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    multiplier: f64,
    max_delay: Option<Duration>,
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` is clamped to at least one and
    /// `multiplier` to at least 1.0.
    pub fn new(max_attempts: u32, initial_delay: Duration, multiplier: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            multiplier: multiplier.max(1.0),
            max_delay: None,
        }
    }

    /// Single attempt, no delay.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, 1.0)
    }

    /// Cap every individual delay.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after `attempt` (1-based) has failed.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let nanos = self.initial_delay.as_nanos() as f64 * self.multiplier.powi(exponent);
        let delay = if nanos.is_finite() && nanos < u64::MAX as f64 {
            Duration::from_nanos(nanos.round() as u64)
        } else {
            Duration::MAX
        };

        match self.max_delay {
            Some(cap) => delay.min(cap),
            None => delay,
        }
    }

    /// Run `operation` until it succeeds, returns a non-retryable error, or
    /// attempts run out. The last error is returned as-is.
    pub async fn execute<T, E, F, Fut>(&self, name: &str, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(operation = name, attempt, "Operation succeeded after retry");
                        metrics::record_retry(name, "recovered");
                    }
                    return Ok(value);
                }
                Err(error) if !error.is_retryable() => {
                    tracing::warn!(
                        operation = name,
                        attempt,
                        error = %error,
                        "Operation failed with non-retryable error"
                    );
                    metrics::record_retry(name, "aborted");
                    return Err(error);
                }
                Err(error) if attempt >= self.max_attempts => {
                    if self.max_attempts > 1 {
                        tracing::error!(
                            operation = name,
                            attempts = attempt,
                            error = %error,
                            "Operation failed after exhausting retries"
                        );
                        metrics::record_retry(name, "exhausted");
                    }
                    return Err(error);
                }
                Err(error) => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        operation = name,
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Operation failed, retrying"
                    );
                    metrics::record_retry(name, "retried");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100), 2.0)
    }
}

impl From<&RetryRuleSettings> for RetryPolicy {
    fn from(rule: &RetryRuleSettings) -> Self {
        let policy = RetryPolicy::new(
            rule.max_attempts,
            Duration::from_millis(rule.initial_delay_ms),
            rule.multiplier,
        );
        match rule.max_delay_ms {
            Some(ms) => policy.with_max_delay(Duration::from_millis(ms)),
            None => policy,
        }
    }
}

/// Operation name pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OperationPattern {
    Any,
    Prefix(String),
    Exact(String),
}

impl OperationPattern {
    fn parse(pattern: &str) -> Self {
        let pattern = pattern.trim();
        if pattern == "*" {
            Self::Any
        } else if let Some(prefix) = pattern.strip_suffix('*') {
            Self::Prefix(prefix.to_string())
        } else {
            Self::Exact(pattern.to_string())
        }
    }

    fn matches(&self, operation: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Prefix(prefix) => operation.starts_with(prefix.as_str()),
            Self::Exact(name) => operation == name,
        }
    }
}

/// Operations whose name matches `pattern` run under `policy`.
#[derive(Debug, Clone)]
pub struct RetryRule {
    pattern: String,
    matcher: OperationPattern,
    policy: RetryPolicy,
}

impl RetryRule {
    pub fn new(pattern: &str, policy: RetryPolicy) -> Self {
        Self {
            pattern: pattern.trim().to_string(),
            matcher: OperationPattern::parse(pattern),
            policy,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn matches(&self, operation: &str) -> bool {
        self.matcher.matches(operation)
    }
}

/// Ordered retry rules, first match wins.
#[derive(Debug, Clone, Default)]
pub struct RetryRegistry {
    rules: Vec<RetryRule>,
}

impl RetryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &RetrySettings) -> Self {
        settings
            .rules
            .iter()
            .fold(Self::new(), |registry, rule| {
                registry.with_rule(&rule.pattern, RetryPolicy::from(rule))
            })
    }

    /// Append a rule. Earlier rules take precedence.
    pub fn with_rule(mut self, pattern: &str, policy: RetryPolicy) -> Self {
        self.rules.push(RetryRule::new(pattern, policy));
        self
    }

    /// Policy for an operation, or a single attempt when nothing matches.
    pub fn policy_for(&self, operation: &str) -> RetryPolicy {
        self.rules
            .iter()
            .find(|rule| rule.matches(operation))
            .map(|rule| rule.policy.clone())
            .unwrap_or_else(RetryPolicy::none)
    }

    pub fn rules(&self) -> &[RetryRule] {
        &self.rules
    }

    pub async fn execute<T, E, F, Fut>(&self, operation: &str, f: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display,
    {
        self.policy_for(operation).execute(operation, f).await
    }
}
