//! Retry policy types and configuration.

use std::num::NonZeroU32;
use std::time::Duration;

use super::error::PolicyError;

/// Number of attempts made by [`RetryPolicy::default`].
pub const DEFAULT_MAX_TRIES: u32 = 8;
/// Delay before the first retry in [`RetryPolicy::default`].
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);
/// Growth factor applied to the delay after every retry.
pub const DEFAULT_BACKOFF: f64 = 2.0;
/// Upper bound on any single delay in [`RetryPolicy::default`].
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(64);

/// How often to try an operation and how long to wait in between.
///
/// Policies are pure data: they describe the attempt budget and the backoff
/// schedule but never execute anything. The delay slept between attempt `n`
/// and attempt `n + 1` (0-indexed) is
///
/// ```text
/// min(delay * backoff^n, max_delay)
/// ```
///
/// There is no jitter, so the schedule is fully determined by the four
/// parameters. Every constructor guarantees `max_tries >= 1`, `delay > 0`,
/// `backoff > 1` and `max_delay >= delay`.
///
/// # Examples
///
/// ```rust
/// use steadfast::RetryPolicy;
/// use std::time::Duration;
///
/// // 8 attempts, 1s doubling up to 64s: 1 + 2 + 4 + 8 + 16 + 32 + 64 = 127s
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_tries(), 8);
/// assert_eq!(policy.total_delay(), Duration::from_secs(127));
///
/// let quick = RetryPolicy::builder()
///     .max_tries(4)
///     .delay(Duration::from_millis(100))
///     .build()
///     .unwrap();
/// assert_eq!(quick.total_delay(), Duration::from_millis(700));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_tries: u32,
    delay: Duration,
    backoff: f64,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_tries: DEFAULT_MAX_TRIES,
            delay: DEFAULT_DELAY,
            backoff: DEFAULT_BACKOFF,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Create a validated policy from all four parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyError`] describing the first parameter that is out of
    /// range.
    ///
    /// ```rust
    /// use steadfast::{PolicyError, RetryPolicy};
    /// use std::time::Duration;
    ///
    /// let err = RetryPolicy::new(0, Duration::from_secs(1), 2.0, Duration::from_secs(8));
    /// assert_eq!(err, Err(PolicyError::ZeroTries));
    /// ```
    pub fn new(
        max_tries: u32,
        delay: Duration,
        backoff: f64,
        max_delay: Duration,
    ) -> Result<Self, PolicyError> {
        let policy = Self {
            max_tries,
            delay,
            backoff,
            max_delay,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Start building a policy from the defaults.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// The default schedule with a different attempt budget.
    ///
    /// Infallible because a non-zero budget cannot break any other bound.
    ///
    /// ```rust
    /// use steadfast::RetryPolicy;
    /// use std::num::NonZeroU32;
    /// use std::time::Duration;
    ///
    /// // 4 tries back off for at most 1 + 2 + 4 = 7 seconds.
    /// let policy = RetryPolicy::attempts(NonZeroU32::new(4).unwrap());
    /// assert_eq!(policy.total_delay(), Duration::from_secs(7));
    /// ```
    pub fn attempts(max_tries: NonZeroU32) -> Self {
        Self {
            max_tries: max_tries.get(),
            ..Self::default()
        }
    }

    /// Total number of attempts, including the first one.
    pub fn max_tries(&self) -> u32 {
        self.max_tries
    }

    /// Delay before the first retry.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Multiplier applied to the delay after each retry.
    pub fn backoff(&self) -> f64 {
        self.backoff
    }

    /// Cap on any single delay.
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Delay to sleep after attempt `attempt` (0-indexed) failed to satisfy
    /// the classifier.
    ///
    /// Returns `None` when `attempt` was the last one the budget allows, so
    /// the engine never sleeps after its final attempt.
    ///
    /// ```rust
    /// use steadfast::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::builder().max_tries(3).build().unwrap();
    ///
    /// assert_eq!(policy.delay_for_attempt(0), Some(Duration::from_secs(1)));
    /// assert_eq!(policy.delay_for_attempt(1), Some(Duration::from_secs(2)));
    /// assert_eq!(policy.delay_for_attempt(2), None); // third try was the last
    /// ```
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        if attempt.saturating_add(1) >= self.max_tries {
            return None;
        }
        Some(self.backoff_delay(attempt))
    }

    /// `min(delay * backoff^attempt, max_delay)`, ignoring the attempt budget.
    ///
    /// Saturates to `max_delay` instead of overflowing.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let nanos = self.delay.as_nanos() as f64 * self.backoff.powi(exponent);
        if !nanos.is_finite() || nanos >= self.max_delay.as_nanos() as f64 {
            return self.max_delay;
        }
        // Whole nanoseconds keep decimal delays such as 100ms exact.
        let delay = if nanos < u64::MAX as f64 {
            Duration::from_nanos(nanos.round() as u64)
        } else {
            Duration::try_from_secs_f64(nanos / 1e9).unwrap_or(self.max_delay)
        };
        delay.min(self.max_delay)
    }

    /// Every sleep a fully exhausted attempt sequence would perform, in order.
    ///
    /// ```rust
    /// use steadfast::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let secs: Vec<u64> = RetryPolicy::default().schedule().map(|d| d.as_secs()).collect();
    /// assert_eq!(secs, vec![1, 2, 4, 8, 16, 32, 64]);
    /// ```
    pub fn schedule(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_tries.saturating_sub(1)).map(|attempt| self.backoff_delay(attempt))
    }

    /// Worst-case time spent sleeping, i.e. the sum of [`schedule`](Self::schedule).
    pub fn total_delay(&self) -> Duration {
        self.schedule()
            .fold(Duration::ZERO, |total, d| total.saturating_add(d))
    }

    /// Check every bound.
    ///
    /// Policies built through [`new`](Self::new), the builder, or
    /// deserialization have already passed this check.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.max_tries == 0 {
            return Err(PolicyError::ZeroTries);
        }
        if self.delay.is_zero() {
            return Err(PolicyError::ZeroDelay);
        }
        if !self.backoff.is_finite() || self.backoff <= 1.0 {
            return Err(PolicyError::InvalidBackoff(self.backoff));
        }
        if self.max_delay < self.delay {
            return Err(PolicyError::MaxDelayBelowDelay {
                delay: self.delay,
                max_delay: self.max_delay,
            });
        }
        Ok(())
    }
}

/// Builder for [`RetryPolicy`], starting from the defaults.
///
/// ```rust
/// use steadfast::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::builder()
///     .max_tries(5)
///     .backoff(3.0)
///     .max_delay(Duration::from_secs(10))
///     .build()
///     .unwrap();
///
/// let secs: Vec<u64> = policy.schedule().map(|d| d.as_secs()).collect();
/// assert_eq!(secs, vec![1, 3, 9, 10]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl Default for RetryPolicyBuilder {
    fn default() -> Self {
        Self {
            policy: RetryPolicy::default(),
        }
    }
}

impl RetryPolicyBuilder {
    /// Total number of attempts, including the first one.
    pub fn max_tries(mut self, max_tries: u32) -> Self {
        self.policy.max_tries = max_tries;
        self
    }

    /// Delay before the first retry.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.policy.delay = delay;
        self
    }

    /// Multiplier applied after each retry.
    pub fn backoff(mut self, backoff: f64) -> Self {
        self.policy.backoff = backoff;
        self
    }

    /// Cap on any single delay.
    pub fn max_delay(mut self, max_delay: Duration) -> Self {
        self.policy.max_delay = max_delay;
        self
    }

    /// Validate and produce the policy.
    pub fn build(self) -> Result<RetryPolicy, PolicyError> {
        self.policy.validate()?;
        Ok(self.policy)
    }
}
