//! Error types for retry configuration.
//!
//! Failures of the retried operation are never wrapped: the engine hands back
//! the caller's own error type untouched. The only error this crate defines
//! for the retry engine is the one raised while building a policy.

use std::time::Duration;

/// A [`RetryPolicy`](super::RetryPolicy) parameter is out of range.
///
/// # Examples
///
/// ```rust
/// use steadfast::{PolicyError, RetryPolicy};
///
/// let err = RetryPolicy::builder().backoff(1.0).build().unwrap_err();
/// assert_eq!(err, PolicyError::InvalidBackoff(1.0));
/// assert!(err.to_string().contains("greater than 1"));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    /// `max_tries` was zero; at least one attempt is always made.
    #[error("max_tries must be at least 1")]
    ZeroTries,
    /// The initial delay was zero, so backoff could never grow.
    #[error("initial delay must be greater than zero")]
    ZeroDelay,
    /// The backoff multiplier was not a finite number above 1.
    #[error("backoff multiplier must be a finite number greater than 1, got {0}")]
    InvalidBackoff(f64),
    /// The delay cap was shorter than the first delay.
    #[error("max_delay ({max_delay:?}) must not be shorter than the initial delay ({delay:?})")]
    MaxDelayBelowDelay {
        /// Initial delay that was requested.
        delay: Duration,
        /// Cap that was requested.
        max_delay: Duration,
    },
}
