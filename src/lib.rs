//! # Steadfast
//!
//! Bounded, deterministic retries for calls against cloud services.
//!
//! Integration suites that talk to real services keep running into the same
//! transient conditions: rate limits reported as a 403, resources that are
//! still in use right after a delete, listings that are empty until the data
//! becomes visible, jobs that need polling until they finish. Steadfast
//! wraps such calls in a retry that:
//!
//! - classifies every outcome with a composable [`predicate`],
//! - backs off exponentially with a cap (`1, 2, 4, ... 64` seconds by default),
//! - stops after a fixed number of attempts,
//! - and hands back exactly what the last attempt produced.
//!
//! ## Quick Example
//!
//! ```rust
//! use steadfast::prelude::*;
//! use steadfast::testing::RecordingSleeper;
//!
//! #[derive(Debug, PartialEq)]
//! enum Error { RateLimited, NotFound }
//!
//! let sleeper = RecordingSleeper::new();
//! let retry = Retry::on_failure(|e: &Error| *e == Error::RateLimited)
//!     .with_sleeper(sleeper.clone());
//!
//! let mut attempts = 0;
//! let result = retry.call(|| {
//!     attempts += 1;
//!     if attempts < 3 { Err(Error::RateLimited) } else { Ok("table updated") }
//! });
//!
//! assert_eq!(result, Ok("table updated"));
//! assert_eq!(sleeper.count(), 2);
//!
//! // Failures outside the allow-list surface untouched, after one attempt.
//! assert_eq!(retry.call(|| Err::<(), _>(Error::NotFound)), Err(Error::NotFound));
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): emit `debug` events for every retry and when the
//!   budget runs out.
//! - `serde`: (de)serialize [`RetryPolicy`] with durations in seconds.
//! - `proptest`: `Arbitrary` for [`RetryPolicy`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod predicate;
pub mod retry;
pub mod service;
pub mod testing;

// Re-exports
pub use retry::{
    PolicyError, Retry, RetryEvent, RetryOnFailure, RetryOnPolledState, RetryOnResult,
    RetryPolicy, Sleeper,
};
pub use service::ServiceError;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::predicate::{Predicate, PredicateExt};
    pub use crate::retry::{
        PolicyError, Retry, RetryEvent, RetryOnFailure, RetryOnPolledState, RetryOnResult,
        RetryPolicy, RetryTrigger, Sleeper, ThreadSleeper,
    };
    pub use crate::service::{ErrorKind, HasState, Refresh, ServiceError};
}
