//! Bounded retries for fallible operations.
//!
//! A retry is built from three independent pieces:
//!
//! - **Strategy**: how a single outcome is judged ([`OnFailure`],
//!   [`OnResult`], [`OnPolledState`]).
//! - **Policy**: how many attempts and how long to wait between them
//!   ([`RetryPolicy`]). Pure data, validated on construction.
//! - **Sleeper**: how to wait ([`ThreadSleeper`], or a recording sleeper in
//!   tests).
//!
//! [`Retry`] ties them together and runs the shared attempt loop.
//!
//! # Quick Start
//!
//! ```rust
//! use steadfast::{Retry, RetryPolicy};
//! use steadfast::predicate::is_not_empty;
//! use steadfast::testing::RecordingSleeper;
//! use std::time::Duration;
//!
//! let sleeper = RecordingSleeper::new();
//! let retry = Retry::on_result(is_not_empty())
//!     .with_policy(RetryPolicy::builder().max_tries(4).build().unwrap())
//!     .with_sleeper(sleeper.clone());
//!
//! let mut pages = vec![vec![], vec![], vec!["row"]].into_iter();
//! let rows = retry.call(|| Ok::<_, ()>(pages.next().unwrap_or_default()));
//!
//! assert_eq!(rows, Ok(vec!["row"]));
//! assert_eq!(
//!     sleeper.recorded(),
//!     vec![Duration::from_secs(1), Duration::from_secs(2)]
//! );
//! ```
//!
//! # What the caller sees
//!
//! The engine is transparent: callers get either the accepted value or exactly
//! the outcome the last attempt produced. There is no "retries exhausted"
//! error type, and failures are never wrapped.

mod engine;
mod error;
mod policy;
mod retrier;
#[cfg(feature = "serde")]
mod serde_impl;
mod sleep;
mod strategy;

pub use engine::{Classify, RetryEvent, RetryHook, RetryTrigger, Verdict};
pub use error::PolicyError;
pub use policy::{
    RetryPolicy, RetryPolicyBuilder, DEFAULT_BACKOFF, DEFAULT_DELAY, DEFAULT_MAX_DELAY,
    DEFAULT_MAX_TRIES,
};
pub use retrier::{Retry, RetryOnFailure, RetryOnPolledState, RetryOnResult, Retrying};
pub use sleep::{Sleeper, ThreadSleeper};
pub use strategy::{OnFailure, OnPolledState, OnResult};

#[cfg(test)]
mod tests;
