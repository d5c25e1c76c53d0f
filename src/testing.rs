//! Testing utilities and helpers for steadfast
//!
//! Retry sequences wait for real time by default. The helpers here let tests
//! run the full engine instantly and then assert on what it did: how many
//! attempts were made and which delays would have been slept.
//!
//! # Examples
//!
//! ```rust
//! use steadfast::Retry;
//! use steadfast::testing::{RecordingSleeper, Script};
//! use steadfast::assert_sleeps;
//!
//! let sleeper = RecordingSleeper::new();
//! let script = Script::new(vec![Err("busy"), Err("busy"), Ok(42)]);
//! let retry = Retry::on_failure(|e: &&str| *e == "busy").with_sleeper(sleeper.clone());
//!
//! assert_eq!(retry.call(|| script.call()), Ok(42));
//! assert_eq!(script.calls(), 3);
//! assert_sleeps!(sleeper, [1, 2]);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::retry::Sleeper;

/// A [`Sleeper`] that records every requested delay instead of waiting.
///
/// Clones share the same log, so keep one clone in the test and hand the
/// other to the retry.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    log: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every delay requested so far, in order.
    pub fn recorded(&self) -> Vec<Duration> {
        self.lock().clone()
    }

    /// Number of sleeps requested so far.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Sum of all requested delays.
    pub fn total(&self) -> Duration {
        self.lock().iter().sum()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Duration>> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.lock().push(duration);
    }
}

/// A scripted operation that plays back a fixed sequence of outcomes.
///
/// Each [`call`](Self::call) returns the next outcome. Once only one is left
/// it is repeated forever, which models a service that has settled into a
/// steady answer. Calls are counted so that tests can check how many
/// attempts the engine made.
///
/// # Panics
///
/// `call` panics if the script was created empty.
#[derive(Debug)]
pub struct Script<T, E> {
    outcomes: Mutex<VecDeque<Result<T, E>>>,
    calls: AtomicU32,
}

impl<T: Clone, E: Clone> Script<T, E> {
    /// Play back `outcomes` in order.
    pub fn new(outcomes: Vec<Result<T, E>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicU32::new(0),
        }
    }

    /// A script that answers `outcome` on every call.
    pub fn always(outcome: Result<T, E>) -> Self {
        Self::new(vec![outcome])
    }

    /// Produce the next outcome.
    pub fn call(&self) -> Result<T, E> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut outcomes = self
            .outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if outcomes.len() > 1 {
            if let Some(outcome) = outcomes.pop_front() {
                return outcome;
            }
        }
        match outcomes.front() {
            Some(outcome) => outcome.clone(),
            None => panic!("Script called with no outcomes"),
        }
    }

    /// How many times [`call`](Self::call) ran.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Assert the exact delays, in whole seconds, a [`RecordingSleeper`] saw.
///
/// # Example
///
/// ```rust
/// use steadfast::assert_sleeps;
/// use steadfast::retry::Sleeper;
/// use steadfast::testing::RecordingSleeper;
/// use std::time::Duration;
///
/// let sleeper = RecordingSleeper::new();
/// sleeper.sleep(Duration::from_secs(1));
/// sleeper.sleep(Duration::from_secs(2));
/// assert_sleeps!(sleeper, [1, 2]);
/// ```
#[macro_export]
macro_rules! assert_sleeps {
    ($sleeper:expr, [$($secs:expr),* $(,)?]) => {{
        let expected: ::std::vec::Vec<::std::time::Duration> =
            vec![$(::std::time::Duration::from_secs($secs)),*];
        let recorded = $sleeper.recorded();
        if recorded != expected {
            panic!(
                "Expected sleeps {:?}, recorded {:?}",
                expected, recorded
            );
        }
    }};
}

/// Assert that a scripted operation was attempted exactly `n` times.
///
/// # Example
///
/// ```rust
/// use steadfast::assert_attempts;
/// use steadfast::testing::Script;
///
/// let script = Script::<u8, ()>::always(Ok(1));
/// let _ = script.call();
/// assert_attempts!(script, 1);
/// ```
#[macro_export]
macro_rules! assert_attempts {
    ($script:expr, $n:expr) => {{
        let calls = $script.calls();
        if calls != $n {
            panic!("Expected {} attempts, got {}", $n, calls);
        }
    }};
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for crate::RetryPolicy {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (1u32..=16, 1u64..=5_000, 1.1f64..4.0, 0u64..=120_000)
            .prop_filter_map("policy out of range", |(tries, delay_ms, backoff, extra_ms)| {
                crate::RetryPolicy::new(
                    tries,
                    Duration::from_millis(delay_ms),
                    backoff,
                    Duration::from_millis(delay_ms + extra_ms),
                )
                .ok()
            })
            .boxed()
    }
}
