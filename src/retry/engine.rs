//! The attempt loop shared by every retry strategy.
//!
//! Strategies differ only in how they judge one outcome. They all turn an
//! outcome into a [`Verdict`], and [`run`] owns everything else: counting
//! attempts, asking the policy for the next delay, sleeping, and deciding when
//! the budget is spent.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::policy::RetryPolicy;
use super::sleep::Sleeper;

/// Decision about the outcome of a single attempt.
///
/// Both variants carry the outcome itself so that it can be handed back
/// unchanged, either immediately (`Done`) or once the budget runs out
/// (`Retry` on the last attempt).
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict<T, E> {
    /// Stop and return this outcome.
    Done(Result<T, E>),
    /// Try again if the budget allows; otherwise return this outcome.
    Retry(Result<T, E>, RetryTrigger),
}

impl<T, E> Verdict<T, E> {
    /// True for [`Verdict::Retry`].
    pub fn is_retry(&self) -> bool {
        matches!(self, Self::Retry(..))
    }

    /// The outcome, whatever the decision.
    pub fn into_outcome(self) -> Result<T, E> {
        match self {
            Self::Done(outcome) | Self::Retry(outcome, _) => outcome,
        }
    }
}

/// Why an attempt was judged worth repeating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetryTrigger {
    /// The operation failed with a retryable error.
    Failure,
    /// The operation succeeded but its result did not satisfy the predicate.
    UnsatisfiedResult,
    /// The polled instance did not reach the expected state.
    UnsatisfiedState,
}

impl fmt::Display for RetryTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Failure => "retryable failure",
            Self::UnsatisfiedResult => "unsatisfied result",
            Self::UnsatisfiedState => "unsatisfied state",
        };
        f.write_str(text)
    }
}

/// Information about a retry that is about to happen, passed to hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryEvent {
    /// Which attempt was just judged (1-indexed).
    pub attempt: u32,
    /// What made the attempt retryable.
    pub trigger: RetryTrigger,
    /// How long the engine is about to sleep.
    pub next_delay: Duration,
    /// Time since the first attempt started.
    pub elapsed: Duration,
}

/// Callback invoked before every sleep.
///
/// Hooks only observe. They cannot alter the outcome or the schedule.
pub type RetryHook = Arc<dyn Fn(&RetryEvent) + Send + Sync>;

/// Turns the outcome of one attempt into a [`Verdict`].
///
/// Implemented by [`OnFailure`](super::OnFailure) and
/// [`OnResult`](super::OnResult). Polled-state retries judge an external
/// instance rather than the outcome and go through
/// [`Retry::poll`](super::Retry::poll) instead.
pub trait Classify<T, E> {
    /// Judge `outcome`.
    fn classify(&self, outcome: Result<T, E>) -> Verdict<T, E>;
}

/// Drive `attempt` until it yields [`Verdict::Done`] or `policy` has no
/// delay left to offer.
///
/// Per-call state (attempt index, start time) lives in this frame only, so
/// one policy can serve any number of independent calls.
pub(crate) fn run<T, E, S, F>(
    policy: &RetryPolicy,
    sleeper: &S,
    hook: Option<&RetryHook>,
    mut attempt: F,
) -> Result<T, E>
where
    S: Sleeper + ?Sized,
    F: FnMut() -> Verdict<T, E>,
{
    let start = Instant::now();
    let mut index = 0u32;

    loop {
        let (outcome, trigger) = match attempt() {
            Verdict::Done(outcome) => return outcome,
            Verdict::Retry(outcome, trigger) => (outcome, trigger),
        };

        let Some(delay) = policy.delay_for_attempt(index) else {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                attempts = index + 1,
                %trigger,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "retry budget exhausted, returning last outcome"
            );
            return outcome;
        };
        drop(outcome);

        let event = RetryEvent {
            attempt: index + 1,
            trigger,
            next_delay: delay,
            elapsed: start.elapsed(),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            attempt = event.attempt,
            %trigger,
            delay_ms = delay.as_millis() as u64,
            "trying again in {:?}",
            delay
        );

        if let Some(hook) = hook {
            hook(&event);
        }

        sleeper.sleep(delay);
        index += 1;
    }
}
