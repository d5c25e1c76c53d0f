//! The three ways an attempt can be judged.

use std::fmt;

use super::engine::{Classify, RetryTrigger, Verdict};
use crate::predicate::{Always, Predicate};

/// Retry failures of an allowed kind that also satisfy a predicate.
///
/// `matches` is the allow-list: failures it rejects propagate after a single
/// attempt. `predicate` narrows further by inspecting the failure's fields,
/// e.g. a reason code. Successful outcomes are always returned as-is.
#[derive(Clone, Copy)]
pub struct OnFailure<M, P = Always> {
    pub(crate) matches: M,
    pub(crate) predicate: P,
}

impl<M> OnFailure<M> {
    /// Retry every failure `matches` accepts.
    pub fn new(matches: M) -> Self {
        Self {
            matches,
            predicate: Always,
        }
    }
}

impl<M, P> OnFailure<M, P> {
    /// Only retry matching failures for which `predicate` also holds.
    pub fn when<P2>(self, predicate: P2) -> OnFailure<M, P2> {
        OnFailure {
            matches: self.matches,
            predicate,
        }
    }

    /// Would `error` be retried (budget permitting)?
    pub fn should_retry<E>(&self, error: &E) -> bool
    where
        M: Predicate<E>,
        P: Predicate<E>,
    {
        self.matches.check(error) && self.predicate.check(error)
    }
}

impl<T, E, M, P> Classify<T, E> for OnFailure<M, P>
where
    M: Predicate<E>,
    P: Predicate<E>,
{
    fn classify(&self, outcome: Result<T, E>) -> Verdict<T, E> {
        match outcome {
            Err(error) if self.should_retry(&error) => {
                Verdict::Retry(Err(error), RetryTrigger::Failure)
            }
            outcome => Verdict::Done(outcome),
        }
    }
}

impl<M, P> fmt::Debug for OnFailure<M, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnFailure")
            .field("matches", &std::any::type_name::<M>())
            .field("predicate", &std::any::type_name::<P>())
            .finish()
    }
}

/// Retry successful results until one satisfies the predicate.
///
/// Failures are not caught: an `Err` ends the sequence immediately.
#[derive(Clone, Copy)]
pub struct OnResult<P> {
    pub(crate) accept: P,
}

impl<P> OnResult<P> {
    /// Stop once `accept` holds for the returned value.
    pub fn new(accept: P) -> Self {
        Self { accept }
    }
}

impl<T, E, P: Predicate<T>> Classify<T, E> for OnResult<P> {
    fn classify(&self, outcome: Result<T, E>) -> Verdict<T, E> {
        match outcome {
            Ok(value) if !self.accept.check(&value) => {
                Verdict::Retry(Ok(value), RetryTrigger::UnsatisfiedResult)
            }
            outcome => Verdict::Done(outcome),
        }
    }
}

impl<P> fmt::Debug for OnResult<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnResult")
            .field("accept", &std::any::type_name::<P>())
            .finish()
    }
}

/// Refresh an external instance until its observable state satisfies the
/// predicate.
///
/// The refresh call's return value does not influence the decision. Whether a
/// failed refresh ends the sequence is controlled by
/// [`tolerate_failures`](Self::tolerate_failures); by default it does.
#[derive(Clone, Copy)]
pub struct OnPolledState<P> {
    pub(crate) accept: P,
    pub(crate) tolerate_failures: bool,
}

impl<P> OnPolledState<P> {
    /// Stop once `accept` holds for the refreshed instance.
    pub fn new(accept: P) -> Self {
        Self {
            accept,
            tolerate_failures: false,
        }
    }

    /// Treat a failed refresh as "not there yet" instead of propagating it.
    ///
    /// If the budget runs out while refreshes keep failing, the last failure
    /// is returned.
    pub fn tolerate_failures(mut self, tolerate: bool) -> Self {
        self.tolerate_failures = tolerate;
        self
    }

    /// Judge one refresh of `instance`.
    pub fn classify_state<I, T, E>(&self, instance: &I, outcome: Result<T, E>) -> Verdict<T, E>
    where
        I: ?Sized,
        P: Predicate<I>,
    {
        match outcome {
            Err(error) if self.tolerate_failures => {
                Verdict::Retry(Err(error), RetryTrigger::Failure)
            }
            Err(error) => Verdict::Done(Err(error)),
            Ok(value) if self.accept.check(instance) => Verdict::Done(Ok(value)),
            Ok(value) => Verdict::Retry(Ok(value), RetryTrigger::UnsatisfiedState),
        }
    }
}

impl<P> fmt::Debug for OnPolledState<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnPolledState")
            .field("accept", &std::any::type_name::<P>())
            .field("tolerate_failures", &self.tolerate_failures)
            .finish()
    }
}
