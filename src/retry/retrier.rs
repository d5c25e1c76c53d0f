//! `Retry`: a strategy bound to a policy, a sleeper and an optional hook.

use std::fmt;
use std::sync::Arc;

use super::engine::{self, Classify, RetryEvent, RetryHook};
use super::policy::RetryPolicy;
use super::sleep::{Sleeper, ThreadSleeper};
use super::strategy::{OnFailure, OnPolledState, OnResult};
use crate::service::Refresh;

/// Retries failures whose kind is allowed and whose fields satisfy a predicate.
pub type RetryOnFailure<M, P = crate::predicate::Always, S = ThreadSleeper> =
    Retry<OnFailure<M, P>, S>;

/// Retries successful calls until the returned value is acceptable.
pub type RetryOnResult<P, S = ThreadSleeper> = Retry<OnResult<P>, S>;

/// Refreshes an instance until its state is acceptable.
pub type RetryOnPolledState<P, S = ThreadSleeper> = Retry<OnPolledState<P>, S>;

/// A reusable retry decorator.
///
/// Combines a strategy (how to judge one attempt), a [`RetryPolicy`] (how
/// many attempts and how long to wait), a [`Sleeper`] and an optional hook.
/// A `Retry` holds no per-call state: every [`call`](Self::call) starts a
/// fresh attempt sequence, so one value can be built once and shared by many
/// call sites.
///
/// # Examples
///
/// ```rust
/// use steadfast::Retry;
/// use steadfast::testing::RecordingSleeper;
///
/// #[derive(Debug, PartialEq)]
/// enum Error { Throttled, Denied }
///
/// let sleeper = RecordingSleeper::new();
/// let retry = Retry::on_failure(|e: &Error| *e == Error::Throttled)
///     .with_sleeper(sleeper.clone());
///
/// let mut calls = 0;
/// let result = retry.call(|| {
///     calls += 1;
///     if calls < 3 { Err(Error::Throttled) } else { Ok("created") }
/// });
///
/// assert_eq!(result, Ok("created"));
/// assert_eq!(sleeper.recorded().len(), 2);
///
/// // Anything outside the allow-list is returned after one attempt.
/// assert_eq!(retry.call(|| Err::<(), _>(Error::Denied)), Err(Error::Denied));
/// ```
#[derive(Clone)]
pub struct Retry<C, S = ThreadSleeper> {
    strategy: C,
    policy: RetryPolicy,
    sleeper: S,
    hook: Option<RetryHook>,
}

impl<M> Retry<OnFailure<M>> {
    /// Retry failures accepted by `matches`, the allow-list of failure kinds.
    ///
    /// Narrow it further with [`when`](Retry::when).
    pub fn on_failure(matches: M) -> Self {
        Self::with_strategy(OnFailure::new(matches))
    }
}

impl<P> Retry<OnResult<P>> {
    /// Retry until the returned value satisfies `accept`.
    ///
    /// ```rust
    /// use steadfast::Retry;
    /// use steadfast::predicate::ge;
    /// use steadfast::testing::RecordingSleeper;
    ///
    /// let retry = Retry::on_result(ge(3)).with_sleeper(RecordingSleeper::new());
    /// let mut next = 0;
    /// let value = retry.call(|| {
    ///     next += 1;
    ///     Ok::<_, ()>(next)
    /// });
    /// assert_eq!(value, Ok(3));
    /// ```
    pub fn on_result(accept: P) -> Self {
        Self::with_strategy(OnResult::new(accept))
    }
}

impl<P> Retry<OnPolledState<P>> {
    /// Refresh an instance until its state satisfies `accept`.
    pub fn on_polled_state(accept: P) -> Self {
        Self::with_strategy(OnPolledState::new(accept))
    }
}

impl<C> Retry<C> {
    /// Bind any strategy to the default policy and a real sleeper.
    pub fn with_strategy(strategy: C) -> Self {
        Self {
            strategy,
            policy: RetryPolicy::default(),
            sleeper: ThreadSleeper,
            hook: None,
        }
    }
}

impl<C, S> Retry<C, S> {
    /// Replace the attempt budget and backoff schedule.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the sleep primitive.
    pub fn with_sleeper<S2: Sleeper>(self, sleeper: S2) -> Retry<C, S2> {
        Retry {
            strategy: self.strategy,
            policy: self.policy,
            sleeper,
            hook: self.hook,
        }
    }

    /// Observe every retry before its sleep.
    ///
    /// Replaces any previously registered hook.
    pub fn on_retry<H>(mut self, hook: H) -> Self
    where
        H: Fn(&RetryEvent) + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// The attempt budget and backoff schedule.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The strategy judging each attempt.
    pub fn strategy(&self) -> &C {
        &self.strategy
    }

    /// The sleep primitive.
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Wrap `operation` so that every call goes through this retry.
    ///
    /// The wrapper borrows `self`; calling it repeatedly starts a fresh attempt
    /// sequence each time.
    ///
    /// ```rust
    /// use steadfast::Retry;
    /// use steadfast::predicate::is_true;
    /// use steadfast::testing::RecordingSleeper;
    ///
    /// let retry = Retry::on_result(is_true()).with_sleeper(RecordingSleeper::new());
    /// let mut probes = 0;
    /// let mut exists = retry.wrap(|| {
    ///     probes += 1;
    ///     Ok::<_, ()>(probes > 1)
    /// });
    /// assert_eq!(exists.call(), Ok(true));
    /// ```
    pub fn wrap<F>(&self, operation: F) -> Retrying<'_, C, S, F> {
        Retrying {
            retry: self,
            operation,
        }
    }
}

impl<C, S: Sleeper> Retry<C, S> {
    /// Run `operation` until the strategy is satisfied or the budget is spent.
    ///
    /// Returns exactly what the last attempt produced: the accepted value, the
    /// first non-retryable failure, or the final outcome once the budget is
    /// spent.
    pub fn call<T, E, F>(&self, mut operation: F) -> Result<T, E>
    where
        C: Classify<T, E>,
        F: FnMut() -> Result<T, E>,
    {
        engine::run(&self.policy, &self.sleeper, self.hook.as_ref(), || {
            self.strategy.classify(operation())
        })
    }
}

impl<M, P, S> Retry<OnFailure<M, P>, S> {
    /// Only retry allowed failures for which `predicate` also holds.
    ///
    /// ```rust
    /// use steadfast::Retry;
    ///
    /// #[derive(Debug)]
    /// struct HttpError { status: u16, reason: &'static str }
    ///
    /// let retry = Retry::on_failure(|e: &HttpError| e.status == 403)
    ///     .when(|e: &HttpError| e.reason == "rateLimitExceeded");
    ///
    /// assert!(retry.should_retry(&HttpError { status: 403, reason: "rateLimitExceeded" }));
    /// assert!(!retry.should_retry(&HttpError { status: 403, reason: "accessDenied" }));
    /// ```
    pub fn when<P2>(self, predicate: P2) -> Retry<OnFailure<M, P2>, S> {
        Retry {
            strategy: self.strategy.when(predicate),
            policy: self.policy,
            sleeper: self.sleeper,
            hook: self.hook,
        }
    }

    /// Would `error` be retried (budget permitting)?
    pub fn should_retry<E>(&self, error: &E) -> bool
    where
        M: crate::predicate::Predicate<E>,
        P: crate::predicate::Predicate<E>,
    {
        self.strategy.should_retry(error)
    }
}

impl<P, S> Retry<OnPolledState<P>, S> {
    /// Keep polling through failed refreshes instead of propagating them.
    pub fn tolerate_failures(mut self, tolerate: bool) -> Self {
        self.strategy = self.strategy.tolerate_failures(tolerate);
        self
    }
}

impl<P, S: Sleeper> Retry<OnPolledState<P>, S> {
    /// Call `refresh` on `instance` until the instance satisfies the predicate.
    ///
    /// The instance is borrowed for the whole sequence and handed back to the
    /// caller untouched by the engine; only `refresh` mutates it.
    ///
    /// ```rust
    /// use steadfast::Retry;
    /// use steadfast::testing::RecordingSleeper;
    ///
    /// struct Job { polls: u32, state: &'static str }
    ///
    /// let retry = Retry::on_polled_state(|job: &Job| job.state == "DONE")
    ///     .with_sleeper(RecordingSleeper::new());
    /// let mut job = Job { polls: 0, state: "RUNNING" };
    ///
    /// retry
    ///     .poll(&mut job, |job| {
    ///         job.polls += 1;
    ///         if job.polls == 3 {
    ///             job.state = "DONE";
    ///         }
    ///         Ok::<_, ()>(())
    ///     })
    ///     .unwrap();
    /// assert_eq!(job.polls, 3);
    /// ```
    pub fn poll<I, T, E, F>(&self, instance: &mut I, mut refresh: F) -> Result<T, E>
    where
        I: ?Sized,
        P: crate::predicate::Predicate<I>,
        F: FnMut(&mut I) -> Result<T, E>,
    {
        engine::run(&self.policy, &self.sleeper, self.hook.as_ref(), || {
            let outcome = refresh(&mut *instance);
            self.strategy.classify_state(&*instance, outcome)
        })
    }

    /// [`poll`](Self::poll) using the instance's own [`Refresh`] impl.
    pub fn poll_refresh<I>(&self, instance: &mut I) -> Result<(), I::Error>
    where
        I: Refresh + ?Sized,
        P: crate::predicate::Predicate<I>,
    {
        self.poll(instance, |instance| instance.refresh())
    }
}

impl<C: fmt::Debug, S: fmt::Debug> fmt::Debug for Retry<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("strategy", &self.strategy)
            .field("policy", &self.policy)
            .field("sleeper", &self.sleeper)
            .field("hook", &self.hook.as_ref().map(|_| "Fn(&RetryEvent)"))
            .finish()
    }
}

/// An operation wrapped by [`Retry::wrap`].
pub struct Retrying<'r, C, S, F> {
    retry: &'r Retry<C, S>,
    operation: F,
}

impl<C, S: Sleeper, F> Retrying<'_, C, S, F> {
    /// Run a fresh attempt sequence.
    pub fn call<T, E>(&mut self) -> Result<T, E>
    where
        C: Classify<T, E>,
        F: FnMut() -> Result<T, E>,
    {
        self.retry.call(&mut self.operation)
    }

    /// Run a fresh attempt sequence, handing a clone of `args` to every
    /// attempt.
    ///
    /// ```rust
    /// use steadfast::Retry;
    /// use steadfast::testing::RecordingSleeper;
    ///
    /// let retry = Retry::on_failure(|e: &&str| *e == "conflict")
    ///     .with_sleeper(RecordingSleeper::new());
    /// let mut seen = Vec::new();
    /// let mut delete = retry.wrap(|force: bool| {
    ///     seen.push(force);
    ///     if seen.len() < 2 { Err("conflict") } else { Ok(()) }
    /// });
    ///
    /// assert_eq!(delete.call_with(true), Ok(()));
    /// drop(delete);
    /// assert_eq!(seen, vec![true, true]);
    /// ```
    pub fn call_with<A, T, E>(&mut self, args: A) -> Result<T, E>
    where
        A: Clone,
        C: Classify<T, E>,
        F: FnMut(A) -> Result<T, E>,
    {
        let operation = &mut self.operation;
        self.retry.call(|| operation(args.clone()))
    }
}

impl<C, S, F> fmt::Debug for Retrying<'_, C, S, F>
where
    C: fmt::Debug,
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retrying")
            .field("retry", self.retry)
            .finish_non_exhaustive()
    }
}
