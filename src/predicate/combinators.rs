//! The predicate trait and its logical combinators
//!
//! A [`Predicate`] is the strategy object every retry classifier is built
//! from. Call sites usually pass a closure; the named types here exist so that
//! common checks can be combined without boxing.

/// A yes/no question asked about a value of type `T`.
///
/// What the answer means depends on where the predicate is plugged in: a
/// failure predicate answers "is this worth another attempt?", a result or
/// state predicate answers "is this good enough to stop?".
///
/// # Example
///
/// ```rust
/// use steadfast::predicate::*;
///
/// let in_range = ge(1).and(lt(10));
/// assert!(in_range.check(&3));
/// assert!(!in_range.check(&10));
/// ```
pub trait Predicate<T: ?Sized>: Send + Sync {
    /// Answer the question for `value`.
    fn check(&self, value: &T) -> bool;
}

impl<T: ?Sized, F> Predicate<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    #[inline]
    fn check(&self, value: &T) -> bool {
        self(value)
    }
}

/// Extension trait for combining predicates.
///
/// # Example
///
/// ```rust
/// use steadfast::predicate::*;
///
/// let p = gt(2).and(lt(10)).or(eq(0));
/// assert!(p.check(&3));
/// assert!(p.check(&0));
/// assert!(!p.check(&1));
/// ```
pub trait PredicateExt<T: ?Sized>: Predicate<T> + Sized {
    /// True only when both predicates are true.
    fn and<P: Predicate<T>>(self, other: P) -> And<Self, P> {
        And(self, other)
    }

    /// True when either predicate is true.
    fn or<P: Predicate<T>>(self, other: P) -> Or<Self, P> {
        Or(self, other)
    }

    /// Holds exactly when `self` does not.
    fn not(self) -> Not<Self> {
        Not(self)
    }
}

impl<T: ?Sized, P: Predicate<T>> PredicateExt<T> for P {}

/// Both predicates hold. Short-circuits on the first.
#[derive(Clone, Copy, Debug)]
pub struct And<P1, P2>(pub P1, pub P2);

impl<T: ?Sized, P1: Predicate<T>, P2: Predicate<T>> Predicate<T> for And<P1, P2> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        self.0.check(value) && self.1.check(value)
    }
}

/// At least one predicate holds. Short-circuits on the first.
#[derive(Clone, Copy, Debug)]
pub struct Or<P1, P2>(pub P1, pub P2);

impl<T: ?Sized, P1: Predicate<T>, P2: Predicate<T>> Predicate<T> for Or<P1, P2> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        self.0.check(value) || self.1.check(value)
    }
}

/// The wrapped predicate does not hold.
#[derive(Clone, Copy, Debug)]
pub struct Not<P>(pub P);

impl<T: ?Sized, P: Predicate<T>> Predicate<T> for Not<P> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        !self.0.check(value)
    }
}

/// Predicate that holds for every value.
///
/// This is the default failure predicate: once a failure passes the kind
/// filter it is retried unconditionally.
#[derive(Clone, Copy, Default, Debug)]
pub struct Always;

impl<T: ?Sized> Predicate<T> for Always {
    #[inline]
    fn check(&self, _value: &T) -> bool {
        true
    }
}

/// Create a predicate that holds for every value.
///
/// ```rust
/// use steadfast::predicate::*;
///
/// assert!(always().check(&"anything"));
/// ```
pub fn always() -> Always {
    Always
}

/// Predicate that is satisfied by `true`.
#[derive(Clone, Copy, Default, Debug)]
pub struct IsTrue;

impl Predicate<bool> for IsTrue {
    #[inline]
    fn check(&self, value: &bool) -> bool {
        *value
    }
}

/// Create a predicate satisfied by a `true` result.
///
/// Used for existence probes, which return `Ok(false)` until the remote
/// service has caught up.
///
/// ```rust
/// use steadfast::predicate::*;
///
/// assert!(is_true().check(&true));
/// assert!(!is_true().check(&false));
/// ```
pub fn is_true() -> IsTrue {
    IsTrue
}
