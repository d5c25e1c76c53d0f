//! Comparison predicates
//!
//! Mostly used as result classifiers, e.g. "stop once the reported row count
//! reaches the number of rows inserted".

use super::combinators::Predicate;

/// Holds when the value equals the wrapped one.
#[derive(Clone, Copy, Debug)]
pub struct Eq<T>(pub T);

impl<T: PartialEq + Send + Sync> Predicate<T> for Eq<T> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        *value == self.0
    }
}

/// Match one exact value, such as a terminal status.
///
/// ```rust
/// use steadfast::predicate::*;
///
/// assert!(eq("DONE").check(&"DONE"));
/// assert!(!eq(404u16).check(&409));
/// ```
pub fn eq<T: PartialEq + Send + Sync>(value: T) -> Eq<T> {
    Eq(value)
}

/// Holds when the value is strictly above the bound.
#[derive(Clone, Copy, Debug)]
pub struct Gt<T>(pub T);

impl<T: PartialOrd + Send + Sync> Predicate<T> for Gt<T> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        *value > self.0
    }
}

/// Create a predicate that checks `value > bound`.
pub fn gt<T: PartialOrd + Send + Sync>(bound: T) -> Gt<T> {
    Gt(bound)
}

/// Holds when the value is at or above the bound.
#[derive(Clone, Copy, Debug)]
pub struct Ge<T>(pub T);

impl<T: PartialOrd + Send + Sync> Predicate<T> for Ge<T> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        *value >= self.0
    }
}

/// Create a predicate that checks `value >= bound`.
///
/// ```rust
/// use steadfast::predicate::*;
///
/// let enough = ge(3);
/// assert!(enough.check(&3));
/// assert!(!enough.check(&2));
/// ```
pub fn ge<T: PartialOrd + Send + Sync>(bound: T) -> Ge<T> {
    Ge(bound)
}

/// Holds when the value is strictly below the bound.
#[derive(Clone, Copy, Debug)]
pub struct Lt<T>(pub T);

impl<T: PartialOrd + Send + Sync> Predicate<T> for Lt<T> {
    #[inline]
    fn check(&self, value: &T) -> bool {
        *value < self.0
    }
}

/// Create a predicate that checks `value < bound`.
pub fn lt<T: PartialOrd + Send + Sync>(bound: T) -> Lt<T> {
    Lt(bound)
}
