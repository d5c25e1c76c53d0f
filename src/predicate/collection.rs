//! Collection predicates
//!
//! Listing calls against an eventually consistent service often return an
//! empty page right after a write. These predicates say when a page is
//! complete enough to stop polling.

use super::combinators::Predicate;

/// Holds once a listing returns at least one item.
#[derive(Clone, Copy, Default, Debug)]
pub struct IsNotEmpty;

impl<T> Predicate<Vec<T>> for IsNotEmpty {
    #[inline]
    fn check(&self, value: &Vec<T>) -> bool {
        !value.is_empty()
    }
}

impl<T> Predicate<[T]> for IsNotEmpty {
    #[inline]
    fn check(&self, value: &[T]) -> bool {
        !value.is_empty()
    }
}

/// Stop polling as soon as anything comes back.
///
/// ```rust
/// use steadfast::predicate::*;
///
/// assert!(is_not_empty().check(&vec!["row-1"]));
/// assert!(!is_not_empty().check(&Vec::<i32>::new()));
/// ```
pub fn is_not_empty() -> IsNotEmpty {
    IsNotEmpty
}

/// Holds once a listing has reached a minimum size.
#[derive(Clone, Copy, Debug)]
pub struct HasMinLen {
    min: usize,
}

impl<T> Predicate<Vec<T>> for HasMinLen {
    #[inline]
    fn check(&self, value: &Vec<T>) -> bool {
        value.len() >= self.min
    }
}

impl<T> Predicate<[T]> for HasMinLen {
    #[inline]
    fn check(&self, value: &[T]) -> bool {
        value.len() >= self.min
    }
}

/// Stop polling once at least `min` items are visible.
pub fn has_min_len(min: usize) -> HasMinLen {
    HasMinLen { min }
}

/// Predicate that checks every expected element is present.
#[derive(Clone, Debug)]
pub struct ContainsAll<T> {
    expected: Vec<T>,
}

impl<T: PartialEq + Send + Sync> Predicate<Vec<T>> for ContainsAll<T> {
    fn check(&self, value: &Vec<T>) -> bool {
        self.expected.iter().all(|item| value.contains(item))
    }
}

impl<T: PartialEq + Send + Sync> Predicate<[T]> for ContainsAll<T> {
    fn check(&self, value: &[T]) -> bool {
        self.expected.iter().all(|item| value.contains(item))
    }
}

/// Create a predicate that holds once every item in `expected` shows up.
///
/// Matches the "all created topics are listed" check: order and extra items
/// do not matter.
///
/// ```rust
/// use steadfast::predicate::*;
///
/// let listed = contains_all(vec!["a", "b"]);
/// assert!(listed.check(&vec!["b", "x", "a"]));
/// assert!(!listed.check(&vec!["a"]));
/// ```
pub fn contains_all<T: PartialEq + Send + Sync>(expected: Vec<T>) -> ContainsAll<T> {
    ContainsAll { expected }
}
