//! Composable predicates used to classify retry outcomes
//!
//! Every retry strategy is parameterized by one or more [`Predicate`]s. A
//! closure works anywhere a predicate is expected; the named constructors in
//! this module cover the checks the service presets need and compose with
//! `and`, `or` and `not`.
//!
//! # Example
//!
//! ```rust
//! use steadfast::predicate::*;
//!
//! let finished_rows = ge(4).and(lt(100));
//! assert!(finished_rows.check(&4));
//! assert!(!finished_rows.check(&3));
//!
//! assert!(is_not_empty().check(&vec!["row-1"]));
//! ```

mod collection;
mod combinators;
mod number;

pub use combinators::{always, is_true, Always, And, IsTrue, Not, Or, Predicate, PredicateExt};
pub use collection::{contains_all, has_min_len, is_not_empty, ContainsAll, HasMinLen, IsNotEmpty};
pub use number::{eq, ge, gt, lt, Eq, Ge, Gt, Lt};
