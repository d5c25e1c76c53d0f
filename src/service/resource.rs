//! Remote resources that are polled until they reach a state.

use crate::predicate::Predicate;

/// A local handle to a remote resource that can re-fetch its own state.
///
/// Long-running jobs are the typical case: the handle starts out stale and
/// every `refresh` overwrites it with what the service reports now.
pub trait Refresh {
    /// Failure of a single refresh.
    type Error;

    /// Replace the local view with the service's current one.
    fn refresh(&mut self) -> Result<(), Self::Error>;
}

impl<R: Refresh + ?Sized> Refresh for &mut R {
    type Error = R::Error;

    fn refresh(&mut self) -> Result<(), Self::Error> {
        (**self).refresh()
    }
}

impl<R: Refresh + ?Sized> Refresh for Box<R> {
    type Error = R::Error;

    fn refresh(&mut self) -> Result<(), Self::Error> {
        (**self).refresh()
    }
}

/// A resource that reports a textual lifecycle state such as `RUNNING`.
pub trait HasState {
    /// The last state seen by the handle.
    fn state(&self) -> &str;
}

/// Matches resources whose state equals a value, ignoring ASCII case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateIs {
    expected: String,
}

impl<R: HasState + ?Sized> Predicate<R> for StateIs {
    fn check(&self, resource: &R) -> bool {
        resource.state().eq_ignore_ascii_case(&self.expected)
    }
}

/// Matches resources in state `expected`.
///
/// ```rust
/// use steadfast::predicate::Predicate;
/// use steadfast::service::{state_is, HasState};
///
/// struct Job(&'static str);
/// impl HasState for Job {
///     fn state(&self) -> &str { self.0 }
/// }
///
/// assert!(state_is("done").check(&Job("DONE")));
/// assert!(!state_is("done").check(&Job("RUNNING")));
/// ```
pub fn state_is(expected: impl Into<String>) -> StateIs {
    StateIs {
        expected: expected.into(),
    }
}
