//! Ready-made retries for the transient conditions cloud services report.
//!
//! Every preset uses the default [`RetryPolicy`] unless noted, and a real
//! sleeper. Swap either with `with_policy` / `with_sleeper`.

use std::num::NonZeroU32;

use super::classify::{rate_limit_exceeded, resource_in_use, unavailable, HasReason};
use super::error::{Code, ErrorKind};
use super::resource::{state_is, StateIs};
use crate::predicate::{is_not_empty, is_true, IsNotEmpty, IsTrue};
use crate::retry::{Retry, RetryOnFailure, RetryOnPolledState, RetryOnResult, RetryPolicy};

/// Attempts used by the eventual-consistency presets.
pub const EVENTUAL_TRIES: u32 = 8;

/// Retry 403s whose details say `rateLimitExceeded`.
///
/// Table metadata updates are throttled this way.
pub fn retry_rate_limited() -> RetryOnFailure<ErrorKind, HasReason> {
    Retry::on_failure(ErrorKind::Forbidden).when(rate_limit_exceeded())
}

/// Retry 400s whose details say `resourceInUse`.
///
/// Deleting a dataset right after its tables fails this way for a while.
pub fn retry_resource_in_use() -> RetryOnFailure<ErrorKind, HasReason> {
    Retry::on_failure(ErrorKind::BadRequest).when(resource_in_use())
}

/// Retry any 409.
pub fn retry_conflict() -> RetryOnFailure<ErrorKind> {
    Retry::on_failure(ErrorKind::Conflict)
}

/// Retry gRPC `UNAVAILABLE`.
pub fn retry_unavailable() -> RetryOnFailure<Code> {
    Retry::on_failure(unavailable())
}

/// Retry until a listing returns at least one item.
///
/// ```rust
/// use steadfast::service::retry_until_non_empty;
/// use steadfast::testing::RecordingSleeper;
///
/// let retry = retry_until_non_empty().with_sleeper(RecordingSleeper::new());
/// let mut polls = 0;
/// let rows = retry.call(|| {
///     polls += 1;
///     Ok::<_, ()>(if polls < 3 { vec![] } else { vec!["row"] })
/// });
/// assert_eq!(rows, Ok(vec!["row"]));
/// ```
pub fn retry_until_non_empty() -> RetryOnResult<IsNotEmpty> {
    Retry::on_result(is_not_empty()).with_policy(eventual_policy())
}

/// Retry an existence check until it answers `true`, at most `tries` times.
pub fn retry_until_true(tries: NonZeroU32) -> RetryOnResult<IsTrue> {
    Retry::on_result(is_true()).with_policy(RetryPolicy::attempts(tries))
}

/// Refresh a job until its state is `done`, ignoring case.
pub fn retry_until_done() -> RetryOnPolledState<StateIs> {
    Retry::on_polled_state(state_is("done")).with_policy(eventual_policy())
}

fn eventual_policy() -> RetryPolicy {
    match NonZeroU32::new(EVENTUAL_TRIES) {
        Some(tries) => RetryPolicy::attempts(tries),
        None => RetryPolicy::default(),
    }
}
