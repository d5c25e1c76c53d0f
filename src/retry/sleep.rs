//! The blocking wait between attempts.

use std::sync::Arc;
use std::time::Duration;

/// Blocks the current thread between two attempts.
///
/// The engine never sleeps any other way, so swapping the sleeper is enough
/// to run a retry sequence without real waiting (see
/// [`RecordingSleeper`](crate::testing::RecordingSleeper)).
pub trait Sleeper {
    /// Wait for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Sleeps with [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

impl<S: Sleeper + ?Sized> Sleeper for Arc<S> {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}
