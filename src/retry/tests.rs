//! Behavioral tests for the three retry strategies.

use super::*;
use crate::predicate::{ge, is_not_empty};
use crate::testing::{RecordingSleeper, Script};
use crate::{assert_attempts, assert_sleeps};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum ApiError {
    Throttled,
    NotFound,
}

fn tries(max_tries: u32) -> RetryPolicy {
    RetryPolicy::builder().max_tries(max_tries).build().unwrap()
}

#[test]
fn test_matching_failure_exhausts_budget_and_returns_last_failure() {
    let sleeper = RecordingSleeper::new();
    let script = Script::<(), _>::always(Err(ApiError::Throttled));
    let retry = Retry::on_failure(|_: &ApiError| true)
        .with_policy(tries(5))
        .with_sleeper(sleeper.clone());

    assert_eq!(retry.call(|| script.call()), Err(ApiError::Throttled));
    assert_attempts!(script, 5);
    assert_eq!(sleeper.count(), 4);
}

#[test]
fn test_non_matching_failure_propagates_after_one_attempt() {
    let sleeper = RecordingSleeper::new();
    let script = Script::<(), _>::always(Err(ApiError::NotFound));
    let retry = Retry::on_failure(|e: &ApiError| *e == ApiError::Throttled)
        .with_sleeper(sleeper.clone());

    assert_eq!(retry.call(|| script.call()), Err(ApiError::NotFound));
    assert_attempts!(script, 1);
    assert_sleeps!(sleeper, []);
}

#[test]
fn test_predicate_rejection_propagates_immediately() {
    let sleeper = RecordingSleeper::new();
    let retry = Retry::on_failure(|_: &ApiError| true)
        .when(|e: &ApiError| *e == ApiError::Throttled)
        .with_sleeper(sleeper.clone());

    let script = Script::new(vec![Err(ApiError::Throttled), Err(ApiError::NotFound), Ok(1)]);
    assert_eq!(retry.call(|| script.call()), Err(ApiError::NotFound));
    assert_attempts!(script, 2);
    assert_sleeps!(sleeper, [1]);
}

#[test]
fn test_panicking_classifier_unwinds_without_retry() {
    let sleeper = RecordingSleeper::new();
    let script = Script::<(), _>::always(Err(ApiError::Throttled));
    let retry = Retry::on_failure(|_: &ApiError| -> bool { panic!("classifier bug") })
        .with_sleeper(sleeper.clone());

    let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| retry.call(|| script.call())));

    assert!(outcome.is_err());
    assert_attempts!(script, 1);
    assert_sleeps!(sleeper, []);
}

#[test]
fn test_result_policy_stops_at_first_non_empty() {
    let sleeper = RecordingSleeper::new();
    let script = Script::<Vec<&str>, ()>::new(vec![
        Ok(vec![]),
        Ok(vec![]),
        Ok(vec![]),
        Ok(vec!["row-1", "row-2"]),
    ]);
    let retry = Retry::on_result(is_not_empty()).with_sleeper(sleeper.clone());

    assert_eq!(retry.call(|| script.call()), Ok(vec!["row-1", "row-2"]));
    assert_attempts!(script, 4);
    assert_sleeps!(sleeper, [1, 2, 4]);
}

#[test]
fn test_result_policy_returns_last_unsatisfying_value() {
    let script = Script::<Vec<u8>, ()>::always(Ok(vec![]));
    let retry = Retry::on_result(is_not_empty())
        .with_policy(tries(3))
        .with_sleeper(RecordingSleeper::new());

    assert_eq!(retry.call(|| script.call()), Ok(vec![]));
    assert_attempts!(script, 3);
}

#[test]
fn test_result_policy_does_not_catch_failures() {
    let script = Script::<Vec<u8>, _>::new(vec![Ok(vec![]), Err(ApiError::Throttled)]);
    let retry = Retry::on_result(is_not_empty()).with_sleeper(RecordingSleeper::new());

    assert_eq!(retry.call(|| script.call()), Err(ApiError::Throttled));
    assert_attempts!(script, 2);
}

#[test]
fn test_result_policy_returns_first_satisfying_value() {
    let script = Script::<u32, ()>::new(vec![Ok(1), Ok(2), Ok(3), Ok(4)]);
    let retry = Retry::on_result(ge(3))
        .with_policy(tries(10))
        .with_sleeper(RecordingSleeper::new());

    assert_eq!(retry.call(|| script.call()), Ok(3));
    assert_attempts!(script, 3);
}

#[derive(Debug)]
struct Job {
    refreshes: u32,
    done_after: u32,
    state: String,
}

impl Job {
    fn new(done_after: u32) -> Self {
        Self {
            refreshes: 0,
            done_after,
            state: "PENDING".to_string(),
        }
    }

    fn reload(&mut self) -> Result<(), ApiError> {
        self.refreshes += 1;
        self.state = if self.refreshes >= self.done_after {
            "DONE".to_string()
        } else {
            "RUNNING".to_string()
        };
        Ok(())
    }
}

fn job_done(job: &Job) -> bool {
    job.state.eq_ignore_ascii_case("done")
}

#[test]
fn test_polled_state_refreshes_until_done() {
    let sleeper = RecordingSleeper::new();
    let retry = Retry::on_polled_state(job_done).with_sleeper(sleeper.clone());
    let mut job = Job::new(3);

    assert_eq!(retry.poll(&mut job, Job::reload), Ok(()));
    assert_eq!(job.refreshes, 3);
    assert_eq!(job.state, "DONE");
    assert_sleeps!(sleeper, [1, 2]);
}

#[test]
fn test_polled_state_checks_instance_after_each_refresh() {
    let retry = Retry::on_polled_state(job_done).with_sleeper(RecordingSleeper::new());
    let mut job = Job::new(1);
    job.state = "DONE".to_string();

    // Already-done instances are still refreshed once.
    assert_eq!(retry.poll(&mut job, Job::reload), Ok(()));
    assert_eq!(job.refreshes, 1);
}

#[test]
fn test_polled_state_exhaustion_returns_last_refresh_result() {
    let sleeper = RecordingSleeper::new();
    let retry = Retry::on_polled_state(job_done)
        .with_policy(tries(4))
        .with_sleeper(sleeper.clone());
    let mut job = Job::new(100);

    let result = retry.poll(&mut job, |job| job.reload().map(|()| job.refreshes));
    assert_eq!(result, Ok(4));
    assert_eq!(job.state, "RUNNING");
    assert_sleeps!(sleeper, [1, 2, 4]);
}

#[test]
fn test_polled_state_failed_refresh_propagates_by_default() {
    let retry = Retry::on_polled_state(job_done).with_sleeper(RecordingSleeper::new());
    let mut job = Job::new(3);
    let mut calls = 0;

    let result = retry.poll(&mut job, |job| {
        calls += 1;
        if calls == 1 {
            Err(ApiError::Throttled)
        } else {
            job.reload()
        }
    });

    assert_eq!(result, Err(ApiError::Throttled));
    assert_eq!(calls, 1);
}

#[test]
fn test_tolerant_polling_recovers_from_transient_failure() {
    let sleeper = RecordingSleeper::new();
    let retry = Retry::on_polled_state(job_done)
        .tolerate_failures(true)
        .with_sleeper(sleeper.clone());
    let mut job = Job::new(2);
    let mut calls = 0;

    let result = retry.poll(&mut job, |job| {
        calls += 1;
        if calls == 1 {
            Err(ApiError::Throttled)
        } else {
            job.reload()
        }
    });

    assert_eq!(result, Ok(()));
    assert_eq!(calls, 3);
    assert_sleeps!(sleeper, [1, 2]);
}

#[test]
fn test_tolerant_polling_returns_last_failure_on_exhaustion() {
    let retry = Retry::on_polled_state(job_done)
        .tolerate_failures(true)
        .with_policy(tries(2))
        .with_sleeper(RecordingSleeper::new());
    let mut job = Job::new(1);

    let result: Result<(), _> = retry.poll(&mut job, |_| Err(ApiError::NotFound));
    assert_eq!(result, Err(ApiError::NotFound));
    assert_eq!(job.refreshes, 0);
}

#[test]
fn test_default_schedule_sleeps_doubling_up_to_cap() {
    let sleeper = RecordingSleeper::new();
    let script = Script::<(), _>::always(Err(ApiError::Throttled));
    let retry = Retry::on_failure(|_: &ApiError| true).with_sleeper(sleeper.clone());

    let _ = retry.call(|| script.call());

    assert_attempts!(script, 8);
    assert_sleeps!(sleeper, [1, 2, 4, 8, 16, 32, 64]);
    assert_eq!(sleeper.total(), Duration::from_secs(127));
}

#[test]
fn test_single_try_never_sleeps() {
    let sleeper = RecordingSleeper::new();
    let retry = Retry::on_result(is_not_empty())
        .with_policy(tries(1))
        .with_sleeper(sleeper.clone());

    assert_eq!(retry.call(|| Ok::<Vec<u8>, ()>(vec![])), Ok(vec![]));
    assert_sleeps!(sleeper, []);
}

#[test]
fn test_capped_schedule() {
    let sleeper = RecordingSleeper::new();
    let policy = RetryPolicy::builder()
        .max_tries(6)
        .delay(Duration::from_secs(2))
        .backoff(3.0)
        .max_delay(Duration::from_secs(20))
        .build()
        .unwrap();
    let retry = Retry::on_failure(|_: &ApiError| true)
        .with_policy(policy)
        .with_sleeper(sleeper.clone());

    let _ = retry.call(|| Err::<(), _>(ApiError::Throttled));
    assert_sleeps!(sleeper, [2, 6, 18, 20, 20]);
}

#[test]
fn test_every_call_starts_a_fresh_sequence() {
    let sleeper = RecordingSleeper::new();
    let retry = Retry::on_failure(|_: &ApiError| true)
        .with_policy(tries(3))
        .with_sleeper(sleeper.clone());

    let first = Script::<(), _>::always(Err(ApiError::Throttled));
    let second = Script::<(), _>::always(Err(ApiError::Throttled));
    let _ = retry.call(|| first.call());
    let _ = retry.call(|| second.call());

    assert_attempts!(first, 3);
    assert_attempts!(second, 3);
    assert_sleeps!(sleeper, [1, 2, 1, 2]);
}

#[test]
fn test_wrapped_operation_is_reusable() {
    let sleeper = RecordingSleeper::new();
    let retry = Retry::on_result(ge(2u32)).with_sleeper(sleeper.clone());
    let mut counter = 0u32;
    let mut wrapped = retry.wrap(|| {
        counter += 1;
        Ok::<_, ()>(counter % 2)
    });

    // Alternates 1, 0 and never reaches 2.
    assert_eq!(wrapped.call(), Ok(0));
    assert_eq!(wrapped.call(), Ok(0));
    drop(wrapped);
    assert_eq!(counter, 16);
    assert_eq!(sleeper.count(), 14);
}

#[test]
fn test_call_with_forwards_arguments_to_every_attempt() {
    let retry = Retry::on_failure(|e: &ApiError| *e == ApiError::Throttled)
        .with_policy(tries(3))
        .with_sleeper(RecordingSleeper::new());
    let mut seen = Vec::new();
    let mut insert = retry.wrap(|args: (&'static str, usize)| {
        seen.push(args);
        Err::<(), _>(ApiError::Throttled)
    });

    assert_eq!(insert.call_with(("events", 2)), Err(ApiError::Throttled));
    drop(insert);
    assert_eq!(seen, vec![("events", 2); 3]);
}

#[test]
fn test_hook_observes_each_retry() {
    let sleeper = RecordingSleeper::new();
    let events = Arc::new(Mutex::new(Vec::new()));
    let retry = Retry::on_result(is_not_empty())
        .with_policy(tries(4))
        .with_sleeper(sleeper.clone())
        .on_retry({
            let events = events.clone();
            move |event: &RetryEvent| events.lock().unwrap().push(*event)
        });

    let script = Script::<Vec<u8>, ()>::new(vec![Ok(vec![]), Ok(vec![]), Ok(vec![1])]);
    assert_eq!(retry.call(|| script.call()), Ok(vec![1]));

    let events = events.lock().unwrap();
    assert_eq!(events.len(), sleeper.count());
    assert_eq!(
        events.iter().map(|e| e.attempt).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(events[1].next_delay, Duration::from_secs(2));
    assert!(events
        .iter()
        .all(|e| e.trigger == RetryTrigger::UnsatisfiedResult));
}

#[test]
fn test_hook_is_not_called_when_first_attempt_succeeds() {
    let fired = Arc::new(Mutex::new(0));
    let retry = Retry::on_failure(|_: &ApiError| true)
        .with_sleeper(RecordingSleeper::new())
        .on_retry({
            let fired = fired.clone();
            move |_: &RetryEvent| *fired.lock().unwrap() += 1
        });

    assert_eq!(retry.call(|| Ok::<_, ApiError>(5)), Ok(5));
    assert_eq!(*fired.lock().unwrap(), 0);
}

#[test]
fn test_retry_is_shareable_across_threads() {
    let retry = Arc::new(
        Retry::on_failure(|e: &ApiError| *e == ApiError::Throttled)
            .with_policy(tries(3))
            .with_sleeper(RecordingSleeper::new()),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let retry = retry.clone();
            std::thread::spawn(move || {
                let script = Script::<(), _>::always(Err(ApiError::Throttled));
                let _ = retry.call(|| script.call());
                script.calls()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 3);
    }
    assert_eq!(retry.sleeper().count(), 8);
}

#[test]
fn test_debug_output() {
    let retry = Retry::on_result(ge(1)).on_retry(|_| {});
    let debug = format!("{retry:?}");
    assert!(debug.contains("OnResult"));
    assert!(debug.contains("Fn(&RetryEvent)"));
}
