//! Property-based tests for the backoff schedule and attempt accounting

use proptest::prelude::*;
use std::time::Duration;
use steadfast::testing::{RecordingSleeper, Script};
use steadfast::{Retry, RetryPolicy};

fn policy_strategy() -> impl Strategy<Value = RetryPolicy> {
    (1u32..=12, 1u64..=3_000, 1.05f64..4.0, 0u64..=90_000).prop_map(
        |(max_tries, delay_ms, backoff, extra_ms)| {
            RetryPolicy::builder()
                .max_tries(max_tries)
                .delay(Duration::from_millis(delay_ms))
                .backoff(backoff)
                .max_delay(Duration::from_millis(delay_ms + extra_ms))
                .build()
                .expect("generated policy is valid")
        },
    )
}

proptest! {
    #[test]
    fn prop_schedule_has_one_sleep_per_retry(policy in policy_strategy()) {
        prop_assert_eq!(policy.schedule().count() as u32, policy.max_tries() - 1);
    }

    #[test]
    fn prop_schedule_is_monotonic_and_capped(policy in policy_strategy()) {
        let delays: Vec<Duration> = policy.schedule().collect();
        for pair in delays.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
        for delay in &delays {
            prop_assert!(*delay >= policy.delay());
            prop_assert!(*delay <= policy.max_delay());
        }
    }

    #[test]
    fn prop_first_sleep_is_initial_delay(policy in policy_strategy()) {
        if policy.max_tries() > 1 {
            prop_assert_eq!(policy.delay_for_attempt(0), Some(policy.delay()));
        } else {
            prop_assert_eq!(policy.delay_for_attempt(0), None);
        }
    }

    #[test]
    fn prop_no_delay_after_last_attempt(policy in policy_strategy(), beyond in 0u32..100) {
        let last = policy.max_tries() - 1;
        prop_assert_eq!(policy.delay_for_attempt(last.saturating_add(beyond)), None);
    }

    #[test]
    fn prop_exhausted_failure_makes_max_tries_attempts(policy in policy_strategy()) {
        let sleeper = RecordingSleeper::new();
        let script = Script::<(), u8>::always(Err(7));
        let retry = Retry::on_failure(|_: &u8| true)
            .with_policy(policy.clone())
            .with_sleeper(sleeper.clone());

        prop_assert_eq!(retry.call(|| script.call()), Err(7));
        prop_assert_eq!(script.calls(), policy.max_tries());
        prop_assert_eq!(sleeper.recorded(), policy.schedule().collect::<Vec<_>>());
        prop_assert_eq!(sleeper.total(), policy.total_delay());
    }

    #[test]
    fn prop_non_matching_failure_is_single_attempt(policy in policy_strategy()) {
        let sleeper = RecordingSleeper::new();
        let script = Script::<(), u8>::always(Err(1));
        let retry = Retry::on_failure(|e: &u8| *e == 0)
            .with_policy(policy)
            .with_sleeper(sleeper.clone());

        prop_assert_eq!(retry.call(|| script.call()), Err(1));
        prop_assert_eq!(script.calls(), 1);
        prop_assert_eq!(sleeper.count(), 0);
    }

    #[test]
    fn prop_result_policy_stops_at_first_accepted(
        empty_prefix in 0usize..12,
        max_tries in 1u32..=12,
    ) {
        let mut outcomes: Vec<Result<Vec<u8>, ()>> = vec![Ok(vec![]); empty_prefix];
        outcomes.push(Ok(vec![1]));
        let script = Script::new(outcomes);
        let policy = RetryPolicy::builder().max_tries(max_tries).build().unwrap();
        let retry = Retry::on_result(|rows: &Vec<u8>| !rows.is_empty())
            .with_policy(policy)
            .with_sleeper(RecordingSleeper::new());

        let result = retry.call(|| script.call());
        let needed = empty_prefix as u32 + 1;
        if needed <= max_tries {
            prop_assert_eq!(result, Ok(vec![1]));
            prop_assert_eq!(script.calls(), needed);
        } else {
            prop_assert_eq!(result, Ok(vec![]));
            prop_assert_eq!(script.calls(), max_tries);
        }
    }
}
