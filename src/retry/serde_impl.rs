//! Serde support for retry policies (feature-gated)
//!
//! Policies are written with durations as fractional seconds so that they can
//! live in ordinary configuration files. Missing fields take the defaults and
//! every value is validated on the way in.
//!
//! Seconds are an `f64`, which holds about 15 significant digits. Millisecond
//! delays survive a round trip unchanged; nanoseconds on durations of months
//! or longer do not, and load back rounded to the nearest representable value.
//!
//! # Example
//!
//! ```rust
//! use steadfast::RetryPolicy;
//! use std::time::Duration;
//!
//! let policy: RetryPolicy = serde_json::from_str(r#"{"max_tries": 4, "delay": 0.5}"#).unwrap();
//! assert_eq!(policy.max_tries(), 4);
//! assert_eq!(policy.delay(), Duration::from_millis(500));
//! assert_eq!(policy.max_delay(), Duration::from_secs(64));
//!
//! // Invalid values are rejected during deserialization
//! let bad: Result<RetryPolicy, _> = serde_json::from_str(r#"{"backoff": 0.5}"#);
//! assert!(bad.is_err());
//! ```

use std::time::Duration;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::policy::RetryPolicy;

#[derive(Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PolicyFile {
    max_tries: u32,
    delay: f64,
    backoff: f64,
    max_delay: f64,
}

impl Default for PolicyFile {
    fn default() -> Self {
        Self::from(&RetryPolicy::default())
    }
}

impl From<&RetryPolicy> for PolicyFile {
    fn from(policy: &RetryPolicy) -> Self {
        Self {
            max_tries: policy.max_tries(),
            delay: policy.delay().as_secs_f64(),
            backoff: policy.backoff(),
            max_delay: policy.max_delay().as_secs_f64(),
        }
    }
}

fn seconds<E: de::Error>(field: &str, secs: f64) -> Result<Duration, E> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        E::custom(format_args!(
            "{field} must be a non-negative number of seconds, got {secs}"
        ))
    })
}

impl Serialize for RetryPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PolicyFile::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RetryPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let file = PolicyFile::deserialize(deserializer)?;
        RetryPolicy::new(
            file.max_tries,
            seconds("delay", file.delay)?,
            file.backoff,
            seconds("max_delay", file.max_delay)?,
        )
        .map_err(de::Error::custom)
    }
}
