//! Cloud service failures, classifiers and preset retries
//!
//! Client libraries surface failures as data: an HTTP status with a list of
//! reason codes, or a gRPC status. This module models that data as
//! [`ServiceError`] and provides the predicates and presets needed to decide
//! which of those failures are transient.
//!
//! # Example
//!
//! ```rust
//! use steadfast::service::{retry_rate_limited, ServiceError};
//! use steadfast::testing::RecordingSleeper;
//!
//! let retry = retry_rate_limited().with_sleeper(RecordingSleeper::new());
//! let mut updates = 0;
//! let result = retry.call(|| {
//!     updates += 1;
//!     if updates == 1 {
//!         Err(ServiceError::http(403, "quota").with_detail("rateLimitExceeded", ""))
//!     } else {
//!         Ok("updated")
//!     }
//! });
//! assert_eq!(result, Ok("updated"));
//! ```

mod classify;
mod error;
mod presets;
mod resource;

pub use classify::{
    code_is, has_reason, rate_limit_exceeded, resource_in_use, unavailable, HasReason,
    RATE_LIMIT_EXCEEDED, RESOURCE_IN_USE,
};
pub use error::{Code, ErrorDetail, ErrorKind, ServiceError};
pub use presets::{
    retry_conflict, retry_rate_limited, retry_resource_in_use, retry_unavailable,
    retry_until_done, retry_until_non_empty, retry_until_true, EVENTUAL_TRIES,
};
pub use resource::{state_is, HasState, Refresh, StateIs};
