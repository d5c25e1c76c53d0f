//! Predicates over [`ServiceError`] fields.
//!
//! These narrow an allow-list match. A 403 is not always worth retrying, a
//! 403 whose details say `rateLimitExceeded` is.

use super::error::{Code, ServiceError};
use crate::predicate::Predicate;

/// Reason reported by services that throttle with a 403.
pub const RATE_LIMIT_EXCEEDED: &str = "rateLimitExceeded";

/// Reason reported when a resource is still held by another operation.
pub const RESOURCE_IN_USE: &str = "resourceInUse";

/// Matches failures whose detail list contains a given reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasReason {
    reason: String,
}

impl HasReason {
    /// The reason being looked for.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Predicate<ServiceError> for HasReason {
    #[inline]
    fn check(&self, error: &ServiceError) -> bool {
        error.has_reason(&self.reason)
    }
}

/// Any detail entry carries `reason`.
///
/// ```rust
/// use steadfast::predicate::Predicate;
/// use steadfast::service::{has_reason, ServiceError};
///
/// let err = ServiceError::http(400, "bad").with_detail("invalidQuery", "nope");
/// assert!(has_reason("invalidQuery").check(&err));
/// assert!(!has_reason("resourceInUse").check(&err));
/// ```
pub fn has_reason(reason: impl Into<String>) -> HasReason {
    HasReason {
        reason: reason.into(),
    }
}

/// `has_reason("rateLimitExceeded")`.
pub fn rate_limit_exceeded() -> HasReason {
    has_reason(RATE_LIMIT_EXCEEDED)
}

/// `has_reason("resourceInUse")`.
pub fn resource_in_use() -> HasReason {
    has_reason(RESOURCE_IN_USE)
}

/// Matches gRPC failures with the given status.
pub fn code_is(code: Code) -> Code {
    code
}

/// The service is temporarily unreachable (gRPC `UNAVAILABLE`).
pub fn unavailable() -> Code {
    Code::Unavailable
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::PredicateExt;
    use crate::service::ErrorKind;

    fn throttled() -> ServiceError {
        ServiceError::http(403, "Exceeded rate limits")
            .with_detail(RATE_LIMIT_EXCEEDED, "too many table update operations")
    }

    #[test]
    fn test_reason_predicates() {
        assert!(rate_limit_exceeded().check(&throttled()));
        assert!(!resource_in_use().check(&throttled()));
        assert_eq!(resource_in_use().reason(), "resourceInUse");
    }

    #[test]
    fn test_reason_composes_with_kind() {
        let retryable = ErrorKind::Forbidden.and(rate_limit_exceeded());
        assert!(retryable.check(&throttled()));

        let denied = ServiceError::http(403, "denied").with_detail("accessDenied", "");
        assert!(!retryable.check(&denied));

        let bad_request =
            ServiceError::http(400, "limit").with_detail(RATE_LIMIT_EXCEEDED, "");
        assert!(!retryable.check(&bad_request));
    }

    #[test]
    fn test_code_predicates() {
        let err = ServiceError::rpc(Code::Unavailable, "connection reset");
        assert!(unavailable().check(&err));
        assert!(!code_is(Code::Aborted).check(&err));
        assert!(code_is(Code::Aborted).or(unavailable()).check(&err));
    }
}
