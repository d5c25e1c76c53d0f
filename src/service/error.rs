//! Structured failures reported by cloud service clients.
//!
//! REST APIs answer with an HTTP status plus a list of `{reason, message}`
//! entries; gRPC APIs answer with a status code. Retry classifiers inspect
//! exactly these fields, so both are kept as plain, inspectable data.

use std::fmt;

use crate::predicate::Predicate;

/// The class of an HTTP failure, derived from its status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403. Some services report rate limiting this way instead of 429.
    Forbidden,
    /// 404
    NotFound,
    /// 405
    MethodNotAllowed,
    /// 409
    Conflict,
    /// 412
    PreconditionFailed,
    /// 429
    TooManyRequests,
    /// 500
    InternalServerError,
    /// 501
    NotImplemented,
    /// 502
    BadGateway,
    /// 503
    ServiceUnavailable,
    /// Any other status.
    Other,
}

impl ErrorKind {
    /// Classify an HTTP status code.
    ///
    /// ```rust
    /// use steadfast::service::ErrorKind;
    ///
    /// assert_eq!(ErrorKind::from_status(403), ErrorKind::Forbidden);
    /// assert_eq!(ErrorKind::from_status(418), ErrorKind::Other);
    /// ```
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            409 => Self::Conflict,
            412 => Self::PreconditionFailed,
            429 => Self::TooManyRequests,
            500 => Self::InternalServerError,
            501 => Self::NotImplemented,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            _ => Self::Other,
        }
    }

    /// Human readable reason phrase.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::Conflict => "Conflict",
            Self::PreconditionFailed => "Precondition Failed",
            Self::TooManyRequests => "Too Many Requests",
            Self::InternalServerError => "Internal Server Error",
            Self::NotImplemented => "Not Implemented",
            Self::BadGateway => "Bad Gateway",
            Self::ServiceUnavailable => "Service Unavailable",
            Self::Other => "Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An `ErrorKind` is the allow-list for a single class of HTTP failure.
impl Predicate<ServiceError> for ErrorKind {
    fn check(&self, error: &ServiceError) -> bool {
        error.kind() == Some(*self)
    }
}

/// gRPC status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Code {
    /// Not an error.
    Ok = 0,
    /// The operation was cancelled.
    Cancelled = 1,
    /// Unknown error.
    #[default]
    Unknown = 2,
    /// The client specified an invalid argument.
    InvalidArgument = 3,
    /// The deadline expired before the operation could complete.
    DeadlineExceeded = 4,
    /// Some requested entity was not found.
    NotFound = 5,
    /// The entity a client attempted to create already exists.
    AlreadyExists = 6,
    /// The caller lacks permission.
    PermissionDenied = 7,
    /// Some resource has been exhausted, e.g. a quota.
    ResourceExhausted = 8,
    /// The system is not in a state required for the operation.
    FailedPrecondition = 9,
    /// The operation was aborted, typically due to a concurrency issue.
    Aborted = 10,
    /// The operation was attempted past the valid range.
    OutOfRange = 11,
    /// The operation is not implemented.
    Unimplemented = 12,
    /// Internal error.
    Internal = 13,
    /// The service is currently unavailable. Usually transient.
    Unavailable = 14,
    /// Unrecoverable data loss or corruption.
    DataLoss = 15,
    /// Missing or invalid authentication credentials.
    Unauthenticated = 16,
}

impl Code {
    /// The canonical upper-case name, e.g. `UNAVAILABLE`.
    pub fn name(&self) -> &'static str {
        match self {
            Code::Ok => "OK",
            Code::Cancelled => "CANCELLED",
            Code::Unknown => "UNKNOWN",
            Code::InvalidArgument => "INVALID_ARGUMENT",
            Code::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Code::NotFound => "NOT_FOUND",
            Code::AlreadyExists => "ALREADY_EXISTS",
            Code::PermissionDenied => "PERMISSION_DENIED",
            Code::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Code::FailedPrecondition => "FAILED_PRECONDITION",
            Code::Aborted => "ABORTED",
            Code::OutOfRange => "OUT_OF_RANGE",
            Code::Unimplemented => "UNIMPLEMENTED",
            Code::Internal => "INTERNAL",
            Code::Unavailable => "UNAVAILABLE",
            Code::DataLoss => "DATA_LOSS",
            Code::Unauthenticated => "UNAUTHENTICATED",
        }
    }
}

impl From<i32> for Code {
    fn from(value: i32) -> Self {
        match value {
            0 => Code::Ok,
            1 => Code::Cancelled,
            3 => Code::InvalidArgument,
            4 => Code::DeadlineExceeded,
            5 => Code::NotFound,
            6 => Code::AlreadyExists,
            7 => Code::PermissionDenied,
            8 => Code::ResourceExhausted,
            9 => Code::FailedPrecondition,
            10 => Code::Aborted,
            11 => Code::OutOfRange,
            12 => Code::Unimplemented,
            13 => Code::Internal,
            14 => Code::Unavailable,
            15 => Code::DataLoss,
            16 => Code::Unauthenticated,
            _ => Code::Unknown,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A `Code` is the allow-list for a single gRPC status.
impl Predicate<ServiceError> for Code {
    fn check(&self, error: &ServiceError) -> bool {
        error.code() == Some(*self)
    }
}

/// One entry of the `errors` list in a REST error payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    /// Machine readable reason, e.g. `rateLimitExceeded`.
    pub reason: String,
    /// Human readable explanation.
    pub message: String,
}

/// A failure reported by a cloud service.
///
/// # Examples
///
/// ```rust
/// use steadfast::service::{ErrorKind, ServiceError};
///
/// let err = ServiceError::http(403, "quota")
///     .with_detail("rateLimitExceeded", "Exceeded rate limits");
///
/// assert_eq!(err.kind(), Some(ErrorKind::Forbidden));
/// assert!(err.has_reason("rateLimitExceeded"));
/// assert_eq!(err.to_string(), "403 Forbidden: quota");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// A REST call answered with a non-success HTTP status.
    #[error("{status} {kind}: {message}")]
    Http {
        /// Class of the status code.
        kind: ErrorKind,
        /// Raw status code.
        status: u16,
        /// Top-level message.
        message: String,
        /// Per-error details, each with a reason code.
        errors: Vec<ErrorDetail>,
    },
    /// A gRPC call finished with a non-OK status.
    #[error("rpc error {code}: {message}")]
    Rpc {
        /// The gRPC status.
        code: Code,
        /// Status message.
        message: String,
    },
}

impl ServiceError {
    /// An HTTP failure with no details yet.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            kind: ErrorKind::from_status(status),
            status,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// A gRPC failure.
    pub fn rpc(code: Code, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }

    /// Append a `{reason, message}` entry. No-op for gRPC failures, which
    /// carry no such list.
    pub fn with_detail(mut self, reason: impl Into<String>, message: impl Into<String>) -> Self {
        if let Self::Http { errors, .. } = &mut self {
            errors.push(ErrorDetail {
                reason: reason.into(),
                message: message.into(),
            });
        }
        self
    }

    /// The HTTP class, if this is an HTTP failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Http { kind, .. } => Some(*kind),
            Self::Rpc { .. } => None,
        }
    }

    /// The gRPC status, if this is a gRPC failure.
    pub fn code(&self) -> Option<Code> {
        match self {
            Self::Rpc { code, .. } => Some(*code),
            Self::Http { .. } => None,
        }
    }

    /// The detail entries (empty for gRPC failures).
    pub fn errors(&self) -> &[ErrorDetail] {
        match self {
            Self::Http { errors, .. } => errors,
            Self::Rpc { .. } => &[],
        }
    }

    /// Top-level message.
    pub fn message(&self) -> &str {
        match self {
            Self::Http { message, .. } | Self::Rpc { message, .. } => message,
        }
    }

    /// True if any detail entry carries `reason`.
    pub fn has_reason(&self, reason: &str) -> bool {
        self.errors().iter().any(|detail| detail.reason == reason)
    }
}
