//! Domain-level error types.
//!
//! These errors are transport agnostic. The inbound HTTP adapter is the only
//! place that turns an [`ErrorCode`] into a status code and a response body.

use std::fmt;

use thiserror::Error;

use super::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The requested benefit does not exist upstream.
    NotFound,
    /// The upstream collection payload had the wrong shape.
    DataValidation,
    /// The upstream catalogue could not be reached or answered with an error.
    ExternalApi,
    /// An unexpected error occurred inside the service.
    InternalError,
}

impl ErrorCode {
    /// Snake-case label used in structured logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::DataValidation => "data_validation",
            Self::ExternalApi => "external_api",
            Self::InternalError => "internal_error",
        }
    }

    const fn fallback_message(self) -> &'static str {
        match self {
            Self::NotFound => "Resource not found",
            Self::DataValidation => "Invalid data received from upstream",
            Self::ExternalApi => "Upstream catalogue request failed",
            Self::InternalError => "Internal server error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors emitted by the fallible constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorValidationError {
    /// The message was empty once trimmed.
    #[error("error message must not be empty")]
    EmptyMessage,
}

/// Domain error payload.
///
/// The trace identifier in scope at construction time is captured so the
/// inbound adapter can correlate the failure with request logs.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use benefits_backend::domain::{Error, ErrorCode};
///
/// let err = Error::benefit_not_found("999");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert!(err.message().contains("999"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
}

impl Error {
    /// Create a new error. Blank messages are replaced with a generic message
    /// for the code so the invariant always holds.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message)
            .unwrap_or_else(|_| Self::with_current_trace(code, code.fallback_message().to_owned()))
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self::with_current_trace(code, message))
    }

    fn with_current_trace(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Trace identifier captured when the error was raised, if any.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// The requested benefit does not exist.
    pub fn benefit_not_found(id: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("Benefit with ID {id} not found"))
    }

    /// Convenience constructor for [`ErrorCode::DataValidation`].
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DataValidation, message)
    }

    /// Convenience constructor for [`ErrorCode::ExternalApi`].
    pub fn external_api(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalApi, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
