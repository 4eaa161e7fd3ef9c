//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while giving every
//! handler the same JSON error envelope and status mapping. The envelope
//! carries the request path, so handlers wrap domain errors in [`ApiError`]
//! at the point where the request is known.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Message sent instead of the real one for unclassified failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// JSON error envelope returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// HTTP status code, repeated in the body.
    #[schema(example = 404)]
    pub status_code: u16,
    /// Human-readable failure description.
    #[schema(example = "Benefit with ID 999 not found")]
    pub message: String,
    /// RFC 3339 UTC timestamp with millisecond precision.
    #[schema(example = "2026-01-15T12:00:00.000Z")]
    pub timestamp: String,
    /// Path of the failing request.
    #[schema(example = "/api/beneficios/999")]
    pub path: String,
}

/// Domain error bound to the request that produced it.
#[derive(Debug, Clone)]
pub struct ApiError {
    error: Error,
    path: String,
    timestamp: DateTime<Utc>,
}

impl ApiError {
    /// Bind `error` to the request `path`, stamped at `timestamp`.
    pub fn new(error: Error, path: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            error,
            path: path.into(),
            timestamp,
        }
    }

    /// The wrapped domain error.
    #[must_use]
    pub const fn error(&self) -> &Error {
        &self.error
    }

    /// Envelope sent to the client. Internal errors are redacted.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        let message = if matches!(self.error.code(), ErrorCode::InternalError) {
            INTERNAL_ERROR_MESSAGE.to_owned()
        } else {
            self.error.message().to_owned()
        };
        ErrorBody {
            status_code: self.status_code().as_u16(),
            message,
            timestamp: self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            path: self.path.clone(),
        }
    }
}

const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::DataValidation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::ExternalApi => StatusCode::BAD_GATEWAY,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.error, self.path)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        status_for(self.error.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.error.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(self.body())
    }
}
