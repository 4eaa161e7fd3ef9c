//! Domain primitives, errors, ports, and services for the benefits catalogue.
//!
//! Purpose: hold the transport-agnostic core. Nothing in this module knows
//! about HTTP frameworks or HTTP clients; adapters reach it through the
//! traits in [`ports`].
//!
//! Public surface:
//! - `Benefit`: validated catalogue entry with defaults applied.
//! - `Error` / `ErrorCode`: failure taxonomy translated by inbound adapters.
//! - `BenefitsService`: implements the `BenefitsQuery` driving port.
//! - `TraceId`: request-scoped correlation identifier.

pub mod benefit;
pub mod benefits_service;
pub mod error;
pub mod ports;
pub mod trace_id;

pub use self::benefit::{Benefit, BenefitId, BenefitValidationError, UNCATEGORISED};
pub use self::benefits_service::BenefitsService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::TraceId;

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";
