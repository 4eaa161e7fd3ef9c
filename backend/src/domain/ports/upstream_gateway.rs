//! Driven port for reading the upstream benefits catalogue over HTTP.
//!
//! The gateway performs one attempt per call and returns the decoded JSON
//! body without interpreting it. Shape validation belongs to the repository.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

define_port_error! {
    /// Transport failures surfaced by the upstream gateway.
    ///
    /// Variants are listed in classification priority: a request that timed
    /// out is reported as [`Self::Timeout`] even when a partial response
    /// exists.
    pub enum UpstreamGatewayError {
        /// The client-side deadline elapsed.
        Timeout { message: String } =>
            "timeout: {message}",
        /// The upstream answered with a non-2xx status.
        Status { status: u16, message: String } =>
            "upstream status {status}: {message}",
        /// The request was sent but no response arrived.
        NoResponse { message: String } =>
            "no response: {message}",
        /// Request construction or decoding failed.
        Unexpected { message: String } =>
            "unexpected: {message}",
    }
}

impl UpstreamGatewayError {
    /// Whether the upstream reported the requested resource as absent.
    ///
    /// # Examples
    /// ```
    /// use benefits_backend::domain::ports::UpstreamGatewayError;
    ///
    /// assert!(UpstreamGatewayError::status(404_u16, "Not Found").is_not_found());
    /// assert!(!UpstreamGatewayError::status(500_u16, "Internal Server Error").is_not_found());
    /// assert!(!UpstreamGatewayError::no_response("404 in the message").is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Short failure class used in log fields.
    #[must_use]
    pub const fn failure_class(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Status { .. } => "upstream status",
            Self::NoResponse { .. } => "no response",
            Self::Unexpected { .. } => "unexpected",
        }
    }

    /// Message safe to show API consumers.
    ///
    /// Names the failure class and, for status failures, the upstream code.
    /// Upstream bodies and transport details stay in the logs.
    ///
    /// # Examples
    /// ```
    /// use benefits_backend::domain::ports::UpstreamGatewayError;
    ///
    /// let error = UpstreamGatewayError::status(503_u16, "Service Unavailable: db down");
    /// assert_eq!(error.client_message(), "Upstream catalogue responded with status 503");
    /// ```
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Timeout { .. } => "Upstream catalogue timed out".to_owned(),
            Self::Status { status, .. } => {
                format!("Upstream catalogue responded with status {status}")
            }
            Self::NoResponse { .. } => "Upstream catalogue did not respond".to_owned(),
            Self::Unexpected { .. } => {
                "Upstream catalogue returned an unexpected response".to_owned()
            }
        }
    }
}

/// Port for fetching JSON documents from the upstream catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamGateway: Send + Sync {
    /// Fetch the document at `path`, relative to the configured base URL.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use benefits_backend::domain::ports::{FixtureUpstreamGateway, UpstreamGateway};
    ///
    /// let gateway = FixtureUpstreamGateway;
    /// let body = gateway.fetch("beneficios").await?;
    /// assert!(body.as_array().is_some_and(Vec::is_empty));
    /// # Ok::<(), benefits_backend::domain::ports::UpstreamGatewayError>(())
    /// ```
    async fn fetch(&self, path: &str) -> Result<Value, UpstreamGatewayError>;
}

/// Fixture gateway serving an empty catalogue.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureUpstreamGateway;

#[async_trait]
impl UpstreamGateway for FixtureUpstreamGateway {
    async fn fetch(&self, _path: &str) -> Result<Value, UpstreamGatewayError> {
        Ok(Value::Array(Vec::new()))
    }
}
