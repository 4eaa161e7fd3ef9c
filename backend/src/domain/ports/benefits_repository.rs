//! Driven port for reading validated benefits.
//!
//! Implementations drop malformed records from listings and report a missing
//! single record as `None`. They never raise a not-found error themselves.

use async_trait::async_trait;

use super::{UpstreamGatewayError, define_port_error};
use crate::domain::Benefit;

define_port_error! {
    /// Errors raised while reading benefits.
    pub enum BenefitsRepositoryError {
        /// The gateway failed; the cause is kept unchanged.
        Upstream { cause: UpstreamGatewayError } =>
            "upstream request failed: {cause}",
        /// The collection payload was not a JSON array.
        InvalidPayload { message: String } =>
            "invalid upstream payload: {message}",
    }
}

impl From<UpstreamGatewayError> for BenefitsRepositoryError {
    fn from(cause: UpstreamGatewayError) -> Self {
        Self::Upstream { cause }
    }
}

/// Port for listing and fetching benefits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BenefitsRepository: Send + Sync {
    /// Return every valid benefit, in upstream order.
    async fn list_all(&self) -> Result<Vec<Benefit>, BenefitsRepositoryError>;

    /// Return the benefit with `id`, or `None` when it is absent or malformed.
    async fn find_by_id(&self, id: &str) -> Result<Option<Benefit>, BenefitsRepositoryError>;
}

/// Fixture repository with an empty catalogue.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureBenefitsRepository;

#[async_trait]
impl BenefitsRepository for FixtureBenefitsRepository {
    async fn list_all(&self) -> Result<Vec<Benefit>, BenefitsRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<Benefit>, BenefitsRepositoryError> {
        Ok(None)
    }
}
