//! Benefits application service.
//!
//! Implements the [`BenefitsQuery`] driving port on top of a
//! [`BenefitsRepository`]. This is the one place where an absent single
//! benefit becomes a not-found error.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{BenefitsQuery, BenefitsRepository, BenefitsRepositoryError};
use crate::domain::{Benefit, Error};

/// Benefits service implementing the driving port.
#[derive(Clone)]
pub struct BenefitsService<R> {
    repository: Arc<R>,
}

impl<R> BenefitsService<R> {
    /// Create a new service over the given repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> BenefitsService<R>
where
    R: BenefitsRepository,
{
    fn map_repository_error(error: BenefitsRepositoryError) -> Error {
        match error {
            BenefitsRepositoryError::Upstream { cause } => {
                Error::external_api(cause.client_message())
            }
            BenefitsRepositoryError::InvalidPayload { message } => Error::data_validation(message),
        }
    }
}

#[async_trait]
impl<R> BenefitsQuery for BenefitsService<R>
where
    R: BenefitsRepository,
{
    async fn list_benefits(&self) -> Result<Vec<Benefit>, Error> {
        self.repository
            .list_all()
            .await
            .map_err(Self::map_repository_error)
    }

    async fn get_benefit(&self, id: &str) -> Result<Benefit, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::benefit_not_found(id))
    }
}

#[cfg(test)]
#[path = "benefits_service_tests.rs"]
mod tests;
