//! Driving port for benefit read use-cases.
//!
//! HTTP handlers depend on this trait only, keeping them free of outbound
//! concerns.

use async_trait::async_trait;

use crate::domain::{Benefit, Error};

/// Domain use-case port for reading the catalogue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BenefitsQuery: Send + Sync {
    /// List every valid benefit.
    async fn list_benefits(&self) -> Result<Vec<Benefit>, Error>;

    /// Fetch one benefit, failing with a not-found error when absent.
    async fn get_benefit(&self, id: &str) -> Result<Benefit, Error>;
}

/// Fixture query over an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBenefitsQuery;

#[async_trait]
impl BenefitsQuery for FixtureBenefitsQuery {
    async fn list_benefits(&self) -> Result<Vec<Benefit>, Error> {
        Ok(Vec::new())
    }

    async fn get_benefit(&self, id: &str) -> Result<Benefit, Error> {
        Err(Error::benefit_not_found(id))
    }
}
