//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod benefits_query;
mod benefits_repository;
mod upstream_gateway;

#[cfg(test)]
pub use benefits_query::MockBenefitsQuery;
pub use benefits_query::{BenefitsQuery, FixtureBenefitsQuery};
#[cfg(test)]
pub use benefits_repository::MockBenefitsRepository;
pub use benefits_repository::{
    BenefitsRepository, BenefitsRepositoryError, FixtureBenefitsRepository,
};
#[cfg(test)]
pub use upstream_gateway::MockUpstreamGateway;
pub use upstream_gateway::{FixtureUpstreamGateway, UpstreamGateway, UpstreamGatewayError};
