//! Upstream catalogue outbound adapters.
//!
//! `HttpUpstreamGateway` implements the `UpstreamGateway` port with reqwest;
//! `UpstreamBenefitsRepository` implements `BenefitsRepository` on top of any
//! gateway.

mod benefits_repository;
mod dto;
mod http_gateway;

pub use benefits_repository::UpstreamBenefitsRepository;
pub use http_gateway::HttpUpstreamGateway;
