//! Wiring of the outbound adapters into handler state.

use std::sync::Arc;
use std::time::Duration;

use mockable::DefaultClock;
use url::Url;

use crate::domain::BenefitsService;
use crate::inbound::http::state::HttpState;
use crate::outbound::upstream::{HttpUpstreamGateway, UpstreamBenefitsRepository};

/// Build handler state backed by the upstream catalogue at `upstream_url`.
///
/// Wires gateway → repository → service and pairs the service with the
/// system clock.
///
/// # Errors
/// Returns [`reqwest::Error`] when the HTTP client cannot be constructed.
pub fn build_http_state(upstream_url: Url, timeout: Duration) -> Result<HttpState, reqwest::Error> {
    let gateway = Arc::new(HttpUpstreamGateway::new(upstream_url, timeout)?);
    let repository = Arc::new(UpstreamBenefitsRepository::new(gateway));
    let service = BenefitsService::new(repository);
    Ok(HttpState::new(Arc::new(service), Arc::new(DefaultClock)))
}
