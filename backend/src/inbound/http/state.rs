//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the driving port and a clock, and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::BenefitsQuery;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Read use-cases for the benefits catalogue.
    pub benefits: Arc<dyn BenefitsQuery>,
    /// Clock used to timestamp error envelopes.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Construct state from the benefits query port and a clock.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use benefits_backend::domain::ports::FixtureBenefitsQuery;
    /// use benefits_backend::inbound::http::state::HttpState;
    /// use mockable::DefaultClock;
    ///
    /// let state = HttpState::new(Arc::new(FixtureBenefitsQuery), Arc::new(DefaultClock));
    /// let _ = state.clock.utc();
    /// ```
    pub fn new(benefits: Arc<dyn BenefitsQuery>, clock: Arc<dyn Clock>) -> Self {
        Self { benefits, clock }
    }
}
