//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::web;

use crate::inbound::http::state::HttpState;

/// Everything [`super::create_server`] needs besides the health state.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors_origin: String,
    pub(crate) http_state: web::Data<HttpState>,
}

impl ServerConfig {
    /// Construct a server configuration around wired handler state.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, cors_origin: impl Into<String>, http_state: HttpState) -> Self {
        Self {
            bind_addr,
            cors_origin: cors_origin.into(),
            http_state: web::Data::new(http_state),
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the single origin allowed by CORS.
    #[must_use]
    pub fn cors_origin(&self) -> &str {
        &self.cors_origin
    }
}
