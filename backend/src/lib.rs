//! Benefits catalogue backend.
//!
//! A read-only proxy over the upstream benefits API, arranged as a hexagon:
//! `domain` owns the entity, errors and ports; `outbound` talks to the
//! upstream catalogue; `inbound` exposes the REST surface; `server` wires
//! the layers together at process start.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
