//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the benefits endpoints, the health probes, the
//! `BenefitResponse` schema, and the shared `ErrorBody` envelope. Swagger UI
//! serves it under `/api/docs` in debug builds, and `openapi-dump` prints it
//! for external tooling.

use utoipa::OpenApi;

use crate::inbound::http::benefits::BenefitResponse;
use crate::inbound::http::error::ErrorBody;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Benefits catalogue API",
        description = "Read-only proxy over the upstream benefits catalogue, plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::benefits::list_benefits,
        crate::inbound::http::benefits::get_benefit,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(BenefitResponse, ErrorBody)),
    tags(
        (name = "beneficios", description = "Benefits catalogue"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
