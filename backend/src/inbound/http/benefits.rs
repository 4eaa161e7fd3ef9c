//! Benefits catalogue read endpoints.
//!
//! ```text
//! GET /api/beneficios
//! GET /api/beneficios/{id}
//! ```

use actix_web::{HttpRequest, HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::domain::{Benefit, Error, ErrorCode};
use crate::inbound::http::error::{ApiError, ErrorBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Benefit as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BenefitResponse {
    /// Catalogue identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Merchant offering the benefit.
    #[schema(example = "WALMART")]
    pub comercio: String,
    /// Short description.
    #[schema(example = "10% off")]
    pub descripcion: String,
    /// Free-text clarification, empty when unknown.
    pub aclaracion: String,
    /// Card payments qualify.
    pub tarjeta: bool,
    /// Cash payments qualify.
    pub efectivo: bool,
    /// Expiration timestamp as supplied upstream, empty when unknown.
    #[schema(example = "2026-12-31T23:59:59.000Z")]
    pub vencimiento: String,
    /// Category label.
    #[schema(example = "Sin categoría")]
    pub categoria: String,
    /// Image URL, empty when unknown.
    pub imagen_url: String,
}

impl From<&Benefit> for BenefitResponse {
    fn from(benefit: &Benefit) -> Self {
        Self {
            id: benefit.id().get(),
            comercio: benefit.merchant().to_owned(),
            descripcion: benefit.description().to_owned(),
            aclaracion: benefit.clarification().to_owned(),
            tarjeta: benefit.accepts_card(),
            efectivo: benefit.accepts_cash(),
            vencimiento: benefit.expiration().to_owned(),
            categoria: benefit.category().to_owned(),
            imagen_url: benefit.image_url().to_owned(),
        }
    }
}

fn reject(state: &HttpState, request: &HttpRequest, failure: Error) -> ApiError {
    let path = request.path();
    match failure.code() {
        ErrorCode::NotFound => {
            warn!(code = %failure.code(), path, message = failure.message(), "benefits request failed");
        }
        _ => {
            error!(code = %failure.code(), path, message = failure.message(), "benefits request failed");
        }
    }
    ApiError::new(failure, path, state.clock.utc())
}

/// List every valid benefit in the catalogue.
#[utoipa::path(
    get,
    path = "/api/beneficios",
    description = "Return all benefits currently offered by the upstream catalogue. Malformed upstream records are omitted.",
    responses(
        (status = 200, description = "Benefits", body = [BenefitResponse]),
        (status = 422, description = "Upstream payload is not a list", body = ErrorBody),
        (status = 502, description = "Upstream catalogue unavailable", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["beneficios"],
    operation_id = "listBenefits"
)]
#[get("/beneficios")]
pub async fn list_benefits(
    state: web::Data<HttpState>,
    request: HttpRequest,
) -> ApiResult<HttpResponse> {
    info!(path = request.path(), "benefits list requested");
    let benefits = state
        .benefits
        .list_benefits()
        .await
        .map_err(|failure| reject(&state, &request, failure))?;
    info!(count = benefits.len(), "benefits list served");

    let body: Vec<BenefitResponse> = benefits.iter().map(BenefitResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Fetch one benefit by identifier.
#[utoipa::path(
    get,
    path = "/api/beneficios/{id}",
    description = "Return a single benefit. Upstream records missing required fields are reported as not found.",
    params(("id" = String, Path, description = "Benefit identifier", example = "1")),
    responses(
        (status = 200, description = "Benefit", body = BenefitResponse),
        (status = 404, description = "Benefit not found", body = ErrorBody),
        (status = 502, description = "Upstream catalogue unavailable", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["beneficios"],
    operation_id = "getBenefit"
)]
#[get("/beneficios/{id}")]
pub async fn get_benefit(
    state: web::Data<HttpState>,
    request: HttpRequest,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = id.into_inner();
    info!(path = request.path(), id = id.as_str(), "benefit requested");
    let benefit = state
        .benefits
        .get_benefit(&id)
        .await
        .map_err(|failure| reject(&state, &request, failure))?;
    info!(id = id.as_str(), "benefit served");

    Ok(HttpResponse::Ok().json(BenefitResponse::from(&benefit)))
}

#[cfg(test)]
#[path = "benefits_tests.rs"]
mod tests;
