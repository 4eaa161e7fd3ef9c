//! Fallback for requests that match no route.
//!
//! Unmatched requests get the same JSON error envelope as handler failures
//! instead of the framework's empty 404.

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::warn;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::state::HttpState;

/// Answer an unmatched request with a 404 envelope naming the method and path.
pub async fn route_not_found(
    state: web::Data<HttpState>,
    request: HttpRequest,
) -> ApiResult<HttpResponse> {
    let path = request.path();
    let method = request.method();
    warn!(%method, path, "no route matched");
    let error = Error::new(ErrorCode::NotFound, format!("Cannot {method} {path}"));
    Err(ApiError::new(error, path, state.clock.utc()))
}
