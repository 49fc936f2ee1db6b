use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use cprof_core::Platform;
use cprof_resolver::ResolveError;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

/// `GET /api/v1/profiles/{platform}/{handle}`
///
/// Always answers `200` with a profile (real or synthetic) unless an upstream
/// reports the account missing (`404`) or the input is unusable (`400`).
pub(super) async fn get_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((platform, handle)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let platform: Platform = platform
        .parse()
        .map_err(|e: cprof_core::CoreError| {
            ApiError::new(req_id.0.clone(), "bad_request", e.to_string())
        })?;

    match state.resolver.resolve_profile(platform, &handle).await {
        Ok(profile) => Ok(Json(ApiResponse {
            data: profile,
            meta: ResponseMeta::new(req_id.0),
        })),
        Err(ResolveError::NotFound { .. }) => Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no {platform} profile for '{handle}'"),
        )),
        Err(e @ ResolveError::InvalidHandle(_)) => {
            Err(ApiError::new(req_id.0, "bad_request", e.to_string()))
        }
    }
}
