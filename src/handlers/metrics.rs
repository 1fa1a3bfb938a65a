// Metrics endpoint

use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::api::ApiKeyQuery;
use crate::utils::auth::verify_api_key;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::warn;

/// Returns JSON with registry statistics including:
/// - Registrations, verifications, match/mismatch counts, match rate
/// - Alerts raised and rejected calls
/// - Registered and active users
/// - Uptime and verifications per second
///
/// Requires valid API key for authentication.
pub async fn metrics_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ApiKeyQuery>,
) -> Result<Response, ApiError> {
    if !verify_api_key(&params.api_key, &state.config.security.api_key) {
        warn!("Unauthorized metrics access attempt");
        return Err(ApiError::InvalidApiKey);
    }

    let registry = state.lock_registry()?;
    let snapshot = state.metrics.get_snapshot(&registry);

    Ok((StatusCode::OK, Json(snapshot)).into_response())
}
