use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::models::api::{AlertListResponse, ApiKeyQuery};
use crate::utils::auth::verify_api_key;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::warn;

/// List recent threshold alerts, oldest first
///
/// GET /alerts?api_key=<key>
pub async fn alerts_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ApiKeyQuery>,
) -> Result<Response, ApiError> {
    if !verify_api_key(&params.api_key, &state.config.security.api_key) {
        warn!("Unauthorized alert list attempt");
        return Err(ApiError::InvalidApiKey);
    }

    Ok((
        StatusCode::OK,
        Json(AlertListResponse {
            success: true,
            total: state.alert_log.total(),
            alerts: state.alert_log.recent(),
        }),
    )
        .into_response())
}
