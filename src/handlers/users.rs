use crate::core::error::{ApiError, RegistryError};
use crate::core::state::AppState;
use crate::models::api::{
    ActivationQuery, ActiveResponse, AddressQuery, RegisterQuery, RoleResponse, SetRoleQuery,
    SuccessResponse, UserInfoResponse, VerifyQuery, VerifyResponse,
};
use crate::models::user::UserProfile;
use crate::utils::auth::verify_api_key;
use crate::utils::time::current_timestamp;
use crate::validation::params::{parse_address, parse_role, parse_token, resolve_timestamp};
use axum::{
    extract::{ConnectInfo, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, warn};

pub(crate) fn require_api_key(state: &AppState, provided: &str, action: &str) -> Result<(), ApiError> {
    if verify_api_key(provided, &state.config.security.api_key) {
        Ok(())
    } else {
        warn!(action = action, "Request with invalid API key");
        state.metrics.increment_rejected();
        Err(ApiError::InvalidApiKey)
    }
}

/// Counts registry rejections before handing the error back
pub(crate) fn rejected(state: &AppState, action: &str, err: RegistryError) -> ApiError {
    if err.is_permission_error() {
        warn!(action = action, error = %err, "Registry call refused");
    } else {
        debug!(action = action, error = %err, "Registry call failed");
    }
    state.metrics.increment_rejected();
    ApiError::Registry(err)
}

pub(crate) fn success(message: &str) -> Response {
    (
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// Register a new user
///
/// POST /user/register?api_key=<key>&caller=<addr>&address=<addr>&role=<role>&biometric=<hex>&...
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RegisterQuery>,
) -> Result<Response, ApiError> {
    require_api_key(&state, &params.api_key, "register")?;

    let caller = parse_address("caller", &params.caller)?;
    let profile = UserProfile {
        address: parse_address("address", &params.address)?,
        name: params.name,
        role: parse_role(&params.role)?,
        biometric_reference: parse_token(&params.biometric)?,
        department: params.department,
        employee_id: params.employee_id,
    };
    let timestamp = resolve_timestamp(params.ts);

    state
        .lock_registry()?
        .register_user(caller, profile, timestamp)
        .map_err(|e| rejected(&state, "register", e))?;

    state.metrics.increment_registrations();

    Ok(success("User registered successfully"))
}

/// GET /user/role?address=<addr>
pub async fn role_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AddressQuery>,
) -> Result<Response, ApiError> {
    let address = parse_address("address", &params.address)?;
    let role = state.lock_registry()?.get_user_role(address)?;

    Ok((
        StatusCode::OK,
        Json(RoleResponse {
            success: true,
            address: address.to_string(),
            role: role.to_string(),
            role_code: role.code(),
        }),
    )
        .into_response())
}

/// GET /user/active?address=<addr>
pub async fn active_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AddressQuery>,
) -> Result<Response, ApiError> {
    let address = parse_address("address", &params.address)?;
    let active = state.lock_registry()?.is_user_active(address)?;

    Ok((
        StatusCode::OK,
        Json(ActiveResponse {
            success: true,
            address: address.to_string(),
            active,
        }),
    )
        .into_response())
}

/// GET /user/info?address=<addr>
pub async fn info_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AddressQuery>,
) -> Result<Response, ApiError> {
    let address = parse_address("address", &params.address)?;
    let user = state.lock_registry()?.get_user(address)?;

    Ok((StatusCode::OK, Json(UserInfoResponse { success: true, user })).into_response())
}

/// Check a presented biometric token
///
/// POST /user/verify?address=<addr>&biometric=<hex>&ts=<ts>
///
/// Rate limited per client IP and target address. A mismatch is a
/// successful call with `matched: false`; alerts ride along in the body.
pub async fn verify_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(client): ConnectInfo<SocketAddr>,
    Query(params): Query<VerifyQuery>,
) -> Result<Response, ApiError> {
    let address = parse_address("address", &params.address)?;

    if !state
        .verify_limiter
        .try_acquire(client.ip(), address, current_timestamp())
    {
        warn!(ip = %client.ip(), address = %address, "Verification rate limit exceeded");
        state.metrics.increment_rejected();
        return Err(ApiError::RateLimitExceeded);
    }

    let token = parse_token(&params.biometric)?;
    let timestamp = resolve_timestamp(params.ts);

    let outcome = state
        .lock_registry()?
        .verify_biometric(address, &token, timestamp)
        .map_err(|e| rejected(&state, "verify", e))?;

    state
        .metrics
        .record_verification(outcome.matched, outcome.alert.is_some());

    Ok((
        StatusCode::OK,
        Json(VerifyResponse {
            success: true,
            matched: outcome.matched,
            failed_attempts: outcome.failed_attempts,
            alert: outcome.alert.is_some(),
            locked_out: outcome.alert.map(|a| a.locked_out).unwrap_or(false),
        }),
    )
        .into_response())
}

/// POST /user/deactivate?api_key=<key>&caller=<addr>&address=<addr>&ts=<ts>
pub async fn deactivate_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivationQuery>,
) -> Result<Response, ApiError> {
    require_api_key(&state, &params.api_key, "deactivate")?;

    let caller = parse_address("caller", &params.caller)?;
    let address = parse_address("address", &params.address)?;
    let timestamp = resolve_timestamp(params.ts);

    state
        .lock_registry()?
        .deactivate_user(caller, address, timestamp)
        .map_err(|e| rejected(&state, "deactivate", e))?;

    Ok(success("User deactivated"))
}

/// POST /user/reactivate?api_key=<key>&caller=<addr>&address=<addr>&ts=<ts>
pub async fn reactivate_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivationQuery>,
) -> Result<Response, ApiError> {
    require_api_key(&state, &params.api_key, "reactivate")?;

    let caller = parse_address("caller", &params.caller)?;
    let address = parse_address("address", &params.address)?;
    let timestamp = resolve_timestamp(params.ts);

    state
        .lock_registry()?
        .reactivate_user(caller, address, timestamp)
        .map_err(|e| rejected(&state, "reactivate", e))?;

    Ok(success("User reactivated"))
}

/// POST /user/role/set?api_key=<key>&caller=<addr>&address=<addr>&role=<role>&ts=<ts>
pub async fn set_role_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SetRoleQuery>,
) -> Result<Response, ApiError> {
    require_api_key(&state, &params.api_key, "set_role")?;

    let caller = parse_address("caller", &params.caller)?;
    let address = parse_address("address", &params.address)?;
    let role = parse_role(&params.role)?;
    let timestamp = resolve_timestamp(params.ts);

    state
        .lock_registry()?
        .set_user_role(caller, address, role, timestamp)
        .map_err(|e| rejected(&state, "set_role", e))?;

    Ok(success("User role updated"))
}
