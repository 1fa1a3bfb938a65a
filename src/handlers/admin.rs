// Registry-wide admin endpoints: pause switch and ownership handover

use crate::core::error::ApiError;
use crate::core::state::AppState;
use crate::handlers::users::{rejected, require_api_key, success};
use crate::models::api::{
    CallerQuery, RegistryStatusResponse, TransferAcceptQuery, TransferProposeQuery, TransferResponse,
};
use crate::validation::params::{parse_address, resolve_timestamp};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

/// GET /admin/status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let registry = state.lock_registry()?;

    Ok((
        StatusCode::OK,
        Json(RegistryStatusResponse {
            success: true,
            owner: registry.owner(),
            paused: registry.is_paused(),
            pending_transfer: registry.pending_ownership_transfer(),
        }),
    )
        .into_response())
}

/// POST /admin/pause?api_key=<key>&caller=<addr>
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallerQuery>,
) -> Result<Response, ApiError> {
    require_api_key(&state, &params.api_key, "pause")?;
    let caller = parse_address("caller", &params.caller)?;

    state
        .lock_registry()?
        .pause(caller)
        .map_err(|e| rejected(&state, "pause", e))?;

    Ok(success("Registry paused"))
}

/// POST /admin/unpause?api_key=<key>&caller=<addr>
pub async fn unpause_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallerQuery>,
) -> Result<Response, ApiError> {
    require_api_key(&state, &params.api_key, "unpause")?;
    let caller = parse_address("caller", &params.caller)?;

    state
        .lock_registry()?
        .unpause(caller)
        .map_err(|e| rejected(&state, "unpause", e))?;

    Ok(success("Registry unpaused"))
}

/// POST /owner/transfer/propose?api_key=<key>&caller=<owner>&new_owner=<addr>&ts=<ts>
pub async fn propose_transfer_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransferProposeQuery>,
) -> Result<Response, ApiError> {
    require_api_key(&state, &params.api_key, "propose_transfer")?;

    let caller = parse_address("caller", &params.caller)?;
    let new_owner = parse_address("new_owner", &params.new_owner)?;
    let timestamp = resolve_timestamp(params.ts);

    let transfer = state
        .lock_registry()?
        .propose_ownership_transfer(caller, new_owner, timestamp)
        .map_err(|e| rejected(&state, "propose_transfer", e))?;

    Ok((StatusCode::OK, Json(TransferResponse { success: true, transfer })).into_response())
}

/// POST /owner/transfer/accept?api_key=<key>&caller=<proposed>&ts=<ts>
pub async fn accept_transfer_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransferAcceptQuery>,
) -> Result<Response, ApiError> {
    require_api_key(&state, &params.api_key, "accept_transfer")?;

    let caller = parse_address("caller", &params.caller)?;
    let timestamp = resolve_timestamp(params.ts);

    state
        .lock_registry()?
        .accept_ownership_transfer(caller, timestamp)
        .map_err(|e| rejected(&state, "accept_transfer", e))?;

    Ok(success("Ownership transferred"))
}

/// POST /owner/transfer/cancel?api_key=<key>&caller=<owner>
pub async fn cancel_transfer_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallerQuery>,
) -> Result<Response, ApiError> {
    require_api_key(&state, &params.api_key, "cancel_transfer")?;
    let caller = parse_address("caller", &params.caller)?;

    state
        .lock_registry()?
        .cancel_ownership_transfer(caller)
        .map_err(|e| rejected(&state, "cancel_transfer", e))?;

    Ok(success("Ownership transfer cancelled"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::test_support::{create_test_state, API_KEY, OWNER};
    use crate::models::address::Address;
    use crate::models::user::{BiometricToken, Role, UserProfile};
    use axum::body::Body;
    use http_body_util::BodyExt;

    const HEIR: &str = "0xde";

    fn caller_query(caller: &str) -> CallerQuery {
        CallerQuery {
            api_key: API_KEY.to_string(),
            caller: caller.to_string(),
        }
    }

    fn with_heir(state: &AppState) {
        state
            .lock_registry()
            .unwrap()
            .register_user(
                Address::from(12345),
                UserProfile {
                    address: Address::from(222),
                    name: "heir".to_string(),
                    role: Role::User,
                    biometric_reference: BiometricToken::from(9999),
                    department: String::new(),
                    employee_id: String::new(),
                },
                1000,
            )
            .unwrap();
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = Body::new(response.into_body()).collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_status_reports_owner() {
        let state = create_test_state();

        let body = body_json(status_handler(State(state)).await.unwrap()).await;
        assert_eq!(body["owner"], OWNER);
        assert_eq!(body["paused"], false);
        assert!(body["pending_transfer"].is_null());
    }

    #[tokio::test]
    async fn test_pause_and_unpause() {
        let state = create_test_state();

        let response = pause_handler(State(state.clone()), Query(caller_query(OWNER))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.lock_registry().unwrap().is_paused());

        unpause_handler(State(state.clone()), Query(caller_query(OWNER))).await.unwrap();
        assert!(!state.lock_registry().unwrap().is_paused());
    }

    #[tokio::test]
    async fn test_pause_requires_key_and_admin() {
        let state = create_test_state();

        let mut query = caller_query(OWNER);
        query.api_key = "wrong".to_string();
        let result = pause_handler(State(state.clone()), Query(query)).await;
        assert_eq!(result.unwrap_err().into_response().status(), StatusCode::UNAUTHORIZED);

        let result = pause_handler(State(state.clone()), Query(caller_query("0x999"))).await;
        assert_eq!(result.unwrap_err().into_response().status(), StatusCode::FORBIDDEN);
        assert!(!state.lock_registry().unwrap().is_paused());

        let registry = state.lock_registry().unwrap();
        assert_eq!(state.metrics.get_snapshot(&registry).rejected_calls, 2);
    }

    #[tokio::test]
    async fn test_transfer_propose_accept() {
        let state = create_test_state();
        with_heir(&state);

        let query = TransferProposeQuery {
            api_key: API_KEY.to_string(),
            caller: OWNER.to_string(),
            new_owner: HEIR.to_string(),
            ts: Some(1000),
        };
        let body = body_json(propose_transfer_handler(State(state.clone()), Query(query)).await.unwrap()).await;
        assert_eq!(body["transfer"]["proposed"], HEIR);
        assert_eq!(body["transfer"]["proposer"], OWNER);
        assert_eq!(body["transfer"]["expiry"], 1000 + 86_400);

        let body = body_json(status_handler(State(state.clone())).await.unwrap()).await;
        assert_eq!(body["pending_transfer"]["proposed"], HEIR);

        let query = TransferAcceptQuery {
            api_key: API_KEY.to_string(),
            caller: HEIR.to_string(),
            ts: Some(1001),
        };
        accept_transfer_handler(State(state.clone()), Query(query)).await.unwrap();

        let registry = state.lock_registry().unwrap();
        assert_eq!(registry.owner(), Address::from(222));
        assert_eq!(registry.get_user_role(Address::from(12345)), Ok(Role::User));
    }

    #[tokio::test]
    async fn test_transfer_accept_expired() {
        let state = create_test_state();
        with_heir(&state);

        let query = TransferProposeQuery {
            api_key: API_KEY.to_string(),
            caller: OWNER.to_string(),
            new_owner: HEIR.to_string(),
            ts: Some(1000),
        };
        propose_transfer_handler(State(state.clone()), Query(query)).await.unwrap();

        let query = TransferAcceptQuery {
            api_key: API_KEY.to_string(),
            caller: HEIR.to_string(),
            ts: Some(1000 + 86_401),
        };
        let result = accept_transfer_handler(State(state.clone()), Query(query)).await;
        assert_eq!(result.unwrap_err().into_response().status(), StatusCode::GONE);
        assert_eq!(state.lock_registry().unwrap().owner(), Address::from(12345));
    }

    #[tokio::test]
    async fn test_transfer_cancel() {
        let state = create_test_state();
        with_heir(&state);

        let result = cancel_transfer_handler(State(state.clone()), Query(caller_query(OWNER))).await;
        assert_eq!(result.unwrap_err().into_response().status(), StatusCode::NOT_FOUND);

        let query = TransferProposeQuery {
            api_key: API_KEY.to_string(),
            caller: OWNER.to_string(),
            new_owner: HEIR.to_string(),
            ts: Some(1000),
        };
        propose_transfer_handler(State(state.clone()), Query(query)).await.unwrap();

        let response = cancel_transfer_handler(State(state.clone()), Query(caller_query(OWNER)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.lock_registry().unwrap().pending_ownership_transfer(), None);
    }

    #[tokio::test]
    async fn test_propose_by_non_owner() {
        let state = create_test_state();
        with_heir(&state);

        let query = TransferProposeQuery {
            api_key: API_KEY.to_string(),
            caller: HEIR.to_string(),
            new_owner: HEIR.to_string(),
            ts: Some(1000),
        };
        let result = propose_transfer_handler(State(state), Query(query)).await;
        assert_eq!(result.unwrap_err().into_response().status(), StatusCode::FORBIDDEN);
    }
}
