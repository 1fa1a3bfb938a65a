// HTTP routes configuration

use crate::core::state::AppState;
use crate::handlers::{admin, alerts, fallback, health, metrics, users};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Public endpoints
        .route("/health", get(health::health_handler))
        .route("/user/role", get(users::role_handler))
        .route("/user/active", get(users::active_handler))
        .route("/user/info", get(users::info_handler))
        .route("/user/verify", post(users::verify_handler))
        .route("/admin/status", get(admin::status_handler))

        // Admin endpoints (require API key and an admin caller)
        .route("/user/register", post(users::register_handler))
        .route("/user/deactivate", post(users::deactivate_handler))
        .route("/user/reactivate", post(users::reactivate_handler))
        .route("/user/role/set", post(users::set_role_handler))
        .route("/admin/pause", post(admin::pause_handler))
        .route("/admin/unpause", post(admin::unpause_handler))

        // Ownership handover (require API key; owner or proposed owner)
        .route("/owner/transfer/propose", post(admin::propose_transfer_handler))
        .route("/owner/transfer/accept", post(admin::accept_transfer_handler))
        .route("/owner/transfer/cancel", post(admin::cancel_transfer_handler))

        // Monitoring endpoints (require API key)
        .route("/alerts", get(alerts::alerts_handler))
        .route("/metrics", get(metrics::metrics_handler))

        .fallback(fallback::fallback_handler)

        .with_state(state)
}
