// Centralized error handling for the registry

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

/// Failures of registry operations. No variant is ever raised after a
/// mutation has been applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Caller is not an active admin")]
    Unauthorized,

    #[error("Address is already registered")]
    AlreadyRegistered,

    #[error("User not found")]
    NotFound,

    #[error("User account is inactive")]
    InactiveAccount,

    #[error("Timestamp {provided} is earlier than last recorded action at {last}")]
    InvalidTimestamp { provided: u64, last: u64 },

    #[error("Owner address must not be zero")]
    InvalidOwner,

    #[error("Failed attempt threshold must be greater than 0")]
    InvalidThreshold,

    #[error("The owner's role cannot be changed")]
    OwnerProtected,

    #[error("Biometric reference must not be empty")]
    EmptyBiometric,

    #[error("No biometric reference is enrolled for this user")]
    NotEnrolled,

    #[error("Registry is paused")]
    Paused,

    #[error("Ownership transfer window must be greater than 0")]
    InvalidTransferWindow,

    #[error("Ownership cannot be transferred to the current owner")]
    InvalidTransfer,

    #[error("No ownership transfer is pending")]
    NoPendingTransfer,

    #[error("Ownership transfer expired at {expiry}")]
    TransferExpired { expiry: u64 },
}

impl RegistryError {
    pub fn is_permission_error(&self) -> bool {
        matches!(
            self,
            RegistryError::Unauthorized | RegistryError::InactiveAccount | RegistryError::OwnerProtected
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RegistryError::Unauthorized => StatusCode::FORBIDDEN,
            RegistryError::InactiveAccount => StatusCode::FORBIDDEN,
            RegistryError::NotFound => StatusCode::NOT_FOUND,
            RegistryError::AlreadyRegistered => StatusCode::CONFLICT,
            RegistryError::OwnerProtected => StatusCode::CONFLICT,
            RegistryError::InvalidTimestamp { .. } => StatusCode::BAD_REQUEST,
            RegistryError::InvalidOwner => StatusCode::BAD_REQUEST,
            RegistryError::InvalidThreshold => StatusCode::BAD_REQUEST,
            RegistryError::EmptyBiometric => StatusCode::BAD_REQUEST,
            RegistryError::NotEnrolled => StatusCode::CONFLICT,
            RegistryError::Paused => StatusCode::SERVICE_UNAVAILABLE,
            RegistryError::InvalidTransferWindow => StatusCode::BAD_REQUEST,
            RegistryError::InvalidTransfer => StatusCode::BAD_REQUEST,
            RegistryError::NoPendingTransfer => StatusCode::NOT_FOUND,
            RegistryError::TransferExpired { .. } => StatusCode::GONE,
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Resource not found: {0}")]
    RouteNotFound(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use crate::models::api::ErrorResponse;

        let status = match &self {
            ApiError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            ApiError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Registry(err) => err.status_code(),
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
