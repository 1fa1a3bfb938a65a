use crate::core::error::ApiError;
use crate::models::address::Address;
use crate::models::user::{BiometricToken, Role};
use crate::utils::time::current_timestamp;

/// Parse a hex address parameter, naming the field on failure
pub fn parse_address(field: &str, value: &str) -> Result<Address, ApiError> {
    value
        .parse::<Address>()
        .map_err(|e| ApiError::InvalidParameter(format!("{}: {}", field, e)))
}

pub fn parse_role(value: &str) -> Result<Role, ApiError> {
    Role::parse(value).ok_or_else(|| {
        ApiError::InvalidParameter(format!("role: unknown role '{}', expected user|admin|0|1", value))
    })
}

/// Biometric tokens arrive hex-encoded and must not be empty
pub fn parse_token(value: &str) -> Result<BiometricToken, ApiError> {
    let token = BiometricToken::from_hex(value)
        .map_err(|e| ApiError::InvalidParameter(format!("biometric: {}", e)))?;
    if token.is_empty() {
        return Err(ApiError::InvalidParameter("biometric: must not be empty".to_string()));
    }
    Ok(token)
}

/// Explicit timestamp if given, otherwise the server clock
pub fn resolve_timestamp(ts: Option<u64>) -> u64 {
    ts.unwrap_or_else(current_timestamp)
}
