use crate::alerts::sink::ThresholdAlert;
use crate::models::address::Address;
use crate::models::user::UserView;
use crate::stores::user_registry::OwnershipTransfer;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct ApiKeyQuery {
    pub api_key: String,
}

#[derive(Deserialize)]
pub struct AddressQuery {
    pub address: String,
}

#[derive(Deserialize)]
pub struct RegisterQuery {
    pub api_key: String,
    pub caller: String,
    pub address: String,
    #[serde(default)]
    pub name: String,
    /// Role name or numeric code
    pub role: String,
    /// Hex-encoded biometric reference
    pub biometric: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub employee_id: String,
    pub ts: Option<u64>,
}

#[derive(Deserialize)]
pub struct VerifyQuery {
    pub address: String,
    /// Hex-encoded presented token
    pub biometric: String,
    pub ts: Option<u64>,
}

#[derive(Deserialize)]
pub struct ActivationQuery {
    pub api_key: String,
    pub caller: String,
    pub address: String,
    pub ts: Option<u64>,
}

#[derive(Deserialize)]
pub struct SetRoleQuery {
    pub api_key: String,
    pub caller: String,
    pub address: String,
    pub role: String,
    pub ts: Option<u64>,
}

#[derive(Deserialize)]
pub struct CallerQuery {
    pub api_key: String,
    pub caller: String,
}

#[derive(Deserialize)]
pub struct TransferProposeQuery {
    pub api_key: String,
    pub caller: String,
    pub new_owner: String,
    pub ts: Option<u64>,
}

#[derive(Deserialize)]
pub struct TransferAcceptQuery {
    pub api_key: String,
    pub caller: String,
    pub ts: Option<u64>,
}

#[derive(Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Serialize, Deserialize)]
pub struct RoleResponse {
    pub success: bool,
    pub address: String,
    pub role: String,
    pub role_code: u8,
}

#[derive(Serialize, Deserialize)]
pub struct ActiveResponse {
    pub success: bool,
    pub address: String,
    pub active: bool,
}

#[derive(Serialize)]
pub struct UserInfoResponse {
    pub success: bool,
    pub user: UserView,
}

#[derive(Serialize, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub matched: bool,
    pub failed_attempts: u32,
    pub alert: bool,
    pub locked_out: bool,
}

#[derive(Serialize)]
pub struct AlertListResponse {
    pub success: bool,
    pub total: u64,
    pub alerts: Vec<ThresholdAlert>,
}

#[derive(Serialize)]
pub struct RegistryStatusResponse {
    pub success: bool,
    pub owner: Address,
    pub paused: bool,
    pub pending_transfer: Option<OwnershipTransfer>,
}

#[derive(Serialize)]
pub struct TransferResponse {
    pub success: bool,
    pub transfer: OwnershipTransfer,
}
