use crate::models::address::Address;
use crate::utils::auth::constant_time_eq;
use serde::Serialize;
use std::fmt;

/// Access class of a registered user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Numeric code as used by the gateway (USER = 0, ADMIN = 1)
    pub fn code(&self) -> u8 {
        match self {
            Role::User => 0,
            Role::Admin => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Role::User),
            1 => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Accepts a role name (any case) or its numeric code
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Self::from_code(code);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque biometric token, already reduced upstream to a comparable value
#[derive(Clone, PartialEq, Eq, Default)]
pub struct BiometricToken(Vec<u8>);

impl BiometricToken {
    pub fn from_hex(input: &str) -> Result<Self, hex::FromHexError> {
        let digits = input.trim().strip_prefix("0x").unwrap_or(input.trim());
        hex::decode(digits).map(Self)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exact equality, evaluated without early exit
    pub fn matches(&self, presented: &BiometricToken) -> bool {
        constant_time_eq(&self.0, &presented.0)
    }
}

impl From<u64> for BiometricToken {
    fn from(value: u64) -> Self {
        Self(value.to_be_bytes().to_vec())
    }
}

// Never print the reference itself
impl fmt::Debug for BiometricToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BiometricToken(<{} bytes>)", self.0.len())
    }
}

#[derive(Clone, Debug)]
pub struct User {
    pub address: Address,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub biometric_reference: BiometricToken,
    pub department: String,
    pub employee_id: String,
    pub failed_attempts: u32,
    pub last_action_timestamp: u64,
}

impl User {
    /// A fresh active record with a clean failure counter
    pub fn new(profile: UserProfile, timestamp: u64) -> Self {
        Self {
            address: profile.address,
            name: profile.name,
            role: profile.role,
            is_active: true,
            biometric_reference: profile.biometric_reference,
            department: profile.department,
            employee_id: profile.employee_id,
            failed_attempts: 0,
            last_action_timestamp: timestamp,
        }
    }

    pub fn view(&self) -> UserView {
        UserView {
            address: self.address,
            name: self.name.clone(),
            role: self.role,
            is_active: self.is_active,
            department: self.department.clone(),
            employee_id: self.employee_id.clone(),
            failed_attempts: self.failed_attempts,
            last_action_timestamp: self.last_action_timestamp,
        }
    }
}

/// Registration input for a new user
#[derive(Clone, Debug)]
pub struct UserProfile {
    pub address: Address,
    pub name: String,
    pub role: Role,
    pub biometric_reference: BiometricToken,
    pub department: String,
    pub employee_id: String,
}

/// Read-only projection of a user, without the biometric reference
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub address: Address,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub department: String,
    pub employee_id: String,
    pub failed_attempts: u32,
    pub last_action_timestamp: u64,
}
