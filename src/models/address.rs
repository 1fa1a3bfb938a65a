use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opaque 32-byte identity of a caller or registry subject
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 32]);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("address is empty")]
    Empty,

    #[error("invalid hex in address: {0}")]
    InvalidHex(String),

    #[error("address too long: {0} bytes, at most 32")]
    TooLong(usize),
}

impl Address {
    /// The null sentinel
    pub const ZERO: Address = Address([0u8; 32]);

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Parse a hex address, `0x` prefix optional. Short values are left-padded,
    /// so `0x3039` and `3039` name the same identity.
    pub fn parse_hex(input: &str) -> Result<Self, AddressParseError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(AddressParseError::Empty);
        }

        // Odd-length felts like 0x7 are common, pad to a whole byte
        let padded = if digits.len() % 2 == 1 {
            format!("0{}", digits)
        } else {
            digits.to_string()
        };

        let bytes = hex::decode(&padded).map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        if bytes.len() > 32 {
            return Err(AddressParseError::TooLong(bytes.len()));
        }

        let mut out = [0u8; 32];
        out[32 - bytes.len()..].copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        let mut out = [0u8; 32];
        out[24..].copy_from_slice(&value.to_be_bytes());
        Self(out)
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl fmt::Display for Address {
    /// Shortest `0x` form, leading zero digits dropped
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = hex::encode(self.0);
        let encoded = encoded.trim_start_matches('0');
        if encoded.is_empty() {
            write!(f, "0x0")
        } else {
            write!(f, "0x{}", encoded)
        }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
