/// Compare two byte strings in constant time
///
/// Length mismatch returns early; equal-length inputs are always scanned in
/// full so a mismatch position cannot be inferred from timing.
pub fn constant_time_eq(provided: &[u8], expected: &[u8]) -> bool {
    provided.len() == expected.len()
        && provided
            .iter()
            .zip(expected.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Verify the gateway API key
pub fn verify_api_key(provided: &str, expected: &str) -> bool {
    constant_time_eq(provided.as_bytes(), expected.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_api_key_valid() {
        assert!(verify_api_key("test-key", "test-key"));
    }

    #[test]
    fn test_verify_api_key_invalid() {
        assert!(!verify_api_key("wrong-key", "test-key"));
    }

    #[test]
    fn test_verify_api_key_different_length() {
        assert!(!verify_api_key("short", "much-longer-key"));
    }

    #[test]
    fn test_verify_api_key_case_sensitive() {
        assert!(!verify_api_key("Test-Key", "test-key"));
    }

    #[test]
    fn test_constant_time_eq_bytes() {
        assert!(constant_time_eq(&[1, 2, 3], &[1, 2, 3]));
        assert!(!constant_time_eq(&[1, 2, 3], &[1, 2, 4]));
        assert!(!constant_time_eq(&[1, 2], &[1, 2, 3]));
        assert!(constant_time_eq(&[], &[]));
    }
}
