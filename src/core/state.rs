// Application state (AppState)

use crate::alerts::alert_log::AlertLog;
use crate::alerts::sink::{FanoutSink, TracingAlertSink};
use crate::core::config::Config;
use crate::core::error::ApiError;
use crate::metrics::collector::Metrics;
use crate::security::verify_limiter::VerifyLimiter;
use crate::stores::user_registry::UserRegistry;
use anyhow::{Context, Result};
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared application state
///
/// The registry sits behind one mutex so that every request applies its
/// operation against the whole table exclusively.
#[derive(Clone)]
pub struct AppState {
    /// User registry, one writer at a time
    pub registry: Arc<Mutex<UserRegistry>>,

    /// Recent threshold alerts
    pub alert_log: Arc<AlertLog>,

    /// Verification limiter keyed by client IP and target address
    pub verify_limiter: Arc<VerifyLimiter>,

    /// Metrics collector for tracking statistics
    pub metrics: Arc<Metrics>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        let alert_log = Arc::new(AlertLog::with_capacity(config.registry.alert_log_capacity));
        let sink = FanoutSink::new()
            .with(Arc::new(TracingAlertSink))
            .with(alert_log.clone());

        let settings = config.registry.settings()?;
        let registry = UserRegistry::with_sink(settings, Arc::new(sink))
            .context("Failed to create user registry")?;

        let verify_limiter = Arc::new(VerifyLimiter::new(config.security.max_verifications_per_minute));

        Ok(Self {
            registry: Arc::new(Mutex::new(registry)),
            alert_log,
            verify_limiter,
            metrics: Arc::new(Metrics::new()),
            config,
        })
    }

    pub fn lock_registry(&self) -> Result<MutexGuard<'_, UserRegistry>, ApiError> {
        self.registry
            .lock()
            .map_err(|_| ApiError::InternalError("registry lock poisoned".to_string()))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::models::address::Address;
    use crate::models::user::{BiometricToken, Role};

    #[test]
    fn test_state_builds_registry_from_config() {
        let state = create_test_state();
        let registry = state.lock_registry().unwrap();
        assert_eq!(registry.owner(), Address::from(12345));
        assert_eq!(registry.get_user_role(Address::from(12345)), Ok(Role::Admin));
        assert_eq!(registry.settings().failed_attempt_threshold, 3);
    }

    #[test]
    fn test_state_rejects_bad_owner() {
        let mut config = create_test_config(false);
        config.registry.owner_address = "0x0".to_string();
        assert!(AppState::new(config).is_err());
    }

    #[test]
    fn test_state_enrolls_owner_biometric() {
        let mut config = create_test_config(false);
        config.registry.owner_biometric = Some("0x270f".to_string());
        let state = AppState::new(config).unwrap();

        let mut registry = state.lock_registry().unwrap();
        let outcome = registry
            .verify_biometric(Address::from(12345), &BiometricToken::from_hex("270f").unwrap(), 1)
            .unwrap();
        assert!(outcome.matched);
    }
}
