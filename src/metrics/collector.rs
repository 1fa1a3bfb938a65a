use crate::stores::user_registry::UserRegistry;
use crate::utils::time::{current_timestamp, elapsed_seconds};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct Metrics {
    pub registrations: AtomicU64,
    pub verifications: AtomicU64,
    pub matches: AtomicU64,
    pub mismatches: AtomicU64,
    pub alerts: AtomicU64,
    pub rejected_calls: AtomicU64,
    pub start_time: u64,
}

#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    pub registrations: u64,
    pub verifications: u64,
    pub matches: u64,
    pub mismatches: u64,
    pub match_rate: f64,
    pub alerts: u64,
    pub rejected_calls: u64,
    #[serde(rename = "registered_users")]
    pub total_users: usize,
    pub active_users: usize,
    pub uptime_seconds: u64,
    pub verifications_per_second: f64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            registrations: AtomicU64::new(0),
            verifications: AtomicU64::new(0),
            matches: AtomicU64::new(0),
            mismatches: AtomicU64::new(0),
            alerts: AtomicU64::new(0),
            rejected_calls: AtomicU64::new(0),
            start_time: current_timestamp(),
        }
    }

    pub fn increment_registrations(&self) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one completed verification and its outcome
    pub fn record_verification(&self, matched: bool, alerted: bool) {
        self.verifications.fetch_add(1, Ordering::Relaxed);
        if matched {
            self.matches.fetch_add(1, Ordering::Relaxed);
        } else {
            self.mismatches.fetch_add(1, Ordering::Relaxed);
        }
        if alerted {
            self.alerts.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_rejected(&self) {
        self.rejected_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Collects counters plus registry occupancy and derives match_rate,
    /// verifications_per_second and uptime_seconds.
    pub fn get_snapshot(&self, registry: &UserRegistry) -> MetricsSnapshot {
        let registrations = self.registrations.load(Ordering::Relaxed);
        let verifications = self.verifications.load(Ordering::Relaxed);
        let matches = self.matches.load(Ordering::Relaxed);
        let mismatches = self.mismatches.load(Ordering::Relaxed);

        let match_rate = if verifications > 0 {
            (matches as f64 / verifications as f64) * 100.0
        } else {
            0.0
        };

        let uptime_seconds = elapsed_seconds(self.start_time, current_timestamp());

        let verifications_per_second = if uptime_seconds > 0 {
            verifications as f64 / uptime_seconds as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            registrations,
            verifications,
            matches,
            mismatches,
            match_rate,
            alerts: self.alerts.load(Ordering::Relaxed),
            rejected_calls: self.rejected_calls.load(Ordering::Relaxed),
            total_users: registry.len(),
            active_users: registry.active_count(),
            uptime_seconds,
            verifications_per_second,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::address::Address;
    use crate::stores::user_registry::RegistrySettings;

    #[test]
    fn test_empty_snapshot() {
        let metrics = Metrics::new();
        let registry = UserRegistry::new(RegistrySettings::new(Address::from(1))).unwrap();

        let snapshot = metrics.get_snapshot(&registry);
        assert_eq!(snapshot.verifications, 0);
        assert_eq!(snapshot.match_rate, 0.0);
        assert_eq!(snapshot.total_users, 1);
        assert_eq!(snapshot.active_users, 1);
    }

    #[test]
    fn test_record_verification() {
        let metrics = Metrics::new();
        let registry = UserRegistry::new(RegistrySettings::new(Address::from(1))).unwrap();

        metrics.record_verification(true, false);
        metrics.record_verification(false, false);
        metrics.record_verification(false, true);
        metrics.record_verification(true, false);
        metrics.increment_registrations();
        metrics.increment_rejected();

        let snapshot = metrics.get_snapshot(&registry);
        assert_eq!(snapshot.verifications, 4);
        assert_eq!(snapshot.matches, 2);
        assert_eq!(snapshot.mismatches, 2);
        assert_eq!(snapshot.alerts, 1);
        assert_eq!(snapshot.match_rate, 50.0);
        assert_eq!(snapshot.registrations, 1);
        assert_eq!(snapshot.rejected_calls, 1);
    }

    #[test]
    fn test_snapshot_serializes_renamed_fields() {
        let metrics = Metrics::new();
        let registry = UserRegistry::new(RegistrySettings::new(Address::from(1))).unwrap();
        let json = serde_json::to_value(metrics.get_snapshot(&registry)).unwrap();
        assert_eq!(json["registered_users"], 1);
        assert!(json.get("total_users").is_none());
    }
}
