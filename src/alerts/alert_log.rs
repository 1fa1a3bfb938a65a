use crate::alerts::sink::{AlertSink, ThresholdAlert};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Bounded in-memory record of recent alerts, oldest evicted first
pub struct AlertLog {
    entries: Mutex<VecDeque<ThresholdAlert>>,
    capacity: usize,
    total: AtomicU64,
}

impl AlertLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            total: AtomicU64::new(0),
        }
    }

    /// Alerts currently retained, oldest first
    pub fn recent(&self) -> Vec<ThresholdAlert> {
        match self.entries.lock() {
            Ok(entries) => entries.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    /// Alerts ever raised, including evicted ones
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AlertSink for AlertLog {
    fn raise(&self, alert: &ThresholdAlert) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(alert.clone());
        self.total.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::address::Address;

    fn alert(timestamp: u64) -> ThresholdAlert {
        ThresholdAlert {
            address: Address::from(1),
            failed_attempts: 3,
            threshold: 3,
            timestamp,
            locked_out: false,
        }
    }

    #[test]
    fn test_records_in_order() {
        let log = AlertLog::with_capacity(4);
        assert!(log.is_empty());

        log.raise(&alert(1));
        log.raise(&alert(2));

        let recent = log.recent();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].timestamp, 1);
        assert_eq!(recent[1].timestamp, 2);
    }

    #[test]
    fn test_evicts_oldest_at_capacity() {
        let log = AlertLog::with_capacity(2);
        for ts in 1..=5 {
            log.raise(&alert(ts));
        }

        let timestamps: Vec<u64> = log.recent().iter().map(|a| a.timestamp).collect();
        assert_eq!(timestamps, vec![4, 5]);
        assert_eq!(log.total(), 5);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let log = AlertLog::with_capacity(0);
        log.raise(&alert(1));
        log.raise(&alert(2));
        assert_eq!(log.len(), 1);
        assert_eq!(log.recent()[0].timestamp, 2);
    }
}
