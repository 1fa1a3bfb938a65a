use crate::models::address::Address;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Raised when a user's failed verification count reaches the threshold
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ThresholdAlert {
    pub address: Address,
    pub failed_attempts: u32,
    pub threshold: u32,
    pub timestamp: u64,
    /// Whether the same call deactivated the account
    pub locked_out: bool,
}

/// Receiver of threshold alerts
///
/// Called while the registry is mid-operation, so implementations must not
/// block or call back into the registry.
pub trait AlertSink: Send + Sync {
    fn raise(&self, alert: &ThresholdAlert);
}

/// Logs every alert at `warn`
#[derive(Debug, Default)]
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn raise(&self, alert: &ThresholdAlert) {
        warn!(
            address = %alert.address,
            failed_attempts = alert.failed_attempts,
            threshold = alert.threshold,
            timestamp = alert.timestamp,
            locked_out = alert.locked_out,
            "Biometric failure threshold reached"
        );
    }
}

/// Forwards each alert to every inner sink in order
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn AlertSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl AlertSink for FanoutSink {
    fn raise(&self, alert: &ThresholdAlert) {
        for sink in &self.sinks {
            sink.raise(alert);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::alert_log::AlertLog;

    fn sample_alert() -> ThresholdAlert {
        ThresholdAlert {
            address: Address::from(222),
            failed_attempts: 3,
            threshold: 3,
            timestamp: 1004,
            locked_out: false,
        }
    }

    #[test]
    fn test_fanout_reaches_every_sink() {
        let first = Arc::new(AlertLog::with_capacity(8));
        let second = Arc::new(AlertLog::with_capacity(8));
        let fanout = FanoutSink::new()
            .with(first.clone())
            .with(second.clone())
            .with(Arc::new(TracingAlertSink));

        fanout.raise(&sample_alert());

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(first.recent()[0], sample_alert());
    }

    #[test]
    fn test_fanout_preserves_order() {
        let log = Arc::new(AlertLog::with_capacity(8));
        let fanout = FanoutSink::new().with(log.clone()).with(log.clone());

        fanout.raise(&sample_alert());
        assert_eq!(log.total(), 2);
        assert_eq!(log.recent(), vec![sample_alert(), sample_alert()]);
    }
}
