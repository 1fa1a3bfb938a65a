use crate::models::address::Address;
use dashmap::DashMap;
use std::net::IpAddr;

/// Length of one counting window, in seconds
pub const WINDOW_SECS: u64 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Window {
    started: u64,
    attempts: u32,
}

/// Fixed-window cap on verification attempts per (client IP, target address)
///
/// Refused attempts are not counted, so a client that keeps hammering one
/// address is released as soon as its window rolls over.
pub struct VerifyLimiter {
    windows: DashMap<(IpAddr, Address), Window>,
    max_attempts: u32,
}

impl VerifyLimiter {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            windows: DashMap::new(),
            max_attempts,
        }
    }

    /// Count one attempt. False once the pair has used up its window.
    pub fn try_acquire(&self, ip: IpAddr, address: Address, now: u64) -> bool {
        let mut window = self.windows.entry((ip, address)).or_insert(Window {
            started: now,
            attempts: 0,
        });

        if now.saturating_sub(window.started) >= WINDOW_SECS {
            *window = Window {
                started: now,
                attempts: 0,
            };
        }

        if window.attempts >= self.max_attempts {
            return false;
        }
        window.attempts += 1;
        true
    }

    /// Drop windows that have rolled over
    pub fn prune(&self, now: u64) {
        self.windows
            .retain(|_, window| now.saturating_sub(window.started) < WINDOW_SECS);
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    const CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1));

    #[test]
    fn test_caps_attempts_per_window() {
        let limiter = VerifyLimiter::new(3);
        let target = Address::from(222);

        for _ in 0..3 {
            assert!(limiter.try_acquire(CLIENT, target, 1000));
        }
        assert!(!limiter.try_acquire(CLIENT, target, 1000));
        assert!(!limiter.try_acquire(CLIENT, target, 1059));
    }

    #[test]
    fn test_refused_attempts_do_not_extend_the_window() {
        let limiter = VerifyLimiter::new(1);
        let target = Address::from(222);

        assert!(limiter.try_acquire(CLIENT, target, 1000));
        for t in 1001..1010 {
            assert!(!limiter.try_acquire(CLIENT, target, t));
        }
        assert!(limiter.try_acquire(CLIENT, target, 1060));
        assert!(!limiter.try_acquire(CLIENT, target, 1061));
    }

    #[test]
    fn test_targets_are_limited_separately() {
        let limiter = VerifyLimiter::new(1);

        assert!(limiter.try_acquire(CLIENT, Address::from(222), 1000));
        assert!(!limiter.try_acquire(CLIENT, Address::from(222), 1000));
        assert!(limiter.try_acquire(CLIENT, Address::from(333), 1000));
        assert!(limiter.try_acquire(IpAddr::V6(Ipv6Addr::LOCALHOST), Address::from(222), 1000));
        assert_eq!(limiter.len(), 3);
    }

    #[test]
    fn test_prune_drops_rolled_over_windows() {
        let limiter = VerifyLimiter::new(10);
        limiter.try_acquire(CLIENT, Address::from(1), 1000);
        limiter.try_acquire(CLIENT, Address::from(2), 1050);

        limiter.prune(1070);
        assert_eq!(limiter.len(), 1);

        limiter.prune(2000);
        assert!(limiter.is_empty());
    }
}
