//! Rate limiting middleware
//!
//! Sliding-window limit on failed authorization attempts per username.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Failed-attempt rate limiter
pub struct RateLimiter {
    failures: HashMap<String, Vec<Instant>>,
    max_failures: usize,
    window: Duration,
    last_sweep: Instant,
}

impl RateLimiter {
    pub fn new(max_failures: usize, window: Duration) -> Self {
        Self {
            failures: HashMap::new(),
            max_failures,
            window,
            last_sweep: Instant::now(),
        }
    }

    /// Returns false once `key` has `max_failures` failures inside the window.
    pub fn is_allowed(&mut self, key: &str) -> bool {
        let now = Instant::now();
        self.sweep_if_due(now);
        let window = self.window;

        let Some(entry) = self.failures.get_mut(key) else {
            return true;
        };

        // Remove old failures
        entry.retain(|&time| now.duration_since(time) <= window);

        if entry.is_empty() {
            self.failures.remove(key);
            return true;
        }

        entry.len() < self.max_failures
    }

    pub fn record_failure(&mut self, key: &str) {
        let now = Instant::now();
        self.sweep_if_due(now);
        self.failures.entry(key.to_string()).or_default().push(now);
    }

    /// Forget all failures for `key`, e.g. after a successful login.
    pub fn reset(&mut self, key: &str) {
        self.failures.remove(key);
    }

    /// Number of keys currently tracked
    pub fn tracked(&self) -> usize {
        self.failures.len()
    }

    /// Failures recorded for `key`, expired ones included until swept
    pub fn failures_for(&self, key: &str) -> usize {
        self.failures.get(key).map_or(0, Vec::len)
    }

    // At most one full pass per window.
    fn sweep_if_due(&mut self, now: Instant) {
        if now.duration_since(self.last_sweep) >= self.window {
            self.sweep_at(now);
        }
    }

    /// Drops every key whose newest failure has left the window.
    fn sweep_at(&mut self, now: Instant) {
        let window = self.window;
        self.failures.retain(|_, times| {
            times
                .last()
                .is_some_and(|&newest| now.duration_since(newest) <= window)
        });
        self.last_sweep = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_after_max_failures() {
        let mut limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert!(limiter.is_allowed("alice"));
            limiter.record_failure("alice");
        }
        assert!(!limiter.is_allowed("alice"));
        assert!(limiter.is_allowed("bryan"));
        assert_eq!(limiter.failures_for("alice"), 3);
    }

    #[test]
    fn test_reset_clears_failures() {
        let mut limiter = RateLimiter::new(1, Duration::from_secs(60));
        limiter.record_failure("alice");
        assert!(!limiter.is_allowed("alice"));
        limiter.reset("alice");
        assert!(limiter.is_allowed("alice"));
        assert_eq!(limiter.tracked(), 0);
    }

    #[test]
    fn test_failures_expire_after_window() {
        let mut limiter = RateLimiter::new(1, Duration::from_millis(20));
        limiter.record_failure("alice");
        assert!(!limiter.is_allowed("alice"));
        std::thread::sleep(Duration::from_millis(60));
        assert!(limiter.is_allowed("alice"));
        assert_eq!(limiter.tracked(), 0);
    }

    #[test]
    fn test_expired_keys_are_swept_without_being_queried() {
        let mut limiter = RateLimiter::new(5, Duration::from_millis(500));
        for i in 0..10_000 {
            limiter.record_failure(&format!("user-{}", i));
        }
        assert_eq!(limiter.tracked(), 10_000);

        std::thread::sleep(Duration::from_millis(700));
        assert!(limiter.is_allowed("alice"));
        assert_eq!(limiter.tracked(), 0);
    }

    #[test]
    fn test_sweep_on_record_keeps_only_live_keys() {
        let mut limiter = RateLimiter::new(5, Duration::from_millis(20));
        limiter.record_failure("old-1");
        limiter.record_failure("old-2");
        std::thread::sleep(Duration::from_millis(60));

        limiter.record_failure("fresh");
        assert_eq!(limiter.tracked(), 1);
        assert_eq!(limiter.failures_for("fresh"), 1);
        assert_eq!(limiter.failures_for("old-1"), 0);
    }
}
