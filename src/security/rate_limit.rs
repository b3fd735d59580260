use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Time source for window bookkeeping, injected so tests can drive the clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Production clock backed by `Instant::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Attempt budget for one guarded action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_attempts: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub const fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
        }
    }
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Denied { retry_after: Duration },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }

    /// Remaining wait in whole minutes, ceiling-rounded, never zero on denial.
    pub fn retry_after_minutes(&self) -> u64 {
        match self {
            RateLimitDecision::Allowed => 0,
            RateLimitDecision::Denied { retry_after } => {
                (retry_after.as_secs() + 59) / 60
            }
        }
    }
}

struct AttemptWindow {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window attempt counter keyed by an opaque string such as
/// `signin_<email>`.
///
/// Entries persist for the process lifetime; unbounded growth is an accepted
/// tradeoff at this scale. The map sits behind a `Mutex` so the
/// check-and-increment sequence stays atomic on a multithreaded runtime.
pub struct RateLimiter {
    attempts: Mutex<HashMap<String, AttemptWindow>>,
    clock: Box<dyn Clock>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            attempts: Mutex::new(HashMap::new()),
            clock: Box::new(clock),
        }
    }

    /// Record an attempt for `key` and decide whether it may proceed.
    ///
    /// A missing or expired entry is overwritten with a fresh window at count
    /// one. Within a live window the count increments until the policy
    /// maximum, after which attempts are denied without mutating the entry.
    pub fn check(&self, key: &str, policy: RateLimitPolicy) -> RateLimitDecision {
        let now = self.clock.now();
        let mut attempts = self.attempts.lock().expect("rate limiter mutex poisoned");

        match attempts.get_mut(key) {
            Some(entry) if now < entry.reset_at => {
                if entry.count < policy.max_attempts {
                    entry.count += 1;
                    RateLimitDecision::Allowed
                } else {
                    RateLimitDecision::Denied {
                        retry_after: entry.reset_at - now,
                    }
                }
            }
            _ => {
                attempts.insert(
                    key.to_string(),
                    AttemptWindow {
                        count: 1,
                        reset_at: now + policy.window,
                    },
                );
                RateLimitDecision::Allowed
            }
        }
    }

    /// Time left until the window for `key` resets; zero when no entry exists
    /// or the window already elapsed.
    pub fn remaining_wait(&self, key: &str) -> Duration {
        let now = self.clock.now();
        let attempts = self.attempts.lock().expect("rate limiter mutex poisoned");
        match attempts.get(key) {
            Some(entry) if now < entry.reset_at => entry.reset_at - now,
            _ => Duration::ZERO,
        }
    }
}

/// Namespaced limiter key for an auth action: lowercased, trimmed email under
/// an action prefix.
pub fn auth_key(action: &str, email: &str) -> String {
    format!("{action}_{}", email.trim().to_lowercase())
}
