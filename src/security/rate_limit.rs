//! Fixed-window rate limiting.
//!
//! Each key owns a window start and a request count. A call either opens a
//! fresh window (count = 1) or increments the current one; the request is
//! allowed while the count stays within the limit. Bursts of up to twice the
//! limit are possible across a window boundary.
//!
//! State is process-local. Behind N instances the effective limit is
//! `max_requests * N`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::config::RateLimitConfig;
use crate::observability::metrics;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    length: Duration,
    count: u32,
}

impl Window {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) > self.length
    }
}

/// Outcome of a single rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Time until the current window closes.
    pub reset_after: Duration,
}

/// Fixed-window limiter keyed by arbitrary strings (usually `scope:ip`).
///
/// The map is bounded: stale windows are dropped by [`sweep`](Self::sweep),
/// which runs periodically and eagerly whenever the map grows past
/// `max_keys`. If every tracked window is still live at that point, the
/// window that started first is dropped.
pub struct FixedWindowLimiter {
    windows: DashMap<String, Window>,
    max_keys: usize,
}

impl FixedWindowLimiter {
    pub fn new(max_keys: usize) -> Self {
        Self {
            windows: DashMap::new(),
            max_keys: max_keys.max(1),
        }
    }

    /// Returns true if the request identified by `key` is within the limit.
    pub fn allow(&self, key: &str, max_requests: u32, window: Duration) -> bool {
        self.check(key, max_requests, window).allowed
    }

    pub fn check(&self, key: &str, max_requests: u32, window: Duration) -> Decision {
        self.check_at(key, max_requests, window, Instant::now())
    }

    /// Same as [`check`](Self::check) with an explicit clock reading.
    pub fn check_at(&self, key: &str, max_requests: u32, window: Duration, now: Instant) -> Decision {
        if !self.windows.contains_key(key) && self.windows.len() >= self.max_keys {
            self.make_room(now);
        }

        // The entry guard holds the shard lock, so read-increment-compare is
        // atomic for this key.
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            length: window,
            count: 0,
        });

        if entry.count == 0 || entry.is_expired(now) {
            *entry = Window {
                started: now,
                length: window,
                count: 1,
            };
        } else {
            entry.count = entry.count.saturating_add(1);
        }

        let allowed = entry.count <= max_requests;
        let elapsed = now.saturating_duration_since(entry.started);

        Decision {
            allowed,
            remaining: max_requests.saturating_sub(entry.count),
            reset_after: entry.length.saturating_sub(elapsed),
        }
    }

    /// Remove every window that has already closed. Returns how many were dropped.
    pub fn sweep(&self, now: Instant) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, w| !w.is_expired(now));
        before.saturating_sub(self.windows.len())
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    fn make_room(&self, now: Instant) {
        let swept = self.sweep(now);
        if self.windows.len() < self.max_keys {
            tracing::debug!(swept, "Rate limiter swept stale windows");
            return;
        }

        let oldest = self
            .windows
            .iter()
            .min_by_key(|w| w.value().started)
            .map(|w| w.key().clone());
        if let Some(key) = oldest {
            self.windows.remove(&key);
            tracing::warn!(key = %key, "Rate limiter at capacity, dropped oldest window");
        }
    }
}

/// Sweep stale windows until shutdown is signalled.
pub async fn run_sweeper(
    limiter: Arc<FixedWindowLimiter>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let dropped = limiter.sweep(Instant::now());
                if dropped > 0 {
                    tracing::debug!(dropped, remaining = limiter.len(), "Rate limiter sweep");
                }
            }
            _ = shutdown.recv() => {
                tracing::debug!("Rate limiter sweeper stopped");
                break;
            }
        }
    }
}

/// Limits for the contact form, resolved from configuration.
#[derive(Debug, Clone, Copy)]
pub struct ContactLimit {
    pub enabled: bool,
    pub max_requests: u32,
    pub window: Duration,
}

impl From<&RateLimitConfig> for ContactLimit {
    fn from(config: &RateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            max_requests: config.contact_max_requests,
            window: Duration::from_millis(config.contact_window_ms),
        }
    }
}

impl ContactLimit {
    /// Check a contact submission from `client`. Disabled limits always allow.
    pub fn check(&self, limiter: &FixedWindowLimiter, client: &str) -> Decision {
        if !self.enabled {
            return Decision {
                allowed: true,
                remaining: self.max_requests,
                reset_after: Duration::ZERO,
            };
        }
        let decision = limiter.check(&format!("contact:{client}"), self.max_requests, self.window);
        if !decision.allowed {
            tracing::warn!(client = %client, "Rate limit exceeded");
            metrics::record_rate_limited("contact");
        }
        decision
    }
}
