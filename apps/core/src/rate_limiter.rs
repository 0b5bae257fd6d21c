use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// A sliding-window rate limiter keyed by chat session.
///
/// Tracks request timestamps per session id to decide whether a new chat
/// request is allowed. State is small (timestamps within one window) and
/// stale sessions are pruned on the way through.
pub struct RateLimiter {
    /// Request timestamps per session.
    requests: HashMap<Uuid, Vec<Instant>>,
    /// Maximum requests allowed within `window`.
    limit: usize,
    /// Length of the sliding window.
    window: Duration,
}

impl RateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        RateLimiter {
            requests: HashMap::new(),
            limit,
            window,
        }
    }

    /// Check whether a request for this session is allowed.
    ///
    /// Allowed requests are recorded; rejected ones are not, so a throttled
    /// client does not push its own window further out.
    pub fn check(&mut self, session_id: Uuid) -> bool {
        let now = Instant::now();
        let window_start = now - self.window;

        // Drop sessions whose entire history fell out of the window.
        self.requests
            .retain(|_, timestamps| timestamps.iter().any(|&t| t > window_start));

        let session_requests = self.requests.entry(session_id).or_default();
        session_requests.retain(|&timestamp| timestamp > window_start);

        if session_requests.len() < self.limit {
            session_requests.push(now);
            true
        } else {
            false
        }
    }
}
