//! Deduplication of redelivered envelopes within a time window.
//!
//! The server may redeliver an envelope after a reconnect, and a client
//! that is both emitter and room member can see its own event echoed
//! back. Suppressing by envelope id inside a short window keeps those
//! redeliveries from double-applying.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Envelope deduplicator — suppresses repeats of an id within a window.
#[derive(Debug)]
pub struct EventDeduplicator {
    /// Window duration.
    window: Duration,
    /// Last seen time per envelope id.
    last_seen: Mutex<HashMap<String, Instant>>,
}

impl EventDeduplicator {
    /// Create a new deduplicator with the given window.
    pub fn new(window_ms: u64) -> Self {
        Self {
            window: Duration::from_millis(window_ms),
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    /// Check if an envelope should be dispatched or suppressed.
    ///
    /// Returns `true` if the envelope should proceed, `false` if it is a
    /// duplicate seen within the window.
    pub fn should_dispatch(&self, envelope_id: &str) -> bool {
        let mut map = self.last_seen.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();

        if let Some(last) = map.get(envelope_id) {
            if now.duration_since(*last) < self.window {
                return false;
            }
        }

        map.insert(envelope_id.to_string(), now);
        true
    }

    /// Clean up old entries.
    pub fn cleanup(&self) {
        let mut map = self.last_seen.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let cutoff = self.window * 10;
        map.retain(|_, v| now.duration_since(*v) < cutoff);
    }
}
