//! Realtime push channel configuration.

use serde::{Deserialize, Serialize};

/// Realtime (WebSocket) push channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// WebSocket endpoint of the coordination server.
    #[serde(default = "default_url")]
    pub url: String,
    /// Internal buffer size for the broadcast channels fanning events out
    /// to subscribers.
    #[serde(default = "default_event_buffer")]
    pub event_buffer_size: usize,
    /// Window in milliseconds within which a redelivered envelope with the
    /// same id is dropped.
    #[serde(default = "default_dedup_window")]
    pub dedup_window_ms: u64,
    /// Capacity of the outbound frame queue.
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            event_buffer_size: default_event_buffer(),
            dedup_window_ms: default_dedup_window(),
            outbound_queue_size: default_outbound_queue(),
        }
    }
}

fn default_url() -> String {
    "ws://localhost:5000/ws".to_string()
}

fn default_event_buffer() -> usize {
    256
}

fn default_dedup_window() -> u64 {
    500
}

fn default_outbound_queue() -> usize {
    64
}
