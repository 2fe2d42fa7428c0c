//! Wire frames sent to the coordination server.
//!
//! Inbound traffic is the [`EventEnvelope`] itself; only the client to
//! server direction has dedicated frames.

use serde::{Deserialize, Serialize};

use aidlink_core::AppResult;
use aidlink_core::events::{EventEnvelope, EventKind};

/// A frame sent from the client to the coordination server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Join a broadcast room.
    JoinRoom {
        /// Wire name of the room.
        room: String,
    },
    /// Leave a broadcast room.
    LeaveRoom {
        /// Wire name of the room.
        room: String,
    },
    /// Emit an event toward other clients.
    Emit {
        /// The event name.
        event: EventKind,
        /// Full entity snapshot carried by the event.
        payload: serde_json::Value,
    },
}

/// Decode one inbound text frame into an envelope.
pub fn decode_envelope(text: &str) -> AppResult<EventEnvelope> {
    Ok(serde_json::from_str(text)?)
}
