//! Event router — fans inbound envelopes out to per-event subscribers.

use dashmap::DashMap;
use tokio::sync::broadcast;

use aidlink_core::events::{EventEnvelope, EventKind};

/// Per-event broadcast channels plus a firehose channel that sees every
/// envelope.
///
/// Channels are created lazily on first subscription. Publishing to an
/// event kind nobody subscribes to is a no-op, matching the
/// fire-and-forget nature of the push channel.
#[derive(Debug)]
pub struct EventRouter {
    /// Event kind → broadcast sender.
    channels: DashMap<EventKind, broadcast::Sender<EventEnvelope>>,
    /// Firehose sender; sees every envelope regardless of kind.
    firehose: broadcast::Sender<EventEnvelope>,
    /// Buffer size for newly created channels.
    buffer_size: usize,
}

impl EventRouter {
    /// Create a new router with the given channel buffer size.
    pub fn new(buffer_size: usize) -> Self {
        let (firehose, _) = broadcast::channel(buffer_size);
        Self {
            channels: DashMap::new(),
            firehose,
            buffer_size,
        }
    }

    /// Subscribe to one event kind.
    pub fn subscribe(&self, event: EventKind) -> broadcast::Receiver<EventEnvelope> {
        self.channels
            .entry(event)
            .or_insert_with(|| broadcast::channel(self.buffer_size).0)
            .subscribe()
    }

    /// Subscribe to every envelope.
    pub fn subscribe_all(&self) -> broadcast::Receiver<EventEnvelope> {
        self.firehose.subscribe()
    }

    /// Drop the channel for an event kind, disconnecting its subscribers.
    pub fn unsubscribe(&self, event: EventKind) {
        self.channels.remove(&event);
    }

    /// Publish an envelope to its event channel and the firehose.
    pub fn publish(&self, envelope: EventEnvelope) {
        if let Some(tx) = self.channels.get(&envelope.event) {
            let _ = tx.send(envelope.clone());
        }
        let _ = self.firehose.send(envelope);
    }

    /// Number of live subscribers for an event kind.
    pub fn subscriber_count(&self, event: EventKind) -> usize {
        self.channels
            .get(&event)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }
}
