//! In-memory loopback transport for tests and offline operation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::broadcast;

use aidlink_core::AppResult;
use aidlink_core::events::{EventEnvelope, EventKind, Room};
use aidlink_core::traits::Transport;

use crate::dedup::EventDeduplicator;
use crate::rooms::RoomTracker;
use crate::router::EventRouter;

/// Default dedup window for the loopback transport, in milliseconds.
const DEFAULT_DEDUP_WINDOW_MS: u64 = 500;

/// A [`Transport`] with no socket behind it.
///
/// Emits loop straight back into the local router, and tests inject
/// server-pushed envelopes with [`MemoryTransport::push`]. Room joins
/// are tracked but scope nothing; every pushed envelope is delivered.
#[derive(Debug)]
pub struct MemoryTransport {
    /// Fan-out of envelopes.
    router: Arc<EventRouter>,
    /// Rooms currently joined.
    rooms: RoomTracker,
    /// Suppression of repeated envelope ids.
    dedup: EventDeduplicator,
    /// Whether `connect` has been called.
    connected: AtomicBool,
}

impl MemoryTransport {
    /// Create a loopback transport with the given channel buffer size.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            router: Arc::new(EventRouter::new(buffer_size)),
            rooms: RoomTracker::new(),
            dedup: EventDeduplicator::new(DEFAULT_DEDUP_WINDOW_MS),
            connected: AtomicBool::new(false),
        }
    }

    /// Inject an envelope as if the server had pushed it.
    ///
    /// Runs through the same dedup window as a live socket, so pushing
    /// the same envelope twice delivers it once.
    pub fn push(&self, envelope: EventEnvelope) {
        if self.dedup.should_dispatch(&envelope.id.to_string()) {
            self.router.publish(envelope);
        }
    }

    async fn ensure_connected(&self) -> AppResult<()> {
        if !self.is_connected() {
            self.connect().await?;
        }
        Ok(())
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn connect(&self) -> AppResult<()> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        self.rooms.clear();
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn join_room(&self, room: &Room) -> AppResult<()> {
        self.ensure_connected().await?;
        self.rooms.join(room);
        Ok(())
    }

    async fn leave_room(&self, room: &Room) -> AppResult<()> {
        self.rooms.leave(room);
        Ok(())
    }

    fn joined_rooms(&self) -> Vec<Room> {
        self.rooms.all()
    }

    async fn subscribe(&self, event: EventKind) -> AppResult<broadcast::Receiver<EventEnvelope>> {
        self.ensure_connected().await?;
        Ok(self.router.subscribe(event))
    }

    async fn subscribe_all(&self) -> AppResult<broadcast::Receiver<EventEnvelope>> {
        self.ensure_connected().await?;
        Ok(self.router.subscribe_all())
    }

    fn unsubscribe(&self, event: EventKind) {
        self.router.unsubscribe(event);
    }

    async fn emit(&self, event: EventKind, payload: serde_json::Value) {
        // Loop back locally so a single process observes its own fan-out.
        self.push(EventEnvelope::new(event, payload));
    }
}
