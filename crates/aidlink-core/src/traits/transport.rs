//! Injectable realtime transport trait.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::events::{EventEnvelope, EventKind, Room};
use crate::result::AppResult;

/// Client-side handle to the realtime push channel.
///
/// The transport is a notification side channel only: envelopes hint at
/// what changed, while authoritative state always comes back through the
/// REST gateway. Implementations are injected as `Arc<dyn Transport>` so
/// stores and tests can run against an in-memory loopback as easily as a
/// live WebSocket.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Establish the shared connection. Calling this while already
    /// connected is a no-op.
    async fn connect(&self) -> AppResult<()>;

    /// Tear down the connection and forget all joined rooms.
    async fn disconnect(&self);

    /// Whether the connection is currently up.
    fn is_connected(&self) -> bool;

    /// Join a broadcast room. Joining a room twice is a no-op.
    async fn join_room(&self, room: &Room) -> AppResult<()>;

    /// Leave a previously joined room.
    async fn leave_room(&self, room: &Room) -> AppResult<()>;

    /// Rooms currently joined.
    fn joined_rooms(&self) -> Vec<Room>;

    /// Subscribe to one event kind, connecting first when needed.
    ///
    /// The returned receiver sees every envelope of that kind until it is
    /// dropped or [`Transport::unsubscribe`] removes the channel.
    async fn subscribe(&self, event: EventKind) -> AppResult<broadcast::Receiver<EventEnvelope>>;

    /// Subscribe to every envelope regardless of kind.
    async fn subscribe_all(&self) -> AppResult<broadcast::Receiver<EventEnvelope>>;

    /// Drop every subscriber of an event kind.
    fn unsubscribe(&self, event: EventKind);

    /// Emit an event toward the server, fire-and-forget.
    ///
    /// Delivery failures are logged and swallowed; the push channel never
    /// gates a mutation that the REST gateway already confirmed.
    async fn emit(&self, event: EventKind, payload: serde_json::Value);
}
