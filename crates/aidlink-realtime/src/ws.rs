//! WebSocket transport backed by `tokio-tungstenite`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use aidlink_core::config::realtime::RealtimeConfig;
use aidlink_core::events::{EventEnvelope, EventKind, Room};
use aidlink_core::traits::Transport;
use aidlink_core::{AppError, AppResult};

use crate::dedup::EventDeduplicator;
use crate::protocol::{self, ClientFrame};
use crate::rooms::RoomTracker;
use crate::router::EventRouter;

/// I/O halves of a live connection.
#[derive(Debug)]
struct Connection {
    /// Queue feeding the writer task.
    outbound: mpsc::Sender<ClientFrame>,
    /// Task draining inbound frames into the router.
    reader: JoinHandle<()>,
    /// Task flushing outbound frames onto the socket.
    writer: JoinHandle<()>,
}

/// Production transport speaking the coordination server's WebSocket
/// protocol.
///
/// One socket is shared by all stores. Inbound envelopes pass through a
/// deduplication window and fan out via an [`EventRouter`]; outbound
/// frames go through a bounded queue so a stalled socket never blocks a
/// store mutation.
#[derive(Debug)]
pub struct WsTransport {
    /// WebSocket endpoint.
    url: String,
    /// Capacity of the outbound frame queue.
    outbound_queue_size: usize,
    /// Fan-out of inbound envelopes.
    router: Arc<EventRouter>,
    /// Rooms currently joined.
    rooms: RoomTracker,
    /// Suppression of redelivered envelopes.
    dedup: Arc<EventDeduplicator>,
    /// Whether the socket is currently up.
    connected: Arc<AtomicBool>,
    /// Live connection state, `None` while disconnected.
    conn: Mutex<Option<Connection>>,
}

impl WsTransport {
    /// Create a transport from configuration. Does not connect yet.
    pub fn new(config: &RealtimeConfig) -> Self {
        Self {
            url: config.url.clone(),
            outbound_queue_size: config.outbound_queue_size,
            router: Arc::new(EventRouter::new(config.event_buffer_size)),
            rooms: RoomTracker::new(),
            dedup: Arc::new(EventDeduplicator::new(config.dedup_window_ms)),
            connected: Arc::new(AtomicBool::new(false)),
            conn: Mutex::new(None),
        }
    }

    async fn ensure_connected(&self) -> AppResult<()> {
        if self.is_connected() {
            return Ok(());
        }
        self.connect().await
    }

    async fn send_frame(&self, frame: ClientFrame) -> AppResult<()> {
        let guard = self.conn.lock().await;
        let Some(conn) = guard.as_ref() else {
            return Err(AppError::transport("realtime channel is not connected"));
        };
        match conn.outbound.try_send(frame) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("Outbound frame queue full, dropping frame");
                Err(AppError::transport("outbound frame queue is full"))
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.connected.store(false, Ordering::SeqCst);
                Err(AppError::transport("realtime channel writer has closed"))
            }
        }
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn connect(&self) -> AppResult<()> {
        let mut guard = self.conn.lock().await;
        if guard.is_some() && self.connected.load(Ordering::SeqCst) {
            return Ok(());
        }

        let (stream, _) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .map_err(|e| AppError::transport(format!("WebSocket connect failed: {e}")))?;
        let (mut sink, mut source) = stream.split();

        let (tx, mut rx) = mpsc::channel::<ClientFrame>(self.outbound_queue_size);

        let connected = Arc::clone(&self.connected);
        let writer = tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                let text = match serde_json::to_string(&frame) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to encode outbound frame");
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::Text(text.into())).await {
                    tracing::warn!(error = %e, "WebSocket send failed, closing writer");
                    connected.store(false, Ordering::SeqCst);
                    break;
                }
            }
        });

        let router = Arc::clone(&self.router);
        let dedup = Arc::clone(&self.dedup);
        let connected = Arc::clone(&self.connected);
        let reader = tokio::spawn(async move {
            while let Some(message) = source.next().await {
                match message {
                    Ok(Message::Text(text)) => match protocol::decode_envelope(text.as_str()) {
                        Ok(envelope) => {
                            if dedup.should_dispatch(&envelope.id.to_string()) {
                                router.publish(envelope);
                            } else {
                                tracing::debug!(
                                    envelope_id = %envelope.id,
                                    "Suppressed duplicate envelope"
                                );
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Dropping malformed envelope");
                        }
                    },
                    Ok(Message::Close(_)) => {
                        tracing::info!("Server closed the realtime channel");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "WebSocket read failed");
                        break;
                    }
                }
            }
            connected.store(false, Ordering::SeqCst);
        });

        *guard = Some(Connection {
            outbound: tx,
            reader,
            writer,
        });
        self.connected.store(true, Ordering::SeqCst);
        tracing::info!(url = %self.url, "Realtime channel connected");
        Ok(())
    }

    async fn disconnect(&self) {
        let mut guard = self.conn.lock().await;
        if let Some(conn) = guard.take() {
            conn.reader.abort();
            conn.writer.abort();
        }
        self.connected.store(false, Ordering::SeqCst);
        let left = self.rooms.clear();
        if !left.is_empty() {
            tracing::debug!(rooms = left.len(), "Dropped room memberships on disconnect");
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn join_room(&self, room: &Room) -> AppResult<()> {
        self.ensure_connected().await?;
        if self.rooms.join(room) {
            if let Err(e) = self
                .send_frame(ClientFrame::JoinRoom {
                    room: room.to_string(),
                })
                .await
            {
                // Roll back so a retry re-sends the join frame.
                self.rooms.leave(room);
                return Err(e);
            }
            tracing::debug!(room = %room, "Joined room");
        }
        Ok(())
    }

    async fn leave_room(&self, room: &Room) -> AppResult<()> {
        if self.rooms.leave(room) && self.is_connected() {
            self.send_frame(ClientFrame::LeaveRoom {
                room: room.to_string(),
            })
            .await?;
            tracing::debug!(room = %room, "Left room");
        }
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
        if !self.is_connected() {
            tracing::debug!(event = %event, "Emit skipped, realtime channel is offline");
            return;
        }
        if let Err(e) = self.send_frame(ClientFrame::Emit { event, payload }).await {
            tracing::debug!(event = %event, error = %e, "Emit dropped");
        }
    }
}
