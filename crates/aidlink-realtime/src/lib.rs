//! # aidlink-realtime
//!
//! Client-side realtime push channel for AidLink.
//!
//! The coordination server pushes [`EventEnvelope`]s into named rooms;
//! this crate speaks that protocol and fans envelopes out to in-process
//! subscribers:
//!
//! - [`protocol`] — the frames sent to the server (join/leave/emit)
//! - [`router`] — per-event broadcast channels plus a firehose
//! - [`rooms`] — joined-room bookkeeping with idempotent joins
//! - [`dedup`] — windowed suppression of redelivered envelopes
//! - [`ws`] — the production `tokio-tungstenite` transport
//! - [`memory`] — an in-process loopback transport for tests and
//!   offline operation
//!
//! [`EventEnvelope`]: aidlink_core::events::EventEnvelope

pub mod dedup;
pub mod memory;
pub mod protocol;
pub mod rooms;
pub mod router;
pub mod ws;

pub use dedup::EventDeduplicator;
pub use memory::MemoryTransport;
pub use router::EventRouter;
pub use rooms::RoomTracker;
pub use ws::WsTransport;
