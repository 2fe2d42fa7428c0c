//! # aidlink-client
//!
//! The coordination client for AidLink. Connects the REST gateway, the
//! realtime transport, and the per-aggregate stores into one façade:
//!
//! - [`api`] — the [`CoordinationApi`] seam every store calls through
//! - [`http`] — the `reqwest` gateway implementing that seam
//! - [`session`] — who is logged in, carried by every store
//! - [`store`] — request, offer, match, and notification aggregates
//! - [`reconcile`] — cross-aggregate application of pushed events
//! - [`client`] — [`ReliefClient`], wiring it all together
//!
//! State flows one way: mutations go to the REST gateway, the confirmed
//! snapshot lands in a store, and pushed envelopes merely merge other
//! clients' confirmed snapshots into local state.

pub mod api;
pub mod client;
pub mod http;
pub mod reconcile;
pub mod session;
pub mod store;

pub use api::CoordinationApi;
pub use client::ReliefClient;
pub use http::HttpGateway;
pub use reconcile::Reconciler;
pub use session::Session;
pub use store::{MatchStore, NotificationStore, OfferStore, RequestStore};
