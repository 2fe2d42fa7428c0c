//! Top-level client facade.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use aidlink_core::AppResult;
use aidlink_core::events::{EventEnvelope, EventKind};
use aidlink_core::traits::Transport;

use crate::api::CoordinationApi;
use crate::reconcile::Reconciler;
use crate::session::Session;
use crate::store::matching::MatchStore;
use crate::store::notifications::NotificationStore;
use crate::store::offers::OfferStore;
use crate::store::requests::RequestStore;

/// One authenticated user's view of the coordination system.
///
/// Owns the four stores, the realtime transport, and the pump task that
/// feeds pushed envelopes through the [`Reconciler`]. Built after login;
/// [`ReliefClient::start`] brings the push channel up and
/// [`ReliefClient::shutdown`] tears everything down again.
pub struct ReliefClient {
    session: Session,
    transport: Arc<dyn Transport>,
    /// Aid request state, gated to victim sessions.
    pub requests: Arc<RequestStore>,
    /// Resource offer state, gated to NGO sessions.
    pub offers: Arc<OfferStore>,
    /// Match records linking requests to offers.
    pub matches: Arc<MatchStore>,
    /// The user's notification inbox.
    pub notifications: Arc<NotificationStore>,
    reconciler: Arc<Reconciler>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl ReliefClient {
    /// Wire up stores and reconciler around a gateway and transport.
    pub fn new(
        gateway: Arc<dyn CoordinationApi>,
        transport: Arc<dyn Transport>,
        session: Session,
    ) -> Self {
        let requests = Arc::new(RequestStore::new(gateway.clone(), session.clone()));
        let offers = Arc::new(OfferStore::new(
            gateway.clone(),
            transport.clone(),
            session.clone(),
        ));
        let matches = Arc::new(MatchStore::new(
            gateway.clone(),
            transport.clone(),
            session.clone(),
        ));
        let notifications = Arc::new(NotificationStore::new(gateway.clone()));
        let reconciler = Arc::new(Reconciler::new(
            requests.clone(),
            offers.clone(),
            matches.clone(),
            notifications.clone(),
            gateway,
        ));
        Self {
            session,
            transport,
            requests,
            offers,
            matches,
            notifications,
            reconciler,
            pump: Mutex::new(None),
        }
    }

    /// Connect, join this user's rooms, and start pumping events into
    /// the stores. Calling this while already started restarts the pump.
    pub async fn start(&self) -> AppResult<()> {
        self.transport.connect().await?;
        self.transport.join_room(&self.session.user_room()).await?;
        if let Some(room) = self.session.role_room() {
            self.transport.join_room(&room).await?;
        }

        let mut rx = self.transport.subscribe_all().await?;
        let reconciler = self.reconciler.clone();
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(envelope) => reconciler.dispatch(&envelope).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Event pump lagged behind the push channel");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            debug!("Event pump stopped");
        });
        if let Some(old) = self.pump.lock().await.replace(handle) {
            old.abort();
        }

        info!(user_id = %self.session.user_id, role = %self.session.role, "Relief client started");
        Ok(())
    }

    /// Load the role-appropriate initial state over REST.
    ///
    /// Victims pull their requests, NGOs their offers; matches and the
    /// inbox are loaded for everyone.
    pub async fn sync(&self) -> AppResult<()> {
        if self.session.is_victim() {
            self.requests.fetch_requests().await?;
        }
        if self.session.is_ngo() {
            self.offers.fetch_offers().await?;
        }
        self.matches.fetch_my_matches().await?;
        self.notifications.fetch_notifications().await?;
        Ok(())
    }

    /// Stop the pump, leave rooms, and drop the connection.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.pump.lock().await.take() {
            handle.abort();
        }
        if let Some(room) = self.session.role_room() {
            if let Err(e) = self.transport.leave_room(&room).await {
                debug!(room = %room, error = %e, "Leave during shutdown failed");
            }
        }
        let user_room = self.session.user_room();
        if let Err(e) = self.transport.leave_room(&user_room).await {
            debug!(room = %user_room, error = %e, "Leave during shutdown failed");
        }
        self.transport.disconnect().await;
        info!("Relief client stopped");
    }

    /// Receiver for one event kind, for callers that render raw events.
    pub async fn subscribe(
        &self,
        event: EventKind,
    ) -> AppResult<broadcast::Receiver<EventEnvelope>> {
        self.transport.subscribe(event).await
    }

    /// Receiver for every envelope the transport delivers.
    pub async fn subscribe_all(&self) -> AppResult<broadcast::Receiver<EventEnvelope>> {
        self.transport.subscribe_all().await
    }

    /// The session this client was built for.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether the push channel is currently up.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }
}
