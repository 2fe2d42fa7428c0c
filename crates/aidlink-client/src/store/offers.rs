//! NGO-side resource offer store.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};
use validator::Validate;

use aidlink_core::events::{EventEnvelope, EventKind};
use aidlink_core::traits::Transport;
use aidlink_core::types::OfferId;
use aidlink_core::{AppError, AppResult};
use aidlink_entity::lifecycle::ensure_transition;
use aidlink_entity::offer::{CreateOfferInput, Offer, OfferStats, OfferStatus, UpdateOfferInput};

use crate::api::CoordinationApi;
use crate::session::Session;

use super::merge_snapshot;

/// Store for the current NGO's resource offers.
///
/// Every operation is gated to NGO sessions. On top of the gateway
/// round-trip, each successful mutation emits the matching event so
/// other clients hear about the change without polling.
pub struct OfferStore {
    /// REST gateway.
    gateway: Arc<dyn CoordinationApi>,
    /// Realtime side channel for post-mutation emits.
    transport: Arc<dyn Transport>,
    /// Who is logged in.
    session: Session,
    /// Offer snapshots, newest first.
    items: RwLock<Vec<Offer>>,
    /// Offer selected for detail views.
    current: RwLock<Option<OfferId>>,
}

impl OfferStore {
    /// Create a store bound to one session.
    pub fn new(
        gateway: Arc<dyn CoordinationApi>,
        transport: Arc<dyn Transport>,
        session: Session,
    ) -> Self {
        Self {
            gateway,
            transport,
            session,
            items: RwLock::new(Vec::new()),
            current: RwLock::new(None),
        }
    }

    fn ensure_ngo(&self) -> AppResult<()> {
        if self.session.is_ngo() {
            Ok(())
        } else {
            Err(AppError::authorization(
                "Access denied. Only NGOs can manage offers.",
            ))
        }
    }

    /// Status of an offer, preferring local state over a refetch.
    async fn status_of(&self, id: OfferId) -> AppResult<OfferStatus> {
        let local = self
            .items
            .read()
            .await
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.status);
        match local {
            Some(status) => Ok(status),
            None => Ok(self.gateway.get_offer(id).await?.status),
        }
    }

    /// Fire-and-forget emit of a full offer snapshot.
    async fn emit_snapshot(&self, event: EventKind, offer: &Offer) {
        match serde_json::to_value(offer) {
            Ok(payload) => self.transport.emit(event, payload).await,
            Err(e) => warn!(event = %event, error = %e, "Failed to encode offer snapshot"),
        }
    }

    /// Replace the full offer list from the server.
    pub async fn fetch_offers(&self) -> AppResult<Vec<Offer>> {
        self.ensure_ngo()?;
        let offers = self.gateway.list_offers().await?;
        *self.items.write().await = offers.clone();
        Ok(offers)
    }

    /// Fetch one offer and select it for detail views.
    pub async fn fetch_offer(&self, id: OfferId) -> AppResult<Offer> {
        self.ensure_ngo()?;
        let offer = self.gateway.get_offer(id).await?;
        self.merge(offer.clone()).await;
        *self.current.write().await = Some(id);
        Ok(offer)
    }

    /// Create an offer, prepend the confirmed snapshot, and announce it.
    pub async fn create_offer(&self, input: &CreateOfferInput) -> AppResult<Offer> {
        self.ensure_ngo()?;
        input
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid offer payload: {e}")))?;

        let offer = self.gateway.create_offer(input).await?;
        self.items.write().await.insert(0, offer.clone());
        info!(offer_id = %offer.id, resource = %offer.resource_type, "Created resource offer");
        self.emit_snapshot(EventKind::NewOffer, &offer).await;
        Ok(offer)
    }

    /// Edit an offer while it is still pending.
    pub async fn update_offer(&self, id: OfferId, input: &UpdateOfferInput) -> AppResult<Offer> {
        self.ensure_ngo()?;
        input
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid offer payload: {e}")))?;

        let status = self.status_of(id).await?;
        if !status.allows_edit() {
            return Err(AppError::transition(format!(
                "offer can only be edited while pending, not {status}"
            )));
        }

        let updated = self.gateway.update_offer(id, input).await?;
        self.merge(updated.clone()).await;
        self.emit_snapshot(EventKind::OfferUpdated, &updated).await;
        Ok(updated)
    }

    /// Delete an offer outright.
    pub async fn delete_offer(&self, id: OfferId) -> AppResult<()> {
        self.ensure_ngo()?;
        self.gateway.delete_offer(id).await?;
        self.items.write().await.retain(|o| o.id != id);
        let mut current = self.current.write().await;
        if *current == Some(id) {
            *current = None;
        }
        info!(offer_id = %id, "Deleted resource offer");
        Ok(())
    }

    /// Mark a pending offer as aged out.
    pub async fn expire_offer(&self, id: OfferId) -> AppResult<Offer> {
        self.ensure_ngo()?;
        let status = self.status_of(id).await?;
        ensure_transition("offer", status, OfferStatus::Expired)?;

        let expired = self.gateway.expire_offer(id).await?;
        self.merge(expired.clone()).await;
        info!(offer_id = %id, "Expired resource offer");
        self.emit_snapshot(EventKind::OfferExpired, &expired).await;
        Ok(expired)
    }

    /// Mark a matched offer as delivered.
    pub async fn fulfill_offer(&self, id: OfferId) -> AppResult<Offer> {
        self.ensure_ngo()?;
        let status = self.status_of(id).await?;
        ensure_transition("offer", status, OfferStatus::Fulfilled)?;

        let fulfilled = self.gateway.fulfill_offer(id).await?;
        self.merge(fulfilled.clone()).await;
        info!(offer_id = %id, "Fulfilled resource offer");
        self.emit_snapshot(EventKind::OfferFulfilled, &fulfilled).await;
        Ok(fulfilled)
    }

    /// Per-status counters, recomputed from the list.
    pub async fn stats(&self) -> OfferStats {
        OfferStats::collect(self.items.read().await.iter())
    }

    /// Merge a pushed snapshot into local state.
    pub(crate) async fn merge(&self, incoming: Offer) -> bool {
        let mut items = self.items.write().await;
        merge_snapshot(&mut items, incoming, |o| o.id, |o| o.updated_at)
    }

    /// Apply an offer-flavored envelope, returning the decoded snapshot
    /// so the caller can react to linked matches.
    pub(crate) async fn apply_event(&self, envelope: &EventEnvelope) -> Option<Offer> {
        match envelope.decode::<Offer>() {
            Ok(offer) => {
                self.merge(offer.clone()).await;
                Some(offer)
            }
            Err(e) => {
                warn!(event = %envelope.event, error = %e, "Dropping malformed offer envelope");
                None
            }
        }
    }

    /// Apply an event-induced status transition to a local offer.
    pub(crate) async fn apply_status(&self, id: OfferId, status: OfferStatus) -> AppResult<()> {
        let mut items = self.items.write().await;
        let offer = items
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| AppError::not_found(format!("offer {id} is not held locally")))?;
        let next = ensure_transition("offer", offer.status, status)?;
        if next != offer.status {
            offer.status = next;
            offer.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    /// Snapshot of all offers.
    pub async fn offers(&self) -> Vec<Offer> {
        self.items.read().await.clone()
    }

    /// One offer by id, from local state.
    pub async fn get(&self, id: OfferId) -> Option<Offer> {
        self.items.read().await.iter().find(|o| o.id == id).cloned()
    }

    /// The offer selected by the last [`OfferStore::fetch_offer`].
    pub async fn current(&self) -> Option<Offer> {
        let id = (*self.current.read().await)?;
        self.get(id).await
    }
}
