//! Routes pushed envelopes into the entity stores.
//!
//! Every envelope the transport delivers passes through one
//! [`Reconciler::dispatch`] call. Full snapshots are merged by the
//! owning store; bare status changes go through the lifecycle tables;
//! match events additionally move the linked request and offer, since
//! the backend emits the match but not always the aggregates it
//! touched.
//!
//! Dispatch never returns an error. A pushed event has no caller to
//! report to, so failures are logged and, where local state has
//! demonstrably diverged, repaired with a refetch.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use aidlink_core::error::ErrorKind;
use aidlink_core::events::{EventEnvelope, EventKind};
use aidlink_core::types::{OfferId, RequestId};
use aidlink_entity::matching::{Match, MatchStatus};
use aidlink_entity::offer::OfferStatus;
use aidlink_entity::request::RequestStatus;

use crate::api::CoordinationApi;
use crate::store::matching::MatchStore;
use crate::store::notifications::NotificationStore;
use crate::store::offers::OfferStore;
use crate::store::requests::RequestStore;

/// Wire shape of `*_status_changed` payloads.
#[derive(Debug, Deserialize)]
struct StatusChange<I, S> {
    id: I,
    status: S,
}

/// Applies pushed events to the stores.
pub struct Reconciler {
    requests: Arc<RequestStore>,
    offers: Arc<OfferStore>,
    matches: Arc<MatchStore>,
    notifications: Arc<NotificationStore>,
    /// Used to repair local state after a divergent status push.
    gateway: Arc<dyn CoordinationApi>,
}

impl Reconciler {
    pub fn new(
        requests: Arc<RequestStore>,
        offers: Arc<OfferStore>,
        matches: Arc<MatchStore>,
        notifications: Arc<NotificationStore>,
        gateway: Arc<dyn CoordinationApi>,
    ) -> Self {
        Self {
            requests,
            offers,
            matches,
            notifications,
            gateway,
        }
    }

    /// Route one envelope to the stores it concerns.
    pub async fn dispatch(&self, envelope: &EventEnvelope) {
        debug!(event = %envelope.event, envelope_id = %envelope.id, "Dispatching event");
        match envelope.event {
            EventKind::NewRequest | EventKind::RequestUpdated | EventKind::RequestMatched => {
                self.requests.apply_event(envelope).await;
            }
            EventKind::RequestStatusChanged => {
                match envelope.decode::<StatusChange<RequestId, RequestStatus>>() {
                    Ok(change) => self.apply_request_status(change.id, change.status).await,
                    Err(e) => {
                        warn!(error = %e, "Dropping malformed request status change");
                    }
                }
            }
            EventKind::NewOffer
            | EventKind::OfferUpdated
            | EventKind::OfferMatched
            | EventKind::OfferExpired => {
                self.offers.apply_event(envelope).await;
            }
            EventKind::OfferStatusChanged => {
                match envelope.decode::<StatusChange<OfferId, OfferStatus>>() {
                    Ok(change) => self.apply_offer_status(change.id, change.status).await,
                    Err(e) => {
                        warn!(error = %e, "Dropping malformed offer status change");
                    }
                }
            }
            EventKind::OfferFulfilled => {
                if let Some(offer) = self.offers.apply_event(envelope).await {
                    self.on_offer_fulfilled(offer.id).await;
                }
            }
            EventKind::MatchCreated
            | EventKind::MatchAccepted
            | EventKind::MatchRejected
            | EventKind::MatchFulfilled => {
                if let Some(m) = self.matches.apply_event(envelope).await {
                    self.on_match_event(envelope.event, &m).await;
                }
            }
            EventKind::Notification | EventKind::SystemAlert | EventKind::EmergencyDispatch => {
                self.notifications.apply_event(envelope).await;
            }
        }
    }

    /// Statuses a match event induces on the request and offer it links.
    ///
    /// Acceptance moves only the request; the offer stays `matched`
    /// until delivery is confirmed. Rejection moves nothing, the pair
    /// simply stays eligible for other matches.
    async fn on_match_event(&self, kind: EventKind, m: &Match) {
        match kind {
            EventKind::MatchCreated => {
                self.apply_request_status(m.request_id, RequestStatus::Matched)
                    .await;
                self.apply_offer_status(m.offer_id, OfferStatus::Matched).await;
            }
            EventKind::MatchAccepted => {
                self.apply_request_status(m.request_id, RequestStatus::Accepted)
                    .await;
            }
            EventKind::MatchFulfilled => {
                self.apply_request_status(m.request_id, RequestStatus::Fulfilled)
                    .await;
                self.apply_offer_status(m.offer_id, OfferStatus::Fulfilled)
                    .await;
            }
            _ => {}
        }
    }

    /// A fulfilled offer settles its accepted matches and their
    /// requests, mirroring the backend cascade for clients that missed
    /// the individual match events.
    async fn on_offer_fulfilled(&self, offer_id: OfferId) {
        for m in self.matches.for_offer(offer_id).await {
            if m.status != MatchStatus::Accepted {
                continue;
            }
            if let Err(e) = self.matches.apply_status(m.id, MatchStatus::Fulfilled).await {
                warn!(match_id = %m.id, error = %e, "Match cascade after offer fulfillment failed");
            }
            self.apply_request_status(m.request_id, RequestStatus::Fulfilled)
                .await;
        }
    }

    async fn apply_request_status(&self, id: RequestId, status: RequestStatus) {
        match self.requests.apply_status(id, status).await {
            Ok(()) => {}
            Err(e) if e.kind == ErrorKind::NotFound => {
                debug!(request_id = %id, status = %status, "Status for request not held locally");
            }
            Err(e) if e.kind == ErrorKind::Transition => {
                warn!(request_id = %id, error = %e, "Local request diverged, refetching");
                match self.gateway.get_request(id).await {
                    Ok(request) => {
                        self.requests.merge(request).await;
                    }
                    Err(e) => warn!(request_id = %id, error = %e, "Request refetch failed"),
                }
            }
            Err(e) => warn!(request_id = %id, error = %e, "Request status apply failed"),
        }
    }

    async fn apply_offer_status(&self, id: OfferId, status: OfferStatus) {
        match self.offers.apply_status(id, status).await {
            Ok(()) => {}
            Err(e) if e.kind == ErrorKind::NotFound => {
                debug!(offer_id = %id, status = %status, "Status for offer not held locally");
            }
            Err(e) if e.kind == ErrorKind::Transition => {
                warn!(offer_id = %id, error = %e, "Local offer diverged, refetching");
                match self.gateway.get_offer(id).await {
                    Ok(offer) => {
                        self.offers.merge(offer).await;
                    }
                    Err(e) => warn!(offer_id = %id, error = %e, "Offer refetch failed"),
                }
            }
            Err(e) => warn!(offer_id = %id, error = %e, "Offer status apply failed"),
        }
    }
}
