//! Victim-side help request store.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};
use validator::Validate;

use aidlink_core::events::EventEnvelope;
use aidlink_core::types::{OfferId, RequestId};
use aidlink_core::{AppError, AppResult};
use aidlink_entity::lifecycle::ensure_transition;
use aidlink_entity::matching::{Match, MatchStatus};
use aidlink_entity::request::{CreateRequestInput, Request, RequestStatus, UpdateRequestInput};

use crate::api::CoordinationApi;
use crate::session::Session;

use super::merge_snapshot;

/// Store for the current victim's help requests.
///
/// Every operation is gated to victim sessions. Mutations round-trip
/// through the gateway; the confirmed snapshot is what lands in local
/// state.
pub struct RequestStore {
    /// REST gateway.
    gateway: Arc<dyn CoordinationApi>,
    /// Who is logged in.
    session: Session,
    /// Request snapshots, newest first.
    items: RwLock<Vec<Request>>,
    /// Request selected for detail views.
    current: RwLock<Option<RequestId>>,
}

impl RequestStore {
    /// Create a store bound to one session.
    pub fn new(gateway: Arc<dyn CoordinationApi>, session: Session) -> Self {
        Self {
            gateway,
            session,
            items: RwLock::new(Vec::new()),
            current: RwLock::new(None),
        }
    }

    fn ensure_victim(&self) -> AppResult<()> {
        if self.session.is_victim() {
            Ok(())
        } else {
            Err(AppError::authorization(
                "Access denied. Only victims can view requests.",
            ))
        }
    }

    /// Status of a request, preferring local state over a refetch.
    async fn status_of(&self, id: RequestId) -> AppResult<RequestStatus> {
        let local = self
            .items
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.status);
        match local {
            Some(status) => Ok(status),
            None => Ok(self.gateway.get_request(id).await?.status),
        }
    }

    /// Find the match linking a request to an offer, creating it if the
    /// server has not recorded one yet.
    async fn ensure_match(&self, request_id: RequestId, offer_id: OfferId) -> AppResult<Match> {
        let existing = self.gateway.matches_by_request(request_id).await?;
        if let Some(m) = existing.into_iter().find(|m| m.offer_id == offer_id) {
            return Ok(m);
        }
        self.gateway.create_match(request_id, offer_id).await
    }

    /// Replace the full request list from the server.
    pub async fn fetch_requests(&self) -> AppResult<Vec<Request>> {
        self.ensure_victim()?;
        let requests = self.gateway.list_requests().await?;
        *self.items.write().await = requests.clone();
        Ok(requests)
    }

    /// Fetch one request and select it for detail views.
    pub async fn fetch_request(&self, id: RequestId) -> AppResult<Request> {
        self.ensure_victim()?;
        let request = self.gateway.get_request(id).await?;
        self.merge(request.clone()).await;
        *self.current.write().await = Some(id);
        Ok(request)
    }

    /// Create a request and prepend the confirmed snapshot.
    pub async fn create_request(&self, input: &CreateRequestInput) -> AppResult<Request> {
        self.ensure_victim()?;
        input
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid request payload: {e}")))?;

        let request = self.gateway.create_request(input).await?;
        self.items.write().await.insert(0, request.clone());
        info!(request_id = %request.id, resource = %request.resource_type, "Created help request");
        Ok(request)
    }

    /// Edit a request while its status still permits edits.
    pub async fn update_request(
        &self,
        id: RequestId,
        input: &UpdateRequestInput,
    ) -> AppResult<Request> {
        self.ensure_victim()?;
        input
            .validate()
            .map_err(|e| AppError::validation(format!("Invalid request payload: {e}")))?;

        let status = self.status_of(id).await?;
        if !status.allows_edit() {
            return Err(AppError::transition(format!(
                "request can only be edited while pending or matched, not {status}"
            )));
        }

        let updated = self.gateway.update_request(id, input).await?;
        self.merge(updated.clone()).await;
        Ok(updated)
    }

    /// Delete a request outright.
    pub async fn delete_request(&self, id: RequestId) -> AppResult<()> {
        self.ensure_victim()?;
        self.gateway.delete_request(id).await?;
        self.items.write().await.retain(|r| r.id != id);
        let mut current = self.current.write().await;
        if *current == Some(id) {
            *current = None;
        }
        info!(request_id = %id, "Deleted help request");
        Ok(())
    }

    /// Withdraw a request before it is accepted.
    pub async fn cancel_request(&self, id: RequestId) -> AppResult<Request> {
        self.ensure_victim()?;
        let status = self.status_of(id).await?;
        ensure_transition("request", status, RequestStatus::Cancelled)?;

        let cancelled = self.gateway.cancel_request(id).await?;
        self.merge(cancelled.clone()).await;
        info!(request_id = %id, "Cancelled help request");
        Ok(cancelled)
    }

    /// Matches recorded against one request. Pure query; local request
    /// status is untouched.
    pub async fn matches_for(&self, id: RequestId) -> AppResult<Vec<Match>> {
        self.ensure_victim()?;
        self.gateway.matches_by_request(id).await
    }

    /// Accept an offer for a request.
    ///
    /// Ensures the pairing exists (creating the match moves both sides
    /// to matched), accepts it, then refetches the request so the
    /// snapshot reflects the server's view of the accept.
    pub async fn accept_offer(
        &self,
        request_id: RequestId,
        offer_id: OfferId,
    ) -> AppResult<Request> {
        self.ensure_victim()?;
        let status = self.status_of(request_id).await?;
        if status.is_terminal() {
            return Err(AppError::transition(format!(
                "cannot accept an offer for a {status} request"
            )));
        }

        let m = self.ensure_match(request_id, offer_id).await?;
        self.gateway.accept_match(m.id).await?;

        let request = self.gateway.get_request(request_id).await?;
        self.merge(request.clone()).await;
        info!(request_id = %request_id, offer_id = %offer_id, "Accepted offer");
        Ok(request)
    }

    /// Decline an offer for a request.
    ///
    /// Mirrors the accept flow: the pairing is ensured first, so
    /// declining a never-matched candidate records the rejection. The
    /// request's own status does not regress.
    pub async fn reject_offer(
        &self,
        request_id: RequestId,
        offer_id: OfferId,
    ) -> AppResult<Match> {
        self.ensure_victim()?;
        let m = self.ensure_match(request_id, offer_id).await?;
        let rejected = self.gateway.reject_match(m.id).await?;
        info!(request_id = %request_id, offer_id = %offer_id, "Rejected offer");
        Ok(rejected)
    }

    /// Mark an accepted request as fulfilled via its accepted match.
    pub async fn fulfill_request(&self, request_id: RequestId) -> AppResult<Request> {
        self.ensure_victim()?;
        let status = self.status_of(request_id).await?;
        ensure_transition("request", status, RequestStatus::Fulfilled)?;

        let matches = self.gateway.matches_by_request(request_id).await?;
        let accepted = matches
            .into_iter()
            .find(|m| m.status == MatchStatus::Accepted)
            .ok_or_else(|| AppError::conflict("request has no accepted match to fulfill"))?;
        self.gateway.fulfill_match(accepted.id).await?;

        let request = self.gateway.get_request(request_id).await?;
        self.merge(request.clone()).await;
        info!(request_id = %request_id, "Fulfilled help request");
        Ok(request)
    }

    /// Merge a pushed snapshot into local state.
    pub(crate) async fn merge(&self, incoming: Request) -> bool {
        let mut items = self.items.write().await;
        merge_snapshot(&mut items, incoming, |r| r.id, |r| r.updated_at)
    }

    /// Apply a request-flavored envelope.
    pub(crate) async fn apply_event(&self, envelope: &EventEnvelope) {
        match envelope.decode::<Request>() {
            Ok(request) => {
                self.merge(request).await;
            }
            Err(e) => {
                warn!(event = %envelope.event, error = %e, "Dropping malformed request envelope");
            }
        }
    }

    /// Apply an event-induced status transition to a local request.
    ///
    /// Used by the reconciler for cascades (a fulfilled offer fulfills
    /// the accepted request). Unknown ids report `NotFound` so callers
    /// can ignore aggregates this client does not hold.
    pub(crate) async fn apply_status(&self, id: RequestId, status: RequestStatus) -> AppResult<()> {
        let mut items = self.items.write().await;
        let request = items
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::not_found(format!("request {id} is not held locally")))?;
        let next = ensure_transition("request", request.status, status)?;
        if next != request.status {
            request.status = next;
            request.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    /// Snapshot of all requests.
    pub async fn requests(&self) -> Vec<Request> {
        self.items.read().await.clone()
    }

    /// One request by id, from local state.
    pub async fn get(&self, id: RequestId) -> Option<Request> {
        self.items.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// The request selected by the last [`RequestStore::fetch_request`].
    pub async fn current(&self) -> Option<Request> {
        let id = (*self.current.read().await)?;
        self.get(id).await
    }
}
