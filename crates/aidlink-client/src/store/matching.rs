//! Canonical match store.
//!
//! One list of [`Match`] records is the single home of "which offer
//! serves which request"; per-request and per-offer views are filters
//! over it, never separate copies.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use aidlink_core::events::{EventEnvelope, EventKind};
use aidlink_core::traits::Transport;
use aidlink_core::types::{MatchId, OfferId, RequestId};
use aidlink_core::{AppError, AppResult};
use aidlink_entity::lifecycle::ensure_transition;
use aidlink_entity::matching::{Match, MatchCandidate, MatchStats, MatchStatus};

use crate::api::CoordinationApi;
use crate::session::Session;

use super::merge_snapshot;

/// Store for matches involving the current user.
///
/// Open to both roles: victims accept and reject, NGOs fulfill, and
/// both sides read. Each successful mutation emits the matching event.
pub struct MatchStore {
    /// REST gateway.
    gateway: Arc<dyn CoordinationApi>,
    /// Realtime side channel for post-mutation emits.
    transport: Arc<dyn Transport>,
    /// Who is logged in.
    session: Session,
    /// Match records, newest first.
    items: RwLock<Vec<Match>>,
}

impl MatchStore {
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
        }
    }

    /// Fire-and-forget emit of a full match snapshot.
    async fn emit_snapshot(&self, event: EventKind, m: &Match) {
        match serde_json::to_value(m) {
            Ok(payload) => self.transport.emit(event, payload).await,
            Err(e) => warn!(event = %event, error = %e, "Failed to encode match snapshot"),
        }
    }

    /// Candidate offers for a request, as ranked by the server.
    ///
    /// Candidates are ephemeral; nothing is recorded until one is
    /// matched.
    pub async fn find_matches(&self, request_id: RequestId) -> AppResult<Vec<MatchCandidate>> {
        self.gateway.find_matches(request_id).await
    }

    /// Record a match between a request and an offer.
    ///
    /// Idempotent per pair: if this client already holds a match linking
    /// the two, that record is returned instead of creating a duplicate.
    pub async fn create_match(&self, request_id: RequestId, offer_id: OfferId) -> AppResult<Match> {
        let existing = self
            .items
            .read()
            .await
            .iter()
            .find(|m| m.links(request_id, offer_id))
            .cloned();
        if let Some(m) = existing {
            return Ok(m);
        }

        let m = self.gateway.create_match(request_id, offer_id).await?;
        self.merge(m.clone()).await;
        info!(match_id = %m.id, request_id = %request_id, offer_id = %offer_id, "Created match");
        self.emit_snapshot(EventKind::MatchCreated, &m).await;
        Ok(m)
    }

    /// Accept a proposed match.
    pub async fn accept_match(&self, id: MatchId) -> AppResult<Match> {
        if let Some(current) = self.get(id).await {
            ensure_transition("match", current.status, MatchStatus::Accepted)?;
        }
        let accepted = self.gateway.accept_match(id).await?;
        self.merge(accepted.clone()).await;
        info!(match_id = %id, user_id = %self.session.user_id, "Accepted match");
        self.emit_snapshot(EventKind::MatchAccepted, &accepted).await;
        Ok(accepted)
    }

    /// Decline a proposed match.
    pub async fn reject_match(&self, id: MatchId) -> AppResult<Match> {
        if let Some(current) = self.get(id).await {
            ensure_transition("match", current.status, MatchStatus::Rejected)?;
        }
        let rejected = self.gateway.reject_match(id).await?;
        self.merge(rejected.clone()).await;
        info!(match_id = %id, user_id = %self.session.user_id, "Rejected match");
        self.emit_snapshot(EventKind::MatchRejected, &rejected).await;
        Ok(rejected)
    }

    /// Mark an accepted match as delivered.
    pub async fn fulfill_match(&self, id: MatchId) -> AppResult<Match> {
        if let Some(current) = self.get(id).await {
            ensure_transition("match", current.status, MatchStatus::Fulfilled)?;
        }
        let fulfilled = self.gateway.fulfill_match(id).await?;
        self.merge(fulfilled.clone()).await;
        info!(match_id = %id, user_id = %self.session.user_id, "Fulfilled match");
        self.emit_snapshot(EventKind::MatchFulfilled, &fulfilled).await;
        Ok(fulfilled)
    }

    /// Load every match involving the current user.
    pub async fn fetch_my_matches(&self) -> AppResult<Vec<Match>> {
        let matches = self.gateway.my_matches().await?;
        *self.items.write().await = matches.clone();
        Ok(matches)
    }

    /// Matches recorded against one request, merged into the canonical
    /// list and returned.
    pub async fn fetch_for_request(&self, request_id: RequestId) -> AppResult<Vec<Match>> {
        let fetched = self.gateway.matches_by_request(request_id).await?;
        for m in &fetched {
            self.merge(m.clone()).await;
        }
        Ok(fetched)
    }

    /// Matches recorded against one offer, merged into the canonical
    /// list and returned.
    pub async fn fetch_for_offer(&self, offer_id: OfferId) -> AppResult<Vec<Match>> {
        let fetched = self.gateway.matches_by_offer(offer_id).await?;
        for m in &fetched {
            self.merge(m.clone()).await;
        }
        Ok(fetched)
    }

    /// Per-status counters, recomputed from the list.
    pub async fn stats(&self) -> MatchStats {
        MatchStats::collect(self.items.read().await.iter())
    }

    /// Merge a pushed snapshot into local state.
    pub(crate) async fn merge(&self, incoming: Match) -> bool {
        let mut items = self.items.write().await;
        merge_snapshot(&mut items, incoming, |m| m.id, |m| m.updated_at)
    }

    /// Apply a match-flavored envelope, returning the decoded snapshot
    /// so the caller can react to the linked request and offer.
    pub(crate) async fn apply_event(&self, envelope: &EventEnvelope) -> Option<Match> {
        match envelope.decode::<Match>() {
            Ok(m) => {
                self.merge(m.clone()).await;
                Some(m)
            }
            Err(e) => {
                warn!(event = %envelope.event, error = %e, "Dropping malformed match envelope");
                None
            }
        }
    }

    /// Apply an event-induced status transition to a local match.
    pub(crate) async fn apply_status(&self, id: MatchId, status: MatchStatus) -> AppResult<()> {
        let mut items = self.items.write().await;
        let m = items
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| AppError::not_found(format!("match {id} is not held locally")))?;
        let next = ensure_transition("match", m.status, status)?;
        if next != m.status {
            m.status = next;
            m.updated_at = chrono::Utc::now();
        }
        Ok(())
    }

    /// Snapshot of all matches.
    pub async fn matches(&self) -> Vec<Match> {
        self.items.read().await.clone()
    }

    /// One match by id, from local state.
    pub async fn get(&self, id: MatchId) -> Option<Match> {
        self.items.read().await.iter().find(|m| m.id == id).cloned()
    }

    /// Local matches for one request. Derived view, never a copy.
    pub async fn for_request(&self, request_id: RequestId) -> Vec<Match> {
        self.items
            .read()
            .await
            .iter()
            .filter(|m| m.request_id == request_id)
            .cloned()
            .collect()
    }

    /// Local matches for one offer. Derived view, never a copy.
    pub async fn for_offer(&self, offer_id: OfferId) -> Vec<Match> {
        self.items
            .read()
            .await
            .iter()
            .filter(|m| m.offer_id == offer_id)
            .cloned()
            .collect()
    }
}
