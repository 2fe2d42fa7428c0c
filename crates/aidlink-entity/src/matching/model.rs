//! Match entity model.
//!
//! A match is the first-class link between one request and one offer.
//! Request and offer snapshots carry only match ids; the pairing itself
//! lives here, so "which offer serves which request" is stored exactly
//! once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aidlink_core::types::{MatchId, OfferId, RequestId};

use super::status::MatchStatus;

/// A pairing of one help request with one resource offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Unique match identifier.
    pub id: MatchId,
    /// The request being served.
    pub request_id: RequestId,
    /// The offer serving it.
    pub offer_id: OfferId,
    /// Current lifecycle status.
    pub status: MatchStatus,
    /// When the match was proposed.
    pub created_at: DateTime<Utc>,
    /// Last server-side modification time; drives snapshot merging.
    pub updated_at: DateTime<Utc>,
}

impl Match {
    /// The request/offer pair this match links.
    pub fn pair(&self) -> (RequestId, OfferId) {
        (self.request_id, self.offer_id)
    }

    /// Check if this match links the given request and offer.
    pub fn links(&self, request_id: RequestId, offer_id: OfferId) -> bool {
        self.request_id == request_id && self.offer_id == offer_id
    }
}

/// A candidate offer proposed for a request, with its distance from the
/// request location when the server computed one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    /// The candidate offer snapshot.
    pub offer: crate::offer::Offer,
    /// Distance from the request location in kilometers.
    #[serde(default)]
    pub distance_km: Option<f64>,
}
