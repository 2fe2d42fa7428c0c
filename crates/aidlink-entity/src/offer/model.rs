//! Resource offer entity model and input payloads.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use aidlink_core::types::{Location, MatchId, OfferId, UserId};

use crate::resource::ResourceType;

use super::status::OfferStatus;

/// An NGO's resource offer as served by the coordination server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    /// Unique offer identifier.
    pub id: OfferId,
    /// The NGO that posted the offer.
    pub ngo_id: UserId,
    /// Category of resource on offer.
    pub resource_type: ResourceType,
    /// What is on offer.
    pub description: String,
    /// How many units are available.
    pub quantity: u32,
    /// Where the resource is staged.
    pub location: Location,
    /// How long the offer stays valid, in hours from creation.
    pub expiry_hours: u32,
    /// Current lifecycle status.
    pub status: OfferStatus,
    /// Matches recorded against this offer.
    #[serde(default)]
    pub match_ids: Vec<MatchId>,
    /// When the offer was created.
    pub created_at: DateTime<Utc>,
    /// Last server-side modification time; drives snapshot merging.
    pub updated_at: DateTime<Utc>,
}

impl Offer {
    /// The instant this offer ages out if still unmatched.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + Duration::hours(i64::from(self.expiry_hours))
    }

    /// Check if the offer has aged past its expiry window.
    ///
    /// Only pending offers expire; a matched offer is committed and stays
    /// live however old it gets.
    pub fn is_expired_by(&self, now: DateTime<Utc>) -> bool {
        self.status == OfferStatus::Pending && now >= self.expires_at()
    }

    /// Check if the owner can still edit the offer.
    pub fn is_editable(&self) -> bool {
        self.status.allows_edit()
    }

    /// Check if a given match is recorded against this offer.
    pub fn has_match(&self, match_id: &MatchId) -> bool {
        self.match_ids.contains(match_id)
    }
}

/// Payload for creating a resource offer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferInput {
    /// Category of resource on offer.
    pub resource_type: ResourceType,
    /// What is on offer.
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    /// How many units are available.
    #[validate(range(min = 1))]
    pub quantity: u32,
    /// Where the resource is staged.
    pub location: Location,
    /// Validity window in hours (max one week).
    #[validate(range(min = 1, max = 168))]
    pub expiry_hours: u32,
}

/// Payload for editing a resource offer. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOfferInput {
    /// New description.
    #[validate(length(min = 1, max = 2000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New quantity.
    #[validate(range(min = 1))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// New staging location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// New validity window in hours.
    #[validate(range(min = 1, max = 168))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_hours: Option<u32>,
}
