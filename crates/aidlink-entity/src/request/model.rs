//! Help request entity model and input payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use aidlink_core::types::{Location, MatchId, RequestId, UserId};

use crate::resource::{ResourceType, UrgencyLevel};

use super::status::RequestStatus;

/// A victim's help request as served by the coordination server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Unique request identifier.
    pub id: RequestId,
    /// The victim who posted the request.
    pub victim_id: UserId,
    /// Category of resource needed.
    pub resource_type: ResourceType,
    /// What is needed and for whom.
    pub description: String,
    /// How many units are needed.
    pub quantity: u32,
    /// How urgently the need must be served.
    pub urgency: UrgencyLevel,
    /// Where the resource is needed.
    pub location: Location,
    /// Free-form extra context (access notes, contact hints).
    #[serde(default)]
    pub additional_info: Option<String>,
    /// Current lifecycle status.
    pub status: RequestStatus,
    /// Matches recorded against this request.
    #[serde(default)]
    pub match_ids: Vec<MatchId>,
    /// Optional hard deadline after which the request is moot.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// Last server-side modification time; drives snapshot merging.
    pub updated_at: DateTime<Utc>,
}

impl Request {
    /// Check if the owner can still edit the request.
    pub fn is_editable(&self) -> bool {
        self.status.allows_edit()
    }

    /// Check if the request is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Check if a given match is recorded against this request.
    pub fn has_match(&self, match_id: &MatchId) -> bool {
        self.match_ids.contains(match_id)
    }
}

/// Payload for creating a help request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestInput {
    /// Category of resource needed.
    pub resource_type: ResourceType,
    /// What is needed and for whom.
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    /// How many units are needed.
    #[validate(range(min = 1))]
    pub quantity: u32,
    /// How urgently the need must be served.
    pub urgency: UrgencyLevel,
    /// Where the resource is needed.
    pub location: Location,
    /// Free-form extra context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    /// Optional hard deadline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Payload for editing a help request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestInput {
    /// New description.
    #[validate(length(min = 1, max = 2000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New quantity.
    #[validate(range(min = 1))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    /// New urgency.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<UrgencyLevel>,
    /// New location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// New extra context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}
