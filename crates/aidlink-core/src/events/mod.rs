//! Wire event catalog for the realtime push channel.
//!
//! Every event pushed by the coordination server arrives as an
//! [`EventEnvelope`] naming one [`EventKind`] and carrying a full entity
//! snapshot as its payload. Envelopes are notifications only; the REST
//! API remains the authoritative source of state.

pub mod room;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use room::Room;

use crate::error::AppError;
use crate::result::AppResult;

/// Every event name spoken on the push channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A help request was created.
    NewRequest,
    /// A help request's fields were edited.
    RequestUpdated,
    /// A help request gained a match.
    RequestMatched,
    /// A help request's top-level status changed.
    RequestStatusChanged,
    /// A resource offer was created.
    NewOffer,
    /// A resource offer's fields were edited.
    OfferUpdated,
    /// A resource offer's status changed.
    OfferStatusChanged,
    /// A resource offer gained a match.
    OfferMatched,
    /// A resource offer expired while unmatched.
    OfferExpired,
    /// A resource offer was delivered.
    OfferFulfilled,
    /// A match between a request and an offer was created.
    MatchCreated,
    /// A match was accepted by the requesting victim.
    MatchAccepted,
    /// A match was declined by the requesting victim.
    MatchRejected,
    /// A match was fulfilled end to end.
    MatchFulfilled,
    /// A single notification addressed to one user.
    Notification,
    /// A broadcast system alert.
    SystemAlert,
    /// An emergency dispatch ordering an inbox refresh.
    EmergencyDispatch,
}

impl EventKind {
    /// The wire name of this event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewRequest => "new_request",
            Self::RequestUpdated => "request_updated",
            Self::RequestMatched => "request_matched",
            Self::RequestStatusChanged => "request_status_changed",
            Self::NewOffer => "new_offer",
            Self::OfferUpdated => "offer_updated",
            Self::OfferStatusChanged => "offer_status_changed",
            Self::OfferMatched => "offer_matched",
            Self::OfferExpired => "offer_expired",
            Self::OfferFulfilled => "offer_fulfilled",
            Self::MatchCreated => "match_created",
            Self::MatchAccepted => "match_accepted",
            Self::MatchRejected => "match_rejected",
            Self::MatchFulfilled => "match_fulfilled",
            Self::Notification => "notification",
            Self::SystemAlert => "system_alert",
            Self::EmergencyDispatch => "emergency_dispatch",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_request" => Ok(Self::NewRequest),
            "request_updated" => Ok(Self::RequestUpdated),
            "request_matched" => Ok(Self::RequestMatched),
            "request_status_changed" => Ok(Self::RequestStatusChanged),
            "new_offer" => Ok(Self::NewOffer),
            "offer_updated" => Ok(Self::OfferUpdated),
            "offer_status_changed" => Ok(Self::OfferStatusChanged),
            "offer_matched" => Ok(Self::OfferMatched),
            "offer_expired" => Ok(Self::OfferExpired),
            "offer_fulfilled" => Ok(Self::OfferFulfilled),
            "match_created" => Ok(Self::MatchCreated),
            "match_accepted" => Ok(Self::MatchAccepted),
            "match_rejected" => Ok(Self::MatchRejected),
            "match_fulfilled" => Ok(Self::MatchFulfilled),
            "notification" => Ok(Self::Notification),
            "system_alert" => Ok(Self::SystemAlert),
            "emergency_dispatch" => Ok(Self::EmergencyDispatch),
            other => Err(AppError::validation(format!("unknown event name: {other}"))),
        }
    }
}

/// Wrapper for every event pushed over the realtime channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    /// Unique envelope id, used for deduplication of redeliveries.
    pub id: Uuid,
    /// The event name.
    pub event: EventKind,
    /// The room this envelope was delivered through, when scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Full entity snapshot (or alert body) carried by the event.
    pub payload: serde_json::Value,
    /// Server-side timestamp of the event.
    pub occurred_at: DateTime<Utc>,
}

impl EventEnvelope {
    /// Create a new envelope stamped now.
    pub fn new(event: EventKind, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            event,
            room: None,
            payload,
            occurred_at: Utc::now(),
        }
    }

    /// Attach a delivery room to the envelope.
    pub fn with_room(mut self, room: &Room) -> Self {
        self.room = Some(room.to_string());
        self
    }

    /// Decode the payload into a typed entity snapshot.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_value(self.payload.clone()).map_err(|e| {
            AppError::serialization(format!(
                "malformed {} payload: {e}",
                self.event.as_str()
            ))
        })
    }
}
