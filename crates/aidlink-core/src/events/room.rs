//! Broadcast room names for the realtime push channel.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::UserId;

/// A named broadcast room on the coordination server.
///
/// Rooms scope event delivery: a client only receives envelopes for
/// rooms it has joined. The wire form is the underscore-joined name,
/// e.g. `victim_5f3a...` or `map_updates`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Room {
    /// Personal room for direct notifications.
    User(UserId),
    /// Role room for a victim's request events.
    Victim(UserId),
    /// Role room for an NGO's offer events.
    Ngo(UserId),
    /// Shared feed of geo events for map views.
    MapUpdates,
}

impl Room {
    /// Parse a wire room name.
    pub fn parse(s: &str) -> Result<Self, AppError> {
        if s == "map_updates" {
            return Ok(Self::MapUpdates);
        }
        let (prefix, id) = s
            .split_once('_')
            .ok_or_else(|| AppError::validation(format!("malformed room name: {s}")))?;
        let user_id: UserId = id
            .parse()
            .map_err(|_| AppError::validation(format!("malformed room id in: {s}")))?;
        match prefix {
            "user" => Ok(Self::User(user_id)),
            "victim" => Ok(Self::Victim(user_id)),
            "ngo" => Ok(Self::Ngo(user_id)),
            other => Err(AppError::validation(format!("unknown room prefix: {other}"))),
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user_{id}"),
            Self::Victim(id) => write!(f, "victim_{id}"),
            Self::Ngo(id) => write!(f, "ngo_{id}"),
            Self::MapUpdates => write!(f, "map_updates"),
        }
    }
}

impl FromStr for Room {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Room> for String {
    fn from(room: Room) -> String {
        room.to_string()
    }
}

impl TryFrom<String> for Room {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}
