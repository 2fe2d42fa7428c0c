//! The authenticated session carried by every store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aidlink_core::events::Room;
use aidlink_core::types::UserId;
use aidlink_entity::user::UserRole;

use crate::api::AuthSession;

/// Who is logged in.
///
/// Built once at login and cloned into each store; role gates and room
/// membership both key off it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The authenticated user.
    pub user_id: UserId,
    /// Display name, cached for logs and CLI output.
    pub username: String,
    /// Account role.
    pub role: UserRole,
    /// Bearer token backing this session.
    pub token: String,
    /// When the session was established client-side.
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Create a session from its parts.
    pub fn new(
        user_id: UserId,
        username: impl Into<String>,
        role: UserRole,
        token: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            role,
            token: token.into(),
            started_at: Utc::now(),
        }
    }

    /// Build a session from an auth endpoint response.
    pub fn from_auth(auth: &AuthSession) -> Self {
        Self::new(
            auth.user.id,
            auth.user.name.clone(),
            auth.user.role,
            auth.token.clone(),
        )
    }

    /// Check if this session belongs to a victim account.
    pub fn is_victim(&self) -> bool {
        self.role.is_victim()
    }

    /// Check if this session belongs to an NGO account.
    pub fn is_ngo(&self) -> bool {
        self.role.is_ngo()
    }

    /// The personal notification room for this user.
    pub fn user_room(&self) -> Room {
        Room::User(self.user_id)
    }

    /// The role room for this user, when the role has one.
    pub fn role_room(&self) -> Option<Room> {
        match self.role {
            UserRole::Victim => Some(Room::Victim(self.user_id)),
            UserRole::Ngo => Some(Room::Ngo(self.user_id)),
            _ => None,
        }
    }
}
