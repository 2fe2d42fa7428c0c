//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aidlink_core::types::{NotificationId, UserId};

/// Category of an inbox notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// An ordinary per-user notification.
    Generic,
    /// A broadcast alert from the coordination center.
    SystemAlert,
    /// An emergency dispatch affecting this user.
    EmergencyDispatch,
}

impl NotificationKind {
    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::SystemAlert => "system_alert",
            Self::EmergencyDispatch => "emergency_dispatch",
        }
    }
}

/// A notification in a user's inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The recipient user.
    pub user_id: UserId,
    /// Notification category.
    #[serde(default = "default_kind")]
    pub kind: NotificationKind,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Optional deep link into the app.
    #[serde(default)]
    pub link: Option<String>,
    /// Whether the user has read this notification.
    #[serde(default)]
    pub read: bool,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Check if the notification is still unread.
    pub fn is_unread(&self) -> bool {
        !self.read
    }
}

fn default_kind() -> NotificationKind {
    NotificationKind::Generic
}
