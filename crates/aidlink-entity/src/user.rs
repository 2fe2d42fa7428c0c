//! User roles and the profile returned by the coordination server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use aidlink_core::types::{Location, UserId};

/// Roles a coordination platform account can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// A person affected by the disaster, posting help requests.
    Victim,
    /// A relief organization posting and managing resource offers.
    Ngo,
    /// A field volunteer assisting deliveries.
    Volunteer,
    /// A government coordination account.
    Government,
    /// A platform administrator.
    Admin,
}

impl UserRole {
    /// Check if this role posts help requests.
    pub fn is_victim(&self) -> bool {
        matches!(self, Self::Victim)
    }

    /// Check if this role manages resource offers.
    pub fn is_ngo(&self) -> bool {
        matches!(self, Self::Ngo)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Victim => "victim",
            Self::Ngo => "ngo",
            Self::Volunteer => "volunteer",
            Self::Government => "government",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = aidlink_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "victim" => Ok(Self::Victim),
            "ngo" => Ok(Self::Ngo),
            "volunteer" => Ok(Self::Volunteer),
            "government" => Ok(Self::Government),
            "admin" => Ok(Self::Admin),
            _ => Err(aidlink_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: victim, ngo, volunteer, government, admin"
            ))),
        }
    }
}

/// A platform account as served by `/auth/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Unique account identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Account role.
    pub role: UserRole,
    /// Home or base-of-operations location.
    pub location: Option<Location>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
