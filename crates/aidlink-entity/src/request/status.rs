//! Help request status lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::lifecycle::StatusLifecycle;

/// Status of a help request.
///
/// ```text
/// pending ──> matched ──> accepted ──> fulfilled
///    │           │
///    └───────────┴──> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Posted, waiting for a matching offer.
    Pending,
    /// At least one match exists, awaiting the victim's decision.
    Matched,
    /// The victim accepted a match; delivery is underway.
    Accepted,
    /// The need was met.
    Fulfilled,
    /// Withdrawn by the victim.
    Cancelled,
}

impl RequestStatus {
    /// Check if the request can still be edited by its owner.
    pub fn allows_edit(&self) -> bool {
        matches!(self, Self::Pending | Self::Matched)
    }

    /// Check if the request is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        StatusLifecycle::is_terminal(self)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Matched => "matched",
            Self::Accepted => "accepted",
            Self::Fulfilled => "fulfilled",
            Self::Cancelled => "cancelled",
        }
    }
}

impl StatusLifecycle for RequestStatus {
    fn successors(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Matched, Self::Cancelled],
            Self::Matched => &[Self::Accepted, Self::Cancelled],
            Self::Accepted => &[Self::Fulfilled],
            Self::Fulfilled => &[],
            Self::Cancelled => &[],
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = aidlink_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "matched" => Ok(Self::Matched),
            "accepted" => Ok(Self::Accepted),
            "fulfilled" => Ok(Self::Fulfilled),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(aidlink_core::AppError::validation(format!(
                "Invalid request status: '{s}'"
            ))),
        }
    }
}
