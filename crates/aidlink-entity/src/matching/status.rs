//! Match status lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::lifecycle::StatusLifecycle;

/// Status of a match between a request and an offer.
///
/// ```text
/// pending ──> accepted ──> fulfilled
///    │
///    └──> rejected
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Proposed, awaiting the victim's decision.
    Pending,
    /// Confirmed by the victim; delivery is underway.
    Accepted,
    /// Declined by the victim.
    Rejected,
    /// Delivery completed.
    Fulfilled,
}

impl MatchStatus {
    /// Check if the match is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        StatusLifecycle::is_terminal(self)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Fulfilled => "fulfilled",
        }
    }
}

impl StatusLifecycle for MatchStatus {
    fn successors(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Accepted, Self::Rejected],
            Self::Accepted => &[Self::Fulfilled],
            Self::Rejected => &[],
            Self::Fulfilled => &[],
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = aidlink_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "fulfilled" => Ok(Self::Fulfilled),
            _ => Err(aidlink_core::AppError::validation(format!(
                "Invalid match status: '{s}'"
            ))),
        }
    }
}
