//! Resource offer status lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::lifecycle::StatusLifecycle;

/// Status of a resource offer.
///
/// ```text
/// pending ──> matched ──> fulfilled
///    │
///    └──> expired
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    /// Posted, available for matching.
    Pending,
    /// Committed to at least one request.
    Matched,
    /// Delivered.
    Fulfilled,
    /// Aged out while unmatched.
    Expired,
}

impl OfferStatus {
    /// Check if the offer can still be edited by its owner.
    pub fn allows_edit(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Check if the offer is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        StatusLifecycle::is_terminal(self)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Matched => "matched",
            Self::Fulfilled => "fulfilled",
            Self::Expired => "expired",
        }
    }
}

impl StatusLifecycle for OfferStatus {
    fn successors(&self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Matched, Self::Expired],
            Self::Matched => &[Self::Fulfilled],
            Self::Fulfilled => &[],
            Self::Expired => &[],
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OfferStatus {
    type Err = aidlink_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "matched" => Ok(Self::Matched),
            "fulfilled" => Ok(Self::Fulfilled),
            "expired" => Ok(Self::Expired),
            _ => Err(aidlink_core::AppError::validation(format!(
                "Invalid offer status: '{s}'"
            ))),
        }
    }
}
