//! Resource categories and urgency levels shared by requests and offers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of relief resource being requested or offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// Food and water supplies.
    Food,
    /// Temporary shelter or housing.
    Shelter,
    /// Medical supplies or treatment.
    Medical,
    /// Evacuation or goods transport.
    Transport,
    /// Anything that does not fit the other categories.
    Other,
}

impl ResourceType {
    /// Return the category as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Shelter => "shelter",
            Self::Medical => "medical",
            Self::Transport => "transport",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = aidlink_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "shelter" => Ok(Self::Shelter),
            "medical" => Ok(Self::Medical),
            "transport" => Ok(Self::Transport),
            "other" => Ok(Self::Other),
            _ => Err(aidlink_core::AppError::validation(format!(
                "Invalid resource type: '{s}'. Expected one of: food, shelter, medical, transport, other"
            ))),
        }
    }
}

/// How urgently a request must be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    /// Can wait days.
    Low,
    /// Should be served within a day.
    Medium,
    /// Should be served within hours.
    High,
    /// Life-threatening, serve immediately.
    Critical,
}

impl UrgencyLevel {
    /// Return the numeric urgency (higher = more urgent).
    pub fn numeric_priority(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }

    /// Return the urgency as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = aidlink_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(aidlink_core::AppError::validation(format!(
                "Invalid urgency level: '{s}'. Expected one of: low, medium, high, critical"
            ))),
        }
    }
}
