//! Aggregate counters over a set of matches.

use serde::{Deserialize, Serialize};

use super::model::Match;
use super::status::MatchStatus;

/// Per-status counters over a match collection, recomputed on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    /// All matches.
    pub total: usize,
    /// Matches awaiting a decision.
    pub pending: usize,
    /// Matches confirmed by the victim.
    pub accepted: usize,
    /// Matches declined by the victim.
    pub rejected: usize,
    /// Matches delivered end to end.
    pub fulfilled: usize,
}

impl MatchStats {
    /// Recompute counters from a collection of matches.
    pub fn collect<'a>(matches: impl IntoIterator<Item = &'a Match>) -> Self {
        let mut stats = Self::default();
        for m in matches {
            stats.total += 1;
            match m.status {
                MatchStatus::Pending => stats.pending += 1,
                MatchStatus::Accepted => stats.accepted += 1,
                MatchStatus::Rejected => stats.rejected += 1,
                MatchStatus::Fulfilled => stats.fulfilled += 1,
            }
        }
        stats
    }
}
