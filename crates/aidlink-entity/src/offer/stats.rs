//! Aggregate counters over a set of offers.

use serde::{Deserialize, Serialize};

use super::model::Offer;
use super::status::OfferStatus;

/// Per-status counters over an offer collection.
///
/// Counters are always recomputed from the collection they describe and
/// never adjusted incrementally, so they cannot drift from the items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferStats {
    /// All offers.
    pub total: usize,
    /// Offers waiting for a match.
    pub pending: usize,
    /// Offers committed to a request.
    pub matched: usize,
    /// Offers delivered.
    pub fulfilled: usize,
    /// Offers that aged out.
    pub expired: usize,
}

impl OfferStats {
    /// Recompute counters from a collection of offers.
    pub fn collect<'a>(offers: impl IntoIterator<Item = &'a Offer>) -> Self {
        let mut stats = Self::default();
        for offer in offers {
            stats.total += 1;
            match offer.status {
                OfferStatus::Pending => stats.pending += 1,
                OfferStatus::Matched => stats.matched += 1,
                OfferStatus::Fulfilled => stats.fulfilled += 1,
                OfferStatus::Expired => stats.expired += 1,
            }
        }
        stats
    }
}
