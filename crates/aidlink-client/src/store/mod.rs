//! Per-aggregate stores mirroring confirmed server state.
//!
//! Each store owns one list of entity snapshots plus the operations the
//! matching REST resource exposes. Mutations round-trip through the
//! gateway and apply the confirmed snapshot; pushed envelopes merge via
//! [`merge_snapshot`], which makes event application commutative for
//! out-of-order and duplicated deliveries.

pub mod matching;
pub mod notifications;
pub mod offers;
pub mod requests;

pub use matching::MatchStore;
pub use notifications::NotificationStore;
pub use offers::OfferStore;
pub use requests::RequestStore;

use chrono::{DateTime, Utc};

/// Merge one full snapshot into a snapshot list.
///
/// An unknown id is inserted at the front (lists render newest first).
/// A known id is replaced only when the incoming snapshot is strictly
/// newer; stale and duplicate deliveries are no-ops. Returns whether
/// the list changed.
pub(crate) fn merge_snapshot<T, I>(
    items: &mut Vec<T>,
    incoming: T,
    id_of: impl Fn(&T) -> I,
    updated_at_of: impl Fn(&T) -> DateTime<Utc>,
) -> bool
where
    I: PartialEq,
{
    let incoming_id = id_of(&incoming);
    match items.iter().position(|item| id_of(item) == incoming_id) {
        Some(pos) => {
            if updated_at_of(&incoming) > updated_at_of(&items[pos]) {
                items[pos] = incoming;
                true
            } else {
                false
            }
        }
        None => {
            items.insert(0, incoming);
            true
        }
    }
}
