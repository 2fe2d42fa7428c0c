//! Explicit status lifecycles for the request, offer, and match
//! aggregates.
//!
//! Each status enum declares its legal successors; everything else is
//! rejected with a `Transition` error. Re-applying the current status is
//! accepted as a no-op because pushed events may be delivered more than
//! once.

use std::fmt;

use aidlink_core::AppError;
use aidlink_core::result::AppResult;

/// A status enum with an explicit transition table.
pub trait StatusLifecycle: Copy + PartialEq + fmt::Display + Sized + 'static {
    /// Statuses directly reachable from `self`.
    fn successors(&self) -> &'static [Self];

    /// Check whether `next` is directly reachable from `self`.
    fn can_transition_to(&self, next: Self) -> bool {
        self.successors().contains(&next)
    }

    /// Check if the status is terminal (no further transitions).
    fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }
}

/// Validate a status change for one entity.
///
/// Returns the new status on success so call sites can assign it in one
/// expression. `from == to` is a no-op and always succeeds.
pub fn ensure_transition<S: StatusLifecycle>(entity: &str, from: S, to: S) -> AppResult<S> {
    if from == to || from.can_transition_to(to) {
        Ok(to)
    } else {
        Err(AppError::transition(format!(
            "{entity} status cannot change from {from} to {to}"
        )))
    }
}
