//! Request/offer match entity.

pub mod model;
pub mod stats;
pub mod status;

pub use model::{Match, MatchCandidate};
pub use stats::MatchStats;
pub use status::MatchStatus;
