//! Resource offer entity.

pub mod model;
pub mod stats;
pub mod status;

pub use model::{CreateOfferInput, Offer, UpdateOfferInput};
pub use stats::OfferStats;
pub use status::OfferStatus;
