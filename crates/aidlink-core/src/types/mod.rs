//! Shared type definitions used across the AidLink workspace.

pub mod geo;
pub mod id;
pub mod response;

pub use geo::{GeoPoint, Location};
pub use id::{MatchId, NotificationId, OfferId, RequestId, UserId};
pub use response::{ApiAck, ApiResponse};
