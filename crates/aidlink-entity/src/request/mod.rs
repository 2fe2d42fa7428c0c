//! Help request entity.

pub mod model;
pub mod status;

pub use model::{CreateRequestInput, Request, UpdateRequestInput};
pub use status::RequestStatus;
