//! # aidlink-core
//!
//! Core crate for AidLink. Contains traits, configuration schemas,
//! typed identifiers, the wire event catalog, and the unified error
//! system shared by every other crate in the workspace.
//!
//! This crate has **no** internal dependencies on other AidLink crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
