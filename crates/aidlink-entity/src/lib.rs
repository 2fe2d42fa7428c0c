//! # aidlink-entity
//!
//! Domain entity models for AidLink. Every struct in this crate mirrors
//! an entity served by the coordination server or a domain value object.
//! All entities derive `Debug`, `Clone`, `Serialize`, and `Deserialize`
//! and use the server's camelCase field names on the wire.
//!
//! Status enums implement [`lifecycle::StatusLifecycle`], which makes the
//! legal transitions of each aggregate an explicit, testable table.

pub mod lifecycle;
pub mod matching;
pub mod notification;
pub mod offer;
pub mod request;
pub mod resource;
pub mod user;
