//! Core traits defined in `aidlink-core` and implemented by other crates.

pub mod transport;

pub use transport::Transport;
