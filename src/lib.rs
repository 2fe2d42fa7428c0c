//! AidLink — Disaster Relief Coordination Client
//!
//! Facade crate that wires the workspace together: configuration and
//! the event catalog from `aidlink-core`, domain entities from
//! `aidlink-entity`, the realtime transports from `aidlink-realtime`,
//! and the stores plus [`ReliefClient`] from `aidlink-client`.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

pub use aidlink_client as client;
pub use aidlink_core as core;
pub use aidlink_entity as entity;
pub use aidlink_realtime as realtime;

pub use aidlink_client::api::LoginInput;
pub use aidlink_client::{CoordinationApi, HttpGateway, ReliefClient, Session};
pub use aidlink_core::config::AppConfig;
pub use aidlink_core::traits::Transport;
pub use aidlink_core::{AppError, AppResult};
pub use aidlink_realtime::{MemoryTransport, WsTransport};

/// Initialize tracing/logging
pub fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Log in and build a fully wired client on the live WebSocket transport.
pub async fn login(config: &AppConfig, input: &LoginInput) -> AppResult<ReliefClient> {
    tracing::info!("Starting AidLink client v{}", env!("CARGO_PKG_VERSION"));

    let gateway = Arc::new(HttpGateway::new(&config.api)?);
    let auth = gateway.login(input).await?;
    let session = Session::from_auth(&auth);
    tracing::info!(user_id = %session.user_id, role = %session.role, "Authenticated");

    let transport: Arc<dyn Transport> = Arc::new(WsTransport::new(&config.realtime));
    Ok(ReliefClient::new(gateway, transport, session))
}

/// Build a fully wired client from an existing bearer token.
pub async fn resume(config: &AppConfig, token: impl Into<String>) -> AppResult<ReliefClient> {
    let gateway = Arc::new(HttpGateway::new(&config.api)?);
    let token = token.into();
    gateway.set_token(token.clone());

    let user = gateway.current_user().await?;
    let session = Session::new(user.id, user.name, user.role, token);
    tracing::info!(user_id = %session.user_id, role = %session.role, "Session resumed");

    let transport: Arc<dyn Transport> = Arc::new(WsTransport::new(&config.realtime));
    Ok(ReliefClient::new(gateway, transport, session))
}
