//! CLI command definitions and dispatch.

pub mod auth;
pub mod matches;
pub mod notifications;
pub mod offers;
pub mod requests;
pub mod watch;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use aidlink_client::api::CoordinationApi;
use aidlink_client::client::ReliefClient;
use aidlink_client::http::HttpGateway;
use aidlink_client::session::Session;
use aidlink_core::config::AppConfig;
use aidlink_core::error::AppError;
use aidlink_core::traits::Transport;
use aidlink_realtime::{MemoryTransport, WsTransport};

use crate::output::OutputFormat;

/// AidLink — Disaster Relief Coordination Client
#[derive(Debug, Parser)]
#[command(name = "aidlink", version, about, long_about = None)]
pub struct Cli {
    /// Configuration profile to load (config/<profile>.toml)
    #[arg(short, long, default_value = "development")]
    pub profile: String,

    /// Bearer token (falls back to the AIDLINK_TOKEN environment variable)
    #[arg(short, long)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Account registration and login
    Auth(auth::AuthArgs),
    /// Help request management
    Requests(requests::RequestArgs),
    /// Resource offer management
    Offers(offers::OfferArgs),
    /// Match management
    Matches(matches::MatchArgs),
    /// Notification inbox
    Notifications(notifications::NotificationArgs),
    /// Stream live events to the terminal
    Watch(watch::WatchArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let token = self.token.as_deref();
        match &self.command {
            Commands::Auth(args) => auth::execute(args, &self.profile, token, self.format).await,
            Commands::Requests(args) => {
                requests::execute(args, &self.profile, token, self.format).await
            }
            Commands::Offers(args) => {
                offers::execute(args, &self.profile, token, self.format).await
            }
            Commands::Matches(args) => {
                matches::execute(args, &self.profile, token, self.format).await
            }
            Commands::Notifications(args) => {
                notifications::execute(args, &self.profile, token, self.format).await
            }
            Commands::Watch(args) => watch::execute(args, &self.profile, token).await,
        }
    }
}

/// Helper: resolve the bearer token from the flag or the environment
pub fn resolve_token(flag: Option<&str>) -> Result<String, AppError> {
    if let Some(token) = flag {
        return Ok(token.to_string());
    }
    std::env::var("AIDLINK_TOKEN").map_err(|_| {
        AppError::authentication("No token provided. Login first or set AIDLINK_TOKEN.")
    })
}

/// Helper: unauthenticated gateway for the auth commands
pub fn open_gateway(profile: &str) -> Result<(AppConfig, Arc<HttpGateway>), AppError> {
    let config = AppConfig::load(profile)?;
    let gateway = Arc::new(HttpGateway::new(&config.api)?);
    Ok((config, gateway))
}

/// Helper: authenticated gateway plus the session behind the token
async fn authenticate(
    profile: &str,
    token: Option<&str>,
) -> Result<(AppConfig, Arc<HttpGateway>, Session), AppError> {
    let (config, gateway) = open_gateway(profile)?;
    let token = resolve_token(token)?;
    gateway.set_token(&token);
    let user = gateway.current_user().await?;
    let session = Session::new(user.id, user.name, user.role, token);
    Ok((config, gateway, session))
}

/// Helper: client for one-shot commands, backed by the in-memory transport
pub async fn client(profile: &str, token: Option<&str>) -> Result<ReliefClient, AppError> {
    let (config, gateway, session) = authenticate(profile, token).await?;
    let transport: Arc<dyn Transport> =
        Arc::new(MemoryTransport::new(config.realtime.event_buffer_size));
    Ok(ReliefClient::new(gateway, transport, session))
}

/// Helper: client bound to the live WebSocket transport
pub async fn live_client(profile: &str, token: Option<&str>) -> Result<ReliefClient, AppError> {
    let (config, gateway, session) = authenticate(profile, token).await?;
    let transport: Arc<dyn Transport> = Arc::new(WsTransport::new(&config.realtime));
    Ok(ReliefClient::new(gateway, transport, session))
}
