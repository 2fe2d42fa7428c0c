//! Help request management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use aidlink_core::error::AppError;
use aidlink_core::types::{Location, OfferId, RequestId};
use aidlink_entity::request::{CreateRequestInput, Request, UpdateRequestInput};
use aidlink_entity::resource::{ResourceType, UrgencyLevel};

use crate::output::{self, OutputFormat};

/// Arguments for request commands
#[derive(Debug, Args)]
pub struct RequestArgs {
    /// Request subcommand
    #[command(subcommand)]
    pub command: RequestCommand,
}

/// Request subcommands
#[derive(Debug, Subcommand)]
pub enum RequestCommand {
    /// List your help requests
    List,
    /// Show one request
    Show {
        /// Request id
        id: RequestId,
    },
    /// Post a new help request
    Create {
        /// Resource category (food, shelter, medical, transport, other)
        #[arg(short, long)]
        resource: ResourceType,
        /// What is needed
        #[arg(short, long)]
        description: String,
        /// How many units are needed
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
        /// Urgency (low, medium, high, critical)
        #[arg(short, long, default_value = "medium")]
        urgency: UrgencyLevel,
        /// Latitude of the delivery point
        #[arg(long)]
        lat: f64,
        /// Longitude of the delivery point
        #[arg(long)]
        lon: f64,
        /// Street address or landmark
        #[arg(short, long)]
        address: String,
        /// Extra context (access notes, contact hints)
        #[arg(long)]
        info: Option<String>,
    },
    /// Edit a pending or matched request
    Update {
        /// Request id
        id: RequestId,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New quantity
        #[arg(short, long)]
        quantity: Option<u32>,
        /// New urgency
        #[arg(short, long)]
        urgency: Option<UrgencyLevel>,
    },
    /// Withdraw a request
    Cancel {
        /// Request id
        id: RequestId,
    },
    /// Delete a request outright
    Delete {
        /// Request id
        id: RequestId,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Confirm delivery and close the request
    Fulfill {
        /// Request id
        id: RequestId,
    },
    /// List matches recorded against a request
    Matches {
        /// Request id
        id: RequestId,
    },
    /// Accept a matched offer
    Accept {
        /// Request id
        id: RequestId,
        /// Offer id to accept
        #[arg(short, long)]
        offer: OfferId,
    },
    /// Decline a matched offer
    Reject {
        /// Request id
        id: RequestId,
        /// Offer id to decline
        #[arg(short, long)]
        offer: OfferId,
    },
}

/// Request display row for table output
#[derive(Debug, Serialize, Tabled)]
struct RequestRow {
    /// Request ID
    id: String,
    /// Resource category
    resource: String,
    /// Description
    description: String,
    /// Quantity
    quantity: u32,
    /// Urgency
    urgency: String,
    /// Status
    status: String,
    /// Created at
    created_at: String,
}

impl From<&Request> for RequestRow {
    fn from(r: &Request) -> Self {
        Self {
            id: r.id.to_string(),
            resource: r.resource_type.to_string(),
            description: r.description.clone(),
            quantity: r.quantity,
            urgency: r.urgency.to_string(),
            status: r.status.to_string(),
            created_at: r.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute request commands
pub async fn execute(
    args: &RequestArgs,
    profile: &str,
    token: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = super::client(profile, token).await?;

    match &args.command {
        RequestCommand::List => {
            let requests = client.requests.fetch_requests().await?;
            let rows: Vec<RequestRow> = requests.iter().map(RequestRow::from).collect();
            output::print_list(&rows, format);
        }
        RequestCommand::Show { id } => {
            let request = client.requests.fetch_request(*id).await?;
            output::print_item(&request, format);
        }
        RequestCommand::Create {
            resource,
            description,
            quantity,
            urgency,
            lat,
            lon,
            address,
            info,
        } => {
            let request = client
                .requests
                .create_request(&CreateRequestInput {
                    resource_type: *resource,
                    description: description.clone(),
                    quantity: *quantity,
                    urgency: *urgency,
                    location: Location::new(*lat, *lon, address.clone()),
                    additional_info: info.clone(),
                    expires_at: None,
                })
                .await?;
            output::print_success(&format!("Request {} created", request.id));
        }
        RequestCommand::Update {
            id,
            description,
            quantity,
            urgency,
        } => {
            let request = client
                .requests
                .update_request(
                    *id,
                    &UpdateRequestInput {
                        description: description.clone(),
                        quantity: *quantity,
                        urgency: *urgency,
                        ..Default::default()
                    },
                )
                .await?;
            output::print_success(&format!("Request {} updated", request.id));
        }
        RequestCommand::Cancel { id } => {
            let request = client.requests.cancel_request(*id).await?;
            output::print_success(&format!("Request {} cancelled", request.id));
        }
        RequestCommand::Delete { id, force } => {
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt("This will permanently delete the request. Continue?")
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            client.requests.delete_request(*id).await?;
            output::print_success(&format!("Request {} deleted", id));
        }
        RequestCommand::Fulfill { id } => {
            let request = client.requests.fulfill_request(*id).await?;
            output::print_success(&format!("Request {} fulfilled", request.id));
        }
        RequestCommand::Matches { id } => {
            let matches = client.requests.matches_for(*id).await?;
            let rows: Vec<super::matches::MatchRow> =
                matches.iter().map(super::matches::MatchRow::from).collect();
            output::print_list(&rows, format);
        }
        RequestCommand::Accept { id, offer } => {
            let request = client.requests.accept_offer(*id, *offer).await?;
            output::print_success(&format!(
                "Offer {} accepted for request {} (now {})",
                offer, id, request.status
            ));
        }
        RequestCommand::Reject { id, offer } => {
            client.requests.reject_offer(*id, *offer).await?;
            output::print_success(&format!("Offer {} declined for request {}", offer, id));
        }
    }

    Ok(())
}
