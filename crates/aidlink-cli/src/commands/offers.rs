//! Resource offer management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use aidlink_core::error::AppError;
use aidlink_core::types::{Location, OfferId};
use aidlink_entity::offer::{CreateOfferInput, Offer, UpdateOfferInput};
use aidlink_entity::resource::ResourceType;

use crate::output::{self, OutputFormat};

/// Arguments for offer commands
#[derive(Debug, Args)]
pub struct OfferArgs {
    /// Offer subcommand
    #[command(subcommand)]
    pub command: OfferCommand,
}

/// Offer subcommands
#[derive(Debug, Subcommand)]
pub enum OfferCommand {
    /// List your resource offers
    List,
    /// Show one offer
    Show {
        /// Offer id
        id: OfferId,
    },
    /// Post a new resource offer
    Create {
        /// Resource category (food, shelter, medical, transport, other)
        #[arg(short, long)]
        resource: ResourceType,
        /// What is on offer
        #[arg(short, long)]
        description: String,
        /// How many units are available
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
        /// Latitude of the staging point
        #[arg(long)]
        lat: f64,
        /// Longitude of the staging point
        #[arg(long)]
        lon: f64,
        /// Street address or landmark
        #[arg(short, long)]
        address: String,
        /// Validity window in hours
        #[arg(short, long, default_value_t = 72)]
        expiry: u32,
    },
    /// Edit a pending offer
    Update {
        /// Offer id
        id: OfferId,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New quantity
        #[arg(short, long)]
        quantity: Option<u32>,
        /// New validity window in hours
        #[arg(short, long)]
        expiry: Option<u32>,
    },
    /// Mark an offer as aged out
    Expire {
        /// Offer id
        id: OfferId,
    },
    /// Mark a matched offer as delivered
    Fulfill {
        /// Offer id
        id: OfferId,
    },
    /// Delete an offer outright
    Delete {
        /// Offer id
        id: OfferId,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Summarize your offers by status
    Stats,
}

/// Offer display row for table output
#[derive(Debug, Serialize, Tabled)]
struct OfferRow {
    /// Offer ID
    id: String,
    /// Resource category
    resource: String,
    /// Description
    description: String,
    /// Quantity
    quantity: u32,
    /// Status
    status: String,
    /// Expires at
    expires_at: String,
}

impl From<&Offer> for OfferRow {
    fn from(o: &Offer) -> Self {
        Self {
            id: o.id.to_string(),
            resource: o.resource_type.to_string(),
            description: o.description.clone(),
            quantity: o.quantity,
            status: o.status.to_string(),
            expires_at: o.expires_at().format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute offer commands
pub async fn execute(
    args: &OfferArgs,
    profile: &str,
    token: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = super::client(profile, token).await?;

    match &args.command {
        OfferCommand::List => {
            let offers = client.offers.fetch_offers().await?;
            let rows: Vec<OfferRow> = offers.iter().map(OfferRow::from).collect();
            output::print_list(&rows, format);
        }
        OfferCommand::Show { id } => {
            let offer = client.offers.fetch_offer(*id).await?;
            output::print_item(&offer, format);
        }
        OfferCommand::Create {
            resource,
            description,
            quantity,
            lat,
            lon,
            address,
            expiry,
        } => {
            let offer = client
                .offers
                .create_offer(&CreateOfferInput {
                    resource_type: *resource,
                    description: description.clone(),
                    quantity: *quantity,
                    location: Location::new(*lat, *lon, address.clone()),
                    expiry_hours: *expiry,
                })
                .await?;
            output::print_success(&format!("Offer {} created", offer.id));
        }
        OfferCommand::Update {
            id,
            description,
            quantity,
            expiry,
        } => {
            let offer = client
                .offers
                .update_offer(
                    *id,
                    &UpdateOfferInput {
                        description: description.clone(),
                        quantity: *quantity,
                        expiry_hours: *expiry,
                        ..Default::default()
                    },
                )
                .await?;
            output::print_success(&format!("Offer {} updated", offer.id));
        }
        OfferCommand::Expire { id } => {
            let offer = client.offers.expire_offer(*id).await?;
            output::print_success(&format!("Offer {} expired", offer.id));
        }
        OfferCommand::Fulfill { id } => {
            let offer = client.offers.fulfill_offer(*id).await?;
            output::print_success(&format!("Offer {} fulfilled", offer.id));
        }
        OfferCommand::Delete { id, force } => {
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt("This will permanently delete the offer. Continue?")
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            client.offers.delete_offer(*id).await?;
            output::print_success(&format!("Offer {} deleted", id));
        }
        OfferCommand::Stats => {
            client.offers.fetch_offers().await?;
            let stats = client.offers.stats().await;
            match format {
                OutputFormat::Json => output::print_item(&stats, format),
                OutputFormat::Table => {
                    output::print_kv("Total", &stats.total.to_string());
                    output::print_kv("Pending", &stats.pending.to_string());
                    output::print_kv("Matched", &stats.matched.to_string());
                    output::print_kv("Fulfilled", &stats.fulfilled.to_string());
                    output::print_kv("Expired", &stats.expired.to_string());
                }
            }
        }
    }

    Ok(())
}
