//! Match management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use aidlink_core::error::AppError;
use aidlink_core::types::{MatchId, OfferId, RequestId};
use aidlink_entity::matching::{Match, MatchCandidate};

use crate::output::{self, OutputFormat};

/// Arguments for match commands
#[derive(Debug, Args)]
pub struct MatchArgs {
    /// Match subcommand
    #[command(subcommand)]
    pub command: MatchCommand,
}

/// Match subcommands
#[derive(Debug, Subcommand)]
pub enum MatchCommand {
    /// Rank candidate offers for a request
    Find {
        /// Request id
        request: RequestId,
    },
    /// Record a match between a request and an offer
    Create {
        /// Request id
        #[arg(short, long)]
        request: RequestId,
        /// Offer id
        #[arg(short, long)]
        offer: OfferId,
    },
    /// Accept a proposed match
    Accept {
        /// Match id
        id: MatchId,
    },
    /// Decline a proposed match
    Reject {
        /// Match id
        id: MatchId,
    },
    /// Mark an accepted match as delivered
    Fulfill {
        /// Match id
        id: MatchId,
    },
    /// List matches involving you
    Mine,
    /// Summarize your matches by status
    Stats,
}

/// Match display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct MatchRow {
    /// Match ID
    pub id: String,
    /// Request ID
    pub request: String,
    /// Offer ID
    pub offer: String,
    /// Status
    pub status: String,
    /// Created at
    pub created_at: String,
}

impl From<&Match> for MatchRow {
    fn from(m: &Match) -> Self {
        Self {
            id: m.id.to_string(),
            request: m.request_id.to_string(),
            offer: m.offer_id.to_string(),
            status: m.status.to_string(),
            created_at: m.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Candidate display row for table output
#[derive(Debug, Serialize, Tabled)]
struct CandidateRow {
    /// Offer ID
    offer: String,
    /// Resource category
    resource: String,
    /// Description
    description: String,
    /// Quantity
    quantity: u32,
    /// Distance in km
    distance_km: String,
}

impl From<&MatchCandidate> for CandidateRow {
    fn from(c: &MatchCandidate) -> Self {
        Self {
            offer: c.offer.id.to_string(),
            resource: c.offer.resource_type.to_string(),
            description: c.offer.description.clone(),
            quantity: c.offer.quantity,
            distance_km: c
                .distance_km
                .map(|d| format!("{:.1}", d))
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Execute match commands
pub async fn execute(
    args: &MatchArgs,
    profile: &str,
    token: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = super::client(profile, token).await?;

    match &args.command {
        MatchCommand::Find { request } => {
            let candidates = client.matches.find_matches(*request).await?;
            let rows: Vec<CandidateRow> = candidates.iter().map(CandidateRow::from).collect();
            output::print_list(&rows, format);
        }
        MatchCommand::Create { request, offer } => {
            let m = client.matches.create_match(*request, *offer).await?;
            output::print_success(&format!("Match {} recorded", m.id));
        }
        MatchCommand::Accept { id } => {
            let m = client.matches.accept_match(*id).await?;
            output::print_success(&format!("Match {} accepted", m.id));
        }
        MatchCommand::Reject { id } => {
            let m = client.matches.reject_match(*id).await?;
            output::print_success(&format!("Match {} declined", m.id));
        }
        MatchCommand::Fulfill { id } => {
            let m = client.matches.fulfill_match(*id).await?;
            output::print_success(&format!("Match {} fulfilled", m.id));
        }
        MatchCommand::Mine => {
            let matches = client.matches.fetch_my_matches().await?;
            let rows: Vec<MatchRow> = matches.iter().map(MatchRow::from).collect();
            output::print_list(&rows, format);
        }
        MatchCommand::Stats => {
            client.matches.fetch_my_matches().await?;
            let stats = client.matches.stats().await;
            match format {
                OutputFormat::Json => output::print_item(&stats, format),
                OutputFormat::Table => {
                    output::print_kv("Total", &stats.total.to_string());
                    output::print_kv("Pending", &stats.pending.to_string());
                    output::print_kv("Accepted", &stats.accepted.to_string());
                    output::print_kv("Rejected", &stats.rejected.to_string());
                    output::print_kv("Fulfilled", &stats.fulfilled.to_string());
                }
            }
        }
    }

    Ok(())
}
