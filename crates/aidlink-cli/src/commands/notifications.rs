//! Notification inbox commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use aidlink_core::error::AppError;
use aidlink_core::types::NotificationId;
use aidlink_entity::notification::Notification;

use crate::output::{self, OutputFormat};

/// Arguments for notification commands
#[derive(Debug, Args)]
pub struct NotificationArgs {
    /// Notification subcommand
    #[command(subcommand)]
    pub command: NotificationCommand,
}

/// Notification subcommands
#[derive(Debug, Subcommand)]
pub enum NotificationCommand {
    /// List your notifications
    List,
    /// List unread notifications only
    Unread,
    /// Mark one notification as read
    Read {
        /// Notification id
        id: NotificationId,
    },
    /// Mark the whole inbox as read
    ReadAll,
    /// Delete one notification
    Delete {
        /// Notification id
        id: NotificationId,
    },
}

/// Notification display row for table output
#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    /// Notification ID
    id: String,
    /// Kind
    kind: String,
    /// Title
    title: String,
    /// Message
    message: String,
    /// Read marker
    read: String,
    /// Created at
    created_at: String,
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            kind: format!("{:?}", n.kind),
            title: n.title.clone(),
            message: n.message.clone(),
            read: if n.read { "yes" } else { "no" }.to_string(),
            created_at: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute notification commands
pub async fn execute(
    args: &NotificationArgs,
    profile: &str,
    token: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = super::client(profile, token).await?;

    match &args.command {
        NotificationCommand::List => {
            let notifications = client.notifications.fetch_notifications().await?;
            let rows: Vec<NotificationRow> =
                notifications.iter().map(NotificationRow::from).collect();
            output::print_list(&rows, format);
        }
        NotificationCommand::Unread => {
            let unread = client.notifications.fetch_unread().await?;
            let rows: Vec<NotificationRow> = unread.iter().map(NotificationRow::from).collect();
            output::print_list(&rows, format);
        }
        NotificationCommand::Read { id } => {
            client.notifications.mark_read(*id).await?;
            output::print_success(&format!("Notification {} marked as read", id));
        }
        NotificationCommand::ReadAll => {
            let affected = client.notifications.mark_all_read().await?;
            output::print_success(&format!("{} notifications marked as read", affected));
        }
        NotificationCommand::Delete { id } => {
            client.notifications.delete_notification(*id).await?;
            output::print_success(&format!("Notification {} deleted", id));
        }
    }

    Ok(())
}
