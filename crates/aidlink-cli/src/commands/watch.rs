//! Stream live coordination events to the terminal.

use clap::Args;
use tokio::sync::broadcast::error::RecvError;

use aidlink_core::error::AppError;
use aidlink_core::events::EventKind;

use crate::output;

/// Arguments for the watch command
#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Only print these event kinds (repeatable, e.g. --event new_request)
    #[arg(short, long = "event")]
    pub events: Vec<EventKind>,

    /// Print full envelopes as JSON lines instead of a summary
    #[arg(long)]
    pub raw: bool,
}

/// Execute the watch command
pub async fn execute(args: &WatchArgs, profile: &str, token: Option<&str>) -> Result<(), AppError> {
    let client = super::live_client(profile, token).await?;
    client.start().await?;
    client.sync().await?;

    let mut rx = client.subscribe_all().await?;

    println!(
        "Watching events for '{}' (Ctrl+C to stop)...",
        client.session().username
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
            received = rx.recv() => match received {
                Ok(envelope) => {
                    if !args.events.is_empty() && !args.events.contains(&envelope.event) {
                        continue;
                    }
                    if args.raw {
                        match serde_json::to_string(&envelope) {
                            Ok(line) => println!("{}", line),
                            Err(e) => {
                                output::print_warning(&format!("Unprintable envelope: {}", e));
                            }
                        }
                    } else {
                        println!(
                            "{} {:<24} {}",
                            envelope.occurred_at.format("%H:%M:%S"),
                            envelope.event,
                            envelope.payload
                        );
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    output::print_warning(&format!("Stream lagged, {} events dropped", skipped));
                }
                Err(RecvError::Closed) => {
                    output::print_warning("Connection closed by the server");
                    break;
                }
            },
        }
    }

    client.shutdown().await;
    output::print_success("Disconnected.");
    Ok(())
}
