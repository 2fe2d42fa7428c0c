//! Account registration and login commands.

use clap::{Args, Subcommand};

use aidlink_client::api::{CoordinationApi, LoginInput, RegisterInput};
use aidlink_core::error::AppError;
use aidlink_entity::user::UserRole;

use crate::output::{self, OutputFormat};

/// Arguments for auth commands
#[derive(Debug, Args)]
pub struct AuthArgs {
    /// Auth subcommand
    #[command(subcommand)]
    pub command: AuthCommand,
}

/// Auth subcommands
#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Log in and print the bearer token
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Create an account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Account email
        #[arg(short, long)]
        email: String,
        /// Account role (victim, ngo, volunteer, government)
        #[arg(short, long)]
        role: UserRole,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,
    },
    /// Show the profile behind the current token
    Whoami,
}

/// Execute auth commands
pub async fn execute(
    args: &AuthArgs,
    profile: &str,
    token: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        AuthCommand::Login { email, password } => {
            let (_, gateway) = super::open_gateway(profile)?;
            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
            };

            let auth = gateway
                .login(&LoginInput {
                    email: email.clone(),
                    password,
                })
                .await?;

            output::print_success(&format!("Logged in as '{}'", auth.user.name));
            output::print_kv("Role", auth.user.role.as_str());
            output::print_kv("Token", &auth.token);
            println!();
            println!("Export it for subsequent commands:");
            println!("  export AIDLINK_TOKEN={}", auth.token);
        }
        AuthCommand::Register {
            name,
            email,
            role,
            password,
            phone,
        } => {
            let (_, gateway) = super::open_gateway(profile)?;
            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
            };

            let auth = gateway
                .register(&RegisterInput {
                    name: name.clone(),
                    email: email.clone(),
                    password,
                    role: *role,
                    phone: phone.clone(),
                })
                .await?;

            output::print_success(&format!(
                "Registered '{}' as {}",
                auth.user.name, auth.user.role
            ));
            output::print_kv("Token", &auth.token);
        }
        AuthCommand::Whoami => {
            let client = super::client(profile, token).await?;
            let session = client.session();
            match format {
                OutputFormat::Json => output::print_item(session, format),
                OutputFormat::Table => {
                    output::print_kv("User", &session.username);
                    output::print_kv("Role", session.role.as_str());
                    output::print_kv("User id", &session.user_id.to_string());
                }
            }
        }
    }

    Ok(())
}
