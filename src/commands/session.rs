//! Session CLI commands.

use clap::{Args, Subcommand};
use dialoguer::Password;
use serde::Serialize;
use tabled::Tabled;

use super::SlotArg;
use crate::output::{self, OutputFormat};
use portal_auth::{AccessContext, GuardOutcome, IdentityView};
use portal_client::Credentials;
use portal_core::error::AppError;
use portal_entity::SlotName;

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Show both stored sessions
    List,
    /// Show the identity active for a path
    Whoami {
        /// Path to resolve the identity for
        #[arg(default_value = "/")]
        path: String,
    },
    /// Sign in; the session lands in the slot of the returned role
    Login {
        /// Account email
        #[arg(short, long)]
        email: String,
        /// Password (prompted when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Sign a slot out
    Logout {
        /// Slot to clear
        #[arg(value_enum)]
        slot: SlotArg,
    },
}

/// Session display row
#[derive(Debug, Serialize, Tabled)]
struct SlotRow {
    /// Slot
    slot: String,
    /// Signed in
    authenticated: String,
    /// User name
    name: String,
    /// Role
    role: String,
    /// User uuid
    uuid: String,
}

impl SlotRow {
    fn from_view(view: &IdentityView) -> Self {
        Self {
            slot: view.auth_type.to_string(),
            authenticated: if view.is_authenticated { "✓" } else { "✗" }.to_string(),
            name: view.display_name.clone(),
            role: view.role.to_string(),
            uuid: output::or_dash(view.uuid.as_deref()),
        }
    }
}

/// Execute session commands
pub async fn execute(
    args: &SessionArgs,
    ctx: &AccessContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        SessionCommand::List => {
            let mut rows = Vec::with_capacity(SlotName::ALL.len());
            for slot in SlotName::ALL {
                let view = ctx.identity(&slot.scoped("/")).await;
                rows.push(SlotRow::from_view(&view));
            }
            output::print_list(&rows, format);
        }
        SessionCommand::Whoami { path } => {
            let view = ctx.identity(path).await;
            match format {
                OutputFormat::Json => output::print_json(&view),
                OutputFormat::Table => {
                    println!("Identity for {}", path);
                    output::print_kv("Slot", view.auth_type.as_str());
                    output::print_kv("Authenticated", &view.is_authenticated.to_string());
                    output::print_kv("Name", &view.display_name);
                    output::print_kv("Role", view.role.as_str());
                    output::print_kv("UUID", &output::or_dash(view.uuid.as_deref()));
                }
            }
        }
        SessionCommand::Login { email, password } => {
            let password = match password {
                Some(p) => p.clone(),
                None => Password::new()
                    .with_prompt("Password")
                    .interact()
                    .map_err(|e| AppError::validation(format!("Failed to read password: {}", e)))?,
            };
            let credentials = Credentials {
                email: email.clone(),
                password,
            };

            let outcome = ctx.login(&credentials).await?;
            match format {
                OutputFormat::Json => output::print_json(&outcome),
                OutputFormat::Table => {
                    output::print_success(&format!(
                        "Signed in to the {} slot as {}",
                        outcome.slot,
                        outcome.user.name.as_deref().unwrap_or(&outcome.user.uuid)
                    ));
                    output::print_kv("Next", &outcome.redirect);
                }
            }
        }
        SessionCommand::Logout { slot } => {
            let slot = SlotName::from(*slot);
            let outcome = ctx.logout(slot).await?;
            match format {
                OutputFormat::Json => output::print_json(&outcome),
                OutputFormat::Table => {
                    output::print_success(&format!("Signed out of the {} slot", slot));
                    if let GuardOutcome::Redirect { to, .. } = &outcome {
                        output::print_kv("Next", to);
                    }
                }
            }
        }
    }

    Ok(())
}
