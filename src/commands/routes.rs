//! Route table CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use portal_auth::{AccessContext, RouteDef};
use portal_core::error::AppError;

/// Arguments for route commands
#[derive(Debug, Args)]
pub struct RoutesArgs {
    /// Route subcommand
    #[command(subcommand)]
    pub command: RoutesCommand,
}

/// Route subcommands
#[derive(Debug, Subcommand)]
pub enum RoutesCommand {
    /// List every declared route
    List,
    /// Show which route a path resolves to
    Resolve {
        /// Path to resolve
        path: String,
    },
}

/// Route display row
#[derive(Debug, Serialize, Tabled)]
struct RouteRow {
    /// Name
    name: String,
    /// Pattern
    pattern: String,
    /// Slot
    slot: String,
    /// Access
    access: String,
    /// Guard request
    permission: String,
}

impl From<&RouteDef> for RouteRow {
    fn from(route: &RouteDef) -> Self {
        Self {
            name: route.name.clone(),
            pattern: route.pattern.clone(),
            slot: route.slot.to_string(),
            access: route.access.to_string(),
            permission: output::or_dash(route.permission.as_ref()),
        }
    }
}

/// Execute route commands
pub async fn execute(
    args: &RoutesArgs,
    ctx: &AccessContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        RoutesCommand::List => {
            let rows: Vec<RouteRow> = ctx.routes().routes().iter().map(RouteRow::from).collect();
            output::print_list(&rows, format);
        }
        RoutesCommand::Resolve { path } => match ctx.routes().resolve(path) {
            Some(found) => {
                if format == OutputFormat::Json {
                    output::print_json(&found);
                } else {
                    output::print_list(&[RouteRow::from(found.route)], format);
                    for (name, value) in &found.params {
                        output::print_kv(name, value);
                    }
                }
            }
            None => {
                return Err(AppError::not_found(format!("No route matches '{}'", path)));
            }
        },
    }

    Ok(())
}
