//! Side navigation CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use portal_auth::{AccessContext, VisibleNavigation};
use portal_core::error::AppError;
use portal_entity::ModuleTreeNode;

/// Arguments for navigation commands
#[derive(Debug, Args)]
pub struct NavArgs {
    /// Navigation subcommand
    #[command(subcommand)]
    pub command: NavCommand,
}

/// Navigation subcommands
#[derive(Debug, Subcommand)]
pub enum NavCommand {
    /// Show the side menu visible on a path
    Show {
        /// Path whose slot's menu to show
        #[arg(default_value = "/")]
        path: String,
        /// Report the first state instead of waiting for the directory
        #[arg(long)]
        no_wait: bool,
    },
}

/// Menu entry display row
#[derive(Debug, Serialize, Tabled)]
struct EntryRow {
    /// Entry id
    id: String,
    /// Name, indented by depth
    name: String,
    /// Link target
    url: String,
    /// Icon
    icon: String,
}

fn flatten(nodes: &[ModuleTreeNode], depth: usize, rows: &mut Vec<EntryRow>) {
    for node in nodes {
        rows.push(EntryRow {
            id: node.id.to_string(),
            name: format!("{}{}", "  ".repeat(depth), node.name),
            url: node.url.clone(),
            icon: output::or_dash(node.icon.as_deref()),
        });
        flatten(&node.children, depth + 1, rows);
    }
}

/// Execute navigation commands
pub async fn execute(
    args: &NavArgs,
    ctx: &AccessContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        NavCommand::Show { path, no_wait } => {
            let visible = if *no_wait {
                ctx.navigation(path).await
            } else {
                ctx.navigation_settled(path).await
            };

            if format == OutputFormat::Json {
                output::print_json(&visible);
                return Ok(());
            }
            match &visible {
                VisibleNavigation::Placeholder { rows } => {
                    output::print_warning(&format!(
                        "Access directory still loading ({} placeholder rows)",
                        rows
                    ));
                }
                VisibleNavigation::Tree { nodes } => {
                    let mut rows = Vec::new();
                    flatten(nodes, 0, &mut rows);
                    output::print_list(&rows, format);
                }
            }
        }
    }

    Ok(())
}
