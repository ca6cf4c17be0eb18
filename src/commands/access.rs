//! Route guard and permission CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use super::SlotArg;
use crate::output::{self, OutputFormat};
use portal_auth::{AccessContext, GuardOutcome, ModuleGating, RouteVerdict};
use portal_core::error::AppError;
use portal_entity::{Action, PermissionRequest, SlotName};

/// Arguments for access commands
#[derive(Debug, Args)]
pub struct AccessArgs {
    /// Access subcommand
    #[command(subcommand)]
    pub command: AccessCommand,
}

/// Access subcommands
#[derive(Debug, Subcommand)]
pub enum AccessCommand {
    /// Run the route guard for one or more paths
    Check {
        /// Paths to check
        #[arg(required = true)]
        paths: Vec<String>,
        /// Report the first verdict instead of waiting for the directory
        #[arg(long)]
        no_wait: bool,
    },
    /// Decide one module/action request for a slot
    Can {
        /// Slot to decide for
        #[arg(short, long, value_enum, default_value = "admin")]
        slot: SlotArg,
        /// Module name
        module: String,
        /// Action name
        #[arg(default_value = Action::VIEW)]
        action: String,
        /// Skip the role-module allow-list (component-level check)
        #[arg(long)]
        skip_module_gate: bool,
    },
}

/// Guard verdict display row
#[derive(Debug, Serialize, Tabled)]
struct VerdictRow {
    /// Path
    path: String,
    /// Slot
    slot: String,
    /// Route
    route: String,
    /// Guard state
    guard: String,
    /// Outcome
    outcome: String,
}

impl From<&RouteVerdict> for VerdictRow {
    fn from(verdict: &RouteVerdict) -> Self {
        Self {
            path: verdict.path.clone(),
            slot: verdict.slot.to_string(),
            route: output::or_dash(verdict.route.as_deref()),
            guard: output::or_dash(verdict.guard),
            outcome: describe(&verdict.outcome),
        }
    }
}

fn describe(outcome: &GuardOutcome) -> String {
    match outcome {
        GuardOutcome::Render => "render".to_string(),
        GuardOutcome::Placeholder => "placeholder".to_string(),
        GuardOutcome::Redirect { to, replace: true } => format!("replace {}", to),
        GuardOutcome::Redirect { to, replace: false } => format!("push {}", to),
    }
}

/// Decision display row
#[derive(Debug, Serialize, Tabled)]
struct DecisionRow {
    /// Slot
    slot: String,
    /// Request
    request: String,
    /// Granted
    granted: String,
    /// Reason
    reason: String,
}

/// Execute access commands
pub async fn execute(
    args: &AccessArgs,
    ctx: &AccessContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        AccessCommand::Check { paths, no_wait } => {
            let mut rows = Vec::with_capacity(paths.len());
            for path in paths {
                let verdict = if *no_wait {
                    ctx.authorize(path).await
                } else {
                    ctx.authorize_settled(path).await
                };
                rows.push(VerdictRow::from(&verdict));
            }
            output::print_list(&rows, format);
        }
        AccessCommand::Can {
            slot,
            module,
            action,
            skip_module_gate,
        } => {
            let slot = SlotName::from(*slot);
            let request = PermissionRequest::new(module, action);
            let gating = if *skip_module_gate {
                ModuleGating::Skipped
            } else {
                ModuleGating::Enforced
            };

            let decision = ctx.decide(slot, &request, gating).await;
            let reason = match decision.denial() {
                Some(denial) => denial.to_string(),
                None => serde_json::to_value(decision.source)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default(),
            };
            let row = DecisionRow {
                slot: slot.to_string(),
                request: request.to_string(),
                granted: if decision.granted { "✓" } else { "✗" }.to_string(),
                reason,
            };
            output::print_list(&[row], format);
        }
    }

    Ok(())
}
