//! CLI command definitions and dispatch.

pub mod access;
pub mod nav;
pub mod routes;
pub mod session;

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::output::{self, OutputFormat};
use portal_auth::AccessContext;
use portal_client::{BroadcastNotifier, Notice, Notifier, TracingNotifier};
use portal_core::config::AppConfig;
use portal_core::error::AppError;
use portal_entity::SlotName;

/// Portal console: sessions, route guards and navigation of the admin/client portal
#[derive(Debug, Parser)]
#[command(name = "portal", version, about, long_about = None)]
pub struct Cli {
    /// Path to the base configuration file
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Environment overlay to merge (defaults to PORTAL_ENV, then "development")
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Stored sessions: whoami, login, logout
    Session(session::SessionArgs),
    /// Route guard and permission checks
    Access(access::AccessArgs),
    /// Side navigation preview
    Nav(nav::NavArgs),
    /// Route table
    Routes(routes::RoutesArgs),
}

/// Slot selector for commands that act on one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SlotArg {
    /// Back-office session
    Admin,
    /// Customer session
    Client,
}

impl From<SlotArg> for SlotName {
    fn from(arg: SlotArg) -> Self {
        match arg {
            SlotArg::Admin => SlotName::Admin,
            SlotArg::Client => SlotName::Client,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        // JSON output keeps stdout machine-readable, so notices go to the log.
        let (notifier, notices): (Arc<dyn Notifier>, _) = match self.format {
            OutputFormat::Json => (Arc::new(TracingNotifier), None),
            OutputFormat::Table => {
                let broadcast = BroadcastNotifier::new(NOTICE_CAPACITY);
                let rx = broadcast.subscribe();
                (Arc::new(broadcast), Some(rx))
            }
        };
        let ctx = AccessContext::bootstrap(config, notifier).await?;

        let result = match &self.command {
            Commands::Session(args) => session::execute(args, &ctx, self.format).await,
            Commands::Access(args) => access::execute(args, &ctx, self.format).await,
            Commands::Nav(args) => nav::execute(args, &ctx, self.format).await,
            Commands::Routes(args) => routes::execute(args, &ctx, self.format).await,
        };

        ctx.shutdown();
        if let Some(mut rx) = notices {
            for notice in drain_notices(&mut rx) {
                output::print_warning(&notice.message);
            }
        }
        result
    }
}

const NOTICE_CAPACITY: usize = 16;

/// Notices queued on `rx`, oldest first. Overflowed notices are skipped.
fn drain_notices(rx: &mut broadcast::Receiver<Notice>) -> Vec<Notice> {
    let mut drained = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(notice) => drained.push(notice),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty | TryRecvError::Closed) => return drained,
        }
    }
}
