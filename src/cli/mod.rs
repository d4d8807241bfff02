//! Terminal operator dashboard.
//!
//! Every command fetches through the cached API, derives its view with the
//! pure services, and renders either a human table or a JSON document.

pub mod commands;
pub mod context;
pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use crate::domain::errors::DashboardError;

pub use context::DashboardContext;

#[derive(Parser, Debug)]
#[command(
    name = "smae-dashboard",
    version,
    about = "Operator dashboard for socio-metabolic convergence analysis"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file on top of .smae/
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the analytical service base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dashboard overview: ticker, hotspots, systemic nodes, patterns, map
    Overview(commands::overview::OverviewArgs),

    /// Browse and inspect events
    Events(commands::events::EventsArgs),

    /// Metabolic network summaries and detail
    Networks(commands::networks::NetworksArgs),

    /// Network co-occurrence heatmap and convergence rankings
    Convergence(commands::convergence::ConvergenceArgs),

    /// Threshold definitions and gauges
    Thresholds(commands::thresholds::ThresholdsArgs),

    /// Geographic marker layer
    Map(commands::map::MapArgs),

    /// Backend computation runs
    Pipeline(commands::pipeline::PipelineArgs),

    /// Generate and download reports
    Reports(commands::reports::ReportsArgs),
}

/// Dispatch a parsed command.
pub async fn execute(command: Commands, ctx: &DashboardContext) -> anyhow::Result<()> {
    match command {
        Commands::Overview(args) => commands::overview::execute(args, ctx).await,
        Commands::Events(args) => commands::events::execute(args, ctx).await,
        Commands::Networks(args) => commands::networks::execute(args, ctx).await,
        Commands::Convergence(args) => commands::convergence::execute(args, ctx).await,
        Commands::Thresholds(args) => commands::thresholds::execute(args, ctx).await,
        Commands::Map(args) => commands::map::execute(args, ctx).await,
        Commands::Pipeline(args) => commands::pipeline::execute(args, ctx).await,
        Commands::Reports(args) => commands::reports::execute(args, ctx).await,
    }
}

/// Print a command failure and return the process exit code.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> i32 {
    let dashboard = err.downcast_ref::<DashboardError>();
    let hint = dashboard.and_then(recovery_hint);

    if json_mode {
        let body = serde_json::json!({
            "error": format!("{err:#}"),
            "kind": dashboard.map(error_kind),
            "hint": hint,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );
    } else {
        eprintln!("{} {err:#}", style("error:").red().bold());
        if let Some(hint) = hint {
            eprintln!("{} {hint}", style("hint:").cyan());
        }
    }

    match dashboard {
        Some(DashboardError::NotFound { .. }) => 2,
        _ => 1,
    }
}

const fn error_kind(err: &DashboardError) -> &'static str {
    match err {
        DashboardError::NotFound { .. } => "not_found",
        DashboardError::FetchFailure { .. } => "fetch_failure",
        DashboardError::InvalidMetric { .. } => "invalid_metric",
        DashboardError::InvalidMatrix(_) => "invalid_matrix",
        DashboardError::InvalidRequest(_) => "invalid_request",
        DashboardError::Decode(_) => "decode",
    }
}

/// Path back to the parent list for a missing entity.
fn recovery_hint(err: &DashboardError) -> Option<&'static str> {
    match err {
        DashboardError::NotFound { entity, .. } => Some(match *entity {
            "Network" => "run `smae-dashboard networks list` to see the eight networks",
            "Report" => "run `smae-dashboard reports list` to browse the archive",
            _ => "run `smae-dashboard events list` to browse events",
        }),
        DashboardError::FetchFailure { .. } => {
            Some("check that the analytical service is reachable (see --api-url)")
        }
        _ => None,
    }
}
