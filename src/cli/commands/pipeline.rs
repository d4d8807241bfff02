//! Backend computation runs.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};
use console::style;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::cli::context::DashboardContext;
use crate::cli::display::{
    action_success, list_table, or_dash, output, render_list, CommandOutput, DetailView,
};
use crate::domain::models::{PipelineRun, PipelineStatus, TriggeredRun};
use crate::services::view_state::{ViewSlot, ViewState};

/// Default look-back window for a triggered run, in days.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 2;

#[derive(Args, Debug)]
pub struct PipelineArgs {
    #[command(subcommand)]
    pub command: PipelineCommands,
}

#[derive(Subcommand, Debug)]
pub enum PipelineCommands {
    /// Latest run
    Status {
        /// Keep polling at the configured interval until interrupted
        #[arg(short, long)]
        watch: bool,

        /// Stop watching after this many rendered polls
        #[arg(long, requires = "watch")]
        polls: Option<u32>,
    },
    /// Recent runs
    History,
    /// Trigger a computation run
    Run {
        /// Days of source data to ingest
        #[arg(long, default_value_t = DEFAULT_LOOKBACK_DAYS, value_parser = clap::value_parser!(u32).range(1..=365))]
        lookback_days: u32,
    },
}

fn run_view(title: &str, run: &PipelineRun) -> DetailView {
    DetailView::new(title)
        .field("Run", run.id.as_str())
        .field("Date", run.run_date.as_str())
        .field("Status", run.status.as_str())
        .field("Started", run.started_at.as_str())
        .field("Finished", or_dash(run.finished_at.as_deref()))
        .field("Events ingested", run.events_ingested.to_string())
        .field("Threshold crossings", run.threshold_crossings.to_string())
        .field("Convergence nodes", run.convergence_nodes.to_string())
        .section("Source errors")
        .items(run.source_errors.iter().cloned())
}

#[derive(Debug, Serialize)]
pub struct PipelineStatusOutput {
    #[serde(flatten)]
    pub status: PipelineStatus,
}

impl CommandOutput for PipelineStatusOutput {
    fn to_human(&self) -> String {
        match self.status.latest_run() {
            Some(run) => run_view("Latest pipeline run", run).render(),
            None => "No pipeline runs recorded.".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PipelineHistoryOutput {
    pub runs: Vec<PipelineRun>,
}

impl CommandOutput for PipelineHistoryOutput {
    fn to_human(&self) -> String {
        if self.runs.is_empty() {
            return "No pipeline runs recorded.".to_string();
        }
        let mut table = list_table(&["run", "date", "status", "events", "crossings", "nodes", "errors"]);
        for run in &self.runs {
            table.add_row(vec![
                run.id.clone(),
                run.run_date.clone(),
                run.status.clone(),
                run.events_ingested.to_string(),
                run.threshold_crossings.to_string(),
                run.convergence_nodes.to_string(),
                run.source_errors.len().to_string(),
            ]);
        }
        render_list("pipeline run", table, self.runs.len())
    }
}

#[derive(Debug, Serialize)]
pub struct RunTriggeredOutput {
    #[serde(flatten)]
    pub run: TriggeredRun,
}

impl CommandOutput for RunTriggeredOutput {
    fn to_human(&self) -> String {
        action_success(&format!(
            "Pipeline run {} {} (ingesting since {})",
            self.run.run_id, self.run.status, self.run.since
        ))
    }
}

pub async fn execute(args: PipelineArgs, ctx: &DashboardContext) -> Result<()> {
    match args.command {
        PipelineCommands::Status { watch: false, .. } => {
            let status = ctx
                .load("Loading pipeline status", ctx.api.pipeline_status())
                .await
                .context("Failed to load pipeline status")?;
            output(&PipelineStatusOutput { status }, ctx.json);
        }

        PipelineCommands::Status { watch: true, polls } => watch_status(ctx, polls).await?,

        PipelineCommands::History => {
            let runs = ctx
                .load("Loading pipeline history", ctx.api.pipeline_history())
                .await
                .context("Failed to load pipeline history")?;
            output(&PipelineHistoryOutput { runs }, ctx.json);
        }

        PipelineCommands::Run { lookback_days } => {
            let run = ctx
                .load("Triggering pipeline run", ctx.api.trigger_run(lookback_days))
                .await
                .context("Failed to trigger pipeline run")?;
            output(&RunTriggeredOutput { run }, ctx.json);
        }
    }

    Ok(())
}

/// Poll `pipeline/status` until interrupted or `polls` results are shown.
///
/// At most one poll is outstanding. A tick that fires while the previous
/// poll is still loading is skipped, so a response slower than the interval
/// is still rendered. Results from a poll superseded by `abandon` are dropped.
async fn watch_status(ctx: &DashboardContext, polls: Option<u32>) -> Result<()> {
    let period = Duration::from_secs(ctx.config.fetch.poll_interval_secs.max(1));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut slot: ViewSlot<PipelineStatus> = ViewSlot::new();
    let mut rendered = 0;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if slot.state().is_loading() {
                    debug!("previous poll still pending, tick skipped");
                    continue;
                }
                ctx.api.invalidate(&["pipeline/status"]).await;
                let ticket = slot.begin();
                let api = Arc::clone(&ctx.api);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let result = api.pipeline_status().await;
                    // Receiver gone means the watch ended
                    let _ = tx.send((ticket, result));
                });
            }
            Some((ticket, result)) = rx.recv() => {
                if !slot.resolve(ticket, result) {
                    continue;
                }
                println!("{}", render_poll(slot.state(), ctx.json));
                rendered += 1;
                if polls.is_some_and(|limit| rendered >= limit) {
                    break;
                }
            }
            _ = &mut shutdown => {
                debug!("pipeline watch interrupted");
                break;
            }
        }
    }

    slot.abandon();
    Ok(())
}

/// One line per poll.
fn render_poll(state: &ViewState<PipelineStatus>, json: bool) -> String {
    let now = Utc::now().format("%H:%M:%S");
    if json {
        let body = match state {
            ViewState::Ready(status) => serde_json::json!({"state": "ready", "status": status}),
            ViewState::Empty => serde_json::json!({"state": "empty"}),
            ViewState::Failed { error, last_good } => serde_json::json!({
                "state": "failed",
                "error": error.to_string(),
                "last_good": last_good,
            }),
            ViewState::NotQueried | ViewState::Loading => serde_json::json!({"state": "loading"}),
        };
        return body.to_string();
    }

    let line = match state {
        ViewState::Ready(status) => match status.latest_run() {
            Some(run) => summary_line(run),
            None => status.status().to_string(),
        },
        ViewState::Empty => "No pipeline runs recorded.".to_string(),
        ViewState::Failed { error, last_good } => {
            let stale = last_good
                .as_ref()
                .and_then(PipelineStatus::latest_run)
                .map(|run| format!(" (last known: {})", summary_line(run)))
                .unwrap_or_default();
            format!("{} {error}{stale}", style("poll failed:").red())
        }
        ViewState::NotQueried | ViewState::Loading => "loading".to_string(),
    };
    format!("{} {line}", style(format!("[{now}]")).dim())
}

fn summary_line(run: &PipelineRun) -> String {
    format!(
        "{} {} \u{00b7} {} events, {} crossings, {} nodes",
        run.id, run.status, run.events_ingested, run.threshold_crossings, run.convergence_nodes
    )
}
