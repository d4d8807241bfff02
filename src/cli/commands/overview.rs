//! Dashboard overview.
//!
//! Events, threshold status and pipeline status are fetched concurrently;
//! a failure in one panel is reported in that panel only.

use anyhow::Result;
use clap::Args;
use console::style;
use serde::Serialize;

use super::events::event_line;
use super::FilterArgs;
use crate::cli::context::DashboardContext;
use crate::cli::display::{
    colorize_alert, count_label, list_table, output, section_header, CommandOutput,
};
use crate::domain::models::{ThresholdStatus, ThresholdStatusEntry};
use crate::services::overview::OverviewSnapshot;

#[derive(Args, Debug)]
pub struct OverviewArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
}

/// A panel either rendered or failed on its own.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "data")]
pub enum Panel<T> {
    Ready(T),
    Failed(String),
}

impl<T> Panel<T> {
    fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::Ready(data),
            Err(err) => Self::Failed(err.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ThresholdTally {
    pub exceeded: usize,
    pub approaching: usize,
    pub below: usize,
}

#[derive(Debug, Serialize)]
pub struct OverviewOutput {
    pub events: Panel<OverviewSnapshot>,
    pub thresholds: Panel<ThresholdTally>,
    pub pipeline: Panel<String>,
}

impl CommandOutput for OverviewOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();

        match &self.events {
            Panel::Ready(snapshot) => render_snapshot(snapshot, &mut lines),
            Panel::Failed(err) => lines.push(failed("Events", err)),
        }

        lines.push(section_header("Thresholds"));
        match &self.thresholds {
            Panel::Ready(tally) => lines.push(format!(
                "  {} exceeded, {} approaching, {} below",
                style(tally.exceeded).red().bold(),
                style(tally.approaching).yellow(),
                style(tally.below).green()
            )),
            Panel::Failed(err) => lines.push(failed("Thresholds", err)),
        }

        lines.push(section_header("Pipeline"));
        match &self.pipeline {
            Panel::Ready(status) => lines.push(format!("  {status}")),
            Panel::Failed(err) => lines.push(failed("Pipeline", err)),
        }

        lines.join("\n")
    }
}

fn failed(panel: &str, err: &str) -> String {
    format!("  {} {panel} unavailable: {err}", style("!").red().bold())
}

fn render_snapshot(snapshot: &OverviewSnapshot, lines: &mut Vec<String>) {
    // The ticker renders nothing at all when there is nothing to show.
    if let Some(ticker) = &snapshot.ticker {
        for item in ticker {
            lines.push(format!(
                "{} {} {} \u{00b7} {}",
                style("\u{25b2}").red(),
                colorize_alert(item.alert_level),
                item.country,
                item.title
            ));
        }
    }

    lines.push(format!(
        "{} in view",
        count_label(snapshot.total_events, "event", "events")
    ));

    lines.push(section_header("Convergence hotspots"));
    if snapshot.hotspots.is_empty() {
        lines.push("  No convergent events in view.".to_string());
    }
    for event in &snapshot.hotspots {
        lines.push(format!("  {}", event_line(event)));
    }

    lines.push(section_header("Systemic nodes"));
    if snapshot.systemic_nodes.is_empty() {
        lines.push("  No systemic nodes (CI \u{2265} 4) in view.".to_string());
    }
    for event in &snapshot.systemic_nodes {
        lines.push(format!("  {}", event_line(event)));
    }

    lines.push(section_header("Coupling patterns"));
    if snapshot.coupling_patterns.is_empty() {
        lines.push("  No coupling patterns tagged.".to_string());
    }
    for pattern in &snapshot.coupling_patterns {
        lines.push(format!("  {:>3}  {}", pattern.count, pattern.label));
    }

    lines.push(section_header("Networks"));
    let mut table = list_table(&["", "network", "events", "convergent", "crossings", "max alert"]);
    for network in &snapshot.networks {
        table.add_row(vec![
            network.roman.clone(),
            network.label.clone(),
            network.event_count.to_string(),
            network.convergent_count.to_string(),
            network.threshold_crossings.to_string(),
            colorize_alert(network.max_alert).to_string(),
        ]);
    }
    lines.push(table.to_string());

    lines.push(section_header("Map"));
    lines.push(format!(
        "  {} placed",
        count_label(snapshot.map.markers.len(), "marker", "markers")
    ));
    if snapshot.map.unlocated > 0 {
        lines.push(format!(
            "  {} without location data",
            count_label(snapshot.map.unlocated, "event", "events")
        ));
    }
}

pub async fn execute(args: OverviewArgs, ctx: &DashboardContext) -> Result<()> {
    let filter = args.filter.to_aggregate_filter();

    let (events, thresholds, pipeline) = ctx
        .load("Loading dashboard", async {
            tokio::join!(
                ctx.api.list_events(&filter),
                ctx.api.threshold_status(),
                ctx.api.pipeline_status()
            )
        })
        .await;

    let projector = ctx.projector();
    let out = OverviewOutput {
        events: Panel::from_result(
            events.map(|page| OverviewSnapshot::derive(&page.items, &projector)),
        ),
        thresholds: Panel::from_result(thresholds.map(|entries| ThresholdTally {
            exceeded: count_status(&entries, ThresholdStatus::Exceeded),
            approaching: count_status(&entries, ThresholdStatus::Approaching),
            below: count_status(&entries, ThresholdStatus::Below),
        })),
        pipeline: Panel::from_result(pipeline.map(|status| match status.latest_run() {
            Some(run) => format!(
                "Last run {} ({}): {} events, {} crossings",
                run.run_date, run.status, run.events_ingested, run.threshold_crossings
            ),
            None => "No pipeline runs recorded.".to_string(),
        })),
    };
    output(&out, ctx.json);

    Ok(())
}

fn count_status(entries: &[ThresholdStatusEntry], status: ThresholdStatus) -> usize {
    entries.iter().filter(|e| e.status == status).count()
}
