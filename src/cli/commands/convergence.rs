//! Convergence heatmap and rankings.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use super::events::event_line;
use super::FilterArgs;
use crate::cli::context::DashboardContext;
use crate::cli::display::{
    colorize_alert, heat_glyph, list_table, output, render_list, section_header, CommandOutput,
};
use crate::domain::models::{AlertLevel, ConvergenceClass, ConvergenceScore};
use crate::services::convergence::{
    coupling_pattern_frequency, hotspots, rank_scores, systemic_nodes, PatternFrequency,
};
use crate::services::heatmap::{self, Heatmap};
use crate::services::overview::RankedEvent;

#[derive(Args, Debug)]
pub struct ConvergenceArgs {
    #[command(subcommand)]
    pub command: ConvergenceCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConvergenceCommands {
    /// Network co-occurrence heatmap
    Matrix,
    /// Hotspots, systemic nodes and coupling-pattern frequency
    Rankings {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Stored convergence scores with triage recommendations
    Scores,
}

#[derive(Debug, Serialize)]
pub struct MatrixOutput {
    pub heatmap: Heatmap,
    /// Raw co-occurrence counts, row-major
    pub counts: Vec<Vec<u64>>,
}

impl CommandOutput for MatrixOutput {
    fn to_human(&self) -> String {
        let heatmap = &self.heatmap;
        if heatmap.labels.is_empty() {
            return "No co-occurrence data.".to_string();
        }

        let label_width = heatmap
            .labels
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);

        let mut lines = Vec::with_capacity(heatmap.labels.len() + 2);
        let header: String = (1..=heatmap.labels.len())
            .map(|i| format!("{:>3}", i))
            .collect();
        lines.push(format!("{:width$}  {}", "", header, width = label_width + 4));

        for (i, (label, row)) in heatmap.labels.iter().zip(&heatmap.buckets).enumerate() {
            let cells: String = row
                .iter()
                .map(|bucket| format!("  {}", heat_glyph(*bucket)))
                .collect();
            lines.push(format!(
                "{:>2}  {:<width$}  {}",
                i + 1,
                label,
                cells,
                width = label_width
            ));
        }
        lines.push(format!(
            "\nscale: {} 0  {} 1  {} 2  {} 3  {} 4   (max count {})",
            heat_glyph(0),
            heat_glyph(1),
            heat_glyph(2),
            heat_glyph(3),
            heat_glyph(4),
            heatmap.max
        ));
        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct RankingsOutput {
    pub hotspots: Vec<RankedEvent>,
    pub systemic_nodes: Vec<RankedEvent>,
    pub coupling_patterns: Vec<PatternFrequency>,
}

impl CommandOutput for RankingsOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![section_header("Convergence hotspots")];
        if self.hotspots.is_empty() {
            lines.push("  No convergent events.".to_string());
        }
        lines.extend(self.hotspots.iter().map(|e| format!("  {}", event_line(e))));

        lines.push(section_header("Systemic nodes"));
        if self.systemic_nodes.is_empty() {
            lines.push("  No systemic nodes.".to_string());
        }
        lines.extend(self.systemic_nodes.iter().map(|e| format!("  {}", event_line(e))));

        lines.push(section_header("Coupling patterns"));
        if self.coupling_patterns.is_empty() {
            lines.push("  No coupling patterns tagged.".to_string());
        }
        lines.extend(
            self.coupling_patterns
                .iter()
                .map(|p| format!("  {:>3}  {}", p.count, p.label)),
        );
        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct ScoreRow {
    pub event_id: String,
    pub networks: Vec<String>,
    pub ci_score: f64,
    pub classification: ConvergenceClass,
    pub recommended_action: &'static str,
    pub recommended_alert_level: AlertLevel,
}

impl From<&ConvergenceScore> for ScoreRow {
    fn from(score: &ConvergenceScore) -> Self {
        let classification = score.classification();
        Self {
            event_id: score.event_id.clone(),
            networks: score.networks.iter().map(|n| n.roman().to_string()).collect(),
            ci_score: score.ci_score(),
            classification,
            recommended_action: classification.recommended_action(),
            recommended_alert_level: score.recommended_alert_level(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ScoresOutput {
    pub scores: Vec<ScoreRow>,
}

impl CommandOutput for ScoresOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["event", "networks", "ci", "class", "alert", "action"]);
        for row in &self.scores {
            table.add_row(vec![
                row.event_id.clone(),
                row.networks.join(" "),
                format!("{:.1}", row.ci_score),
                row.classification.label().to_string(),
                colorize_alert(row.recommended_alert_level).to_string(),
                row.recommended_action.to_string(),
            ]);
        }
        render_list("convergence score", table, self.scores.len())
    }
}

pub async fn execute(args: ConvergenceArgs, ctx: &DashboardContext) -> Result<()> {
    match args.command {
        ConvergenceCommands::Matrix => {
            let matrix = ctx
                .load("Loading convergence matrix", ctx.api.convergence_matrix())
                .await
                .context("Failed to load convergence matrix")?;
            let heatmap = heatmap::render(&matrix)?;
            output(
                &MatrixOutput {
                    heatmap,
                    counts: matrix.matrix,
                },
                ctx.json,
            );
        }

        ConvergenceCommands::Rankings { filter } => {
            let filter = filter.to_aggregate_filter();
            let page = ctx
                .load("Loading events", ctx.api.list_events(&filter))
                .await
                .context("Failed to list events")?;
            let events = &page.items;
            output(
                &RankingsOutput {
                    hotspots: hotspots(events).into_iter().map(RankedEvent::from).collect(),
                    systemic_nodes: systemic_nodes(events)
                        .into_iter()
                        .map(RankedEvent::from)
                        .collect(),
                    coupling_patterns: coupling_pattern_frequency(events),
                },
                ctx.json,
            );
        }

        ConvergenceCommands::Scores => {
            let scores = ctx
                .load("Loading convergence scores", ctx.api.convergence_scores())
                .await
                .context("Failed to load convergence scores")?;
            let rows = rank_scores(&scores).into_iter().map(ScoreRow::from).collect();
            output(&ScoresOutput { scores: rows }, ctx.json);
        }
    }

    Ok(())
}
