//! Threshold definitions and gauge view.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;
use tracing::warn;

use crate::cli::context::DashboardContext;
use crate::cli::display::{
    colorize_status, gauge_bar, list_table, output, render_list, truncate_ellipsis,
    CommandOutput,
};
use crate::domain::models::{ThresholdDefinition, ThresholdStatus, ThresholdStatusEntry};
use crate::services::gauge::{classify, group_by_tier, GaugeReading};

#[derive(Args, Debug)]
pub struct ThresholdsArgs {
    #[command(subcommand)]
    pub command: ThresholdsCommands,
}

#[derive(Subcommand, Debug)]
pub enum ThresholdsCommands {
    /// Configured threshold definitions
    List,
    /// Active threshold crossings as gauges, most severe tier first
    Status,
}

#[derive(Debug, Serialize)]
pub struct DefinitionListOutput {
    pub definitions: Vec<ThresholdDefinition>,
}

impl CommandOutput for DefinitionListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["metric", "category", "networks", "threshold", "description"]);
        for def in &self.definitions {
            table.add_row(vec![
                def.name.clone(),
                def.category.as_str().to_string(),
                def.networks
                    .iter()
                    .map(|n| n.roman())
                    .collect::<Vec<_>>()
                    .join("\u{00b7}"),
                format!("{} {}", def.threshold_value, def.unit),
                truncate_ellipsis(&def.description, 60),
            ]);
        }
        render_list("threshold definition", table, self.definitions.len())
    }
}

#[derive(Debug, Serialize)]
pub struct GaugeRow {
    #[serde(flatten)]
    pub entry: ThresholdStatusEntry,
    /// `None` when the metric values cannot be drawn honestly.
    pub gauge: Option<GaugeReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gauge_error: Option<String>,
}

impl From<&ThresholdStatusEntry> for GaugeRow {
    fn from(entry: &ThresholdStatusEntry) -> Self {
        match classify(entry) {
            Ok(reading) => Self {
                entry: entry.clone(),
                gauge: Some(reading),
                gauge_error: None,
            },
            Err(err) => {
                warn!(metric = %entry.metric_name, event_id = %entry.event_id, "{err}");
                Self {
                    entry: entry.clone(),
                    gauge: None,
                    gauge_error: Some(err.to_string()),
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GaugeListOutput {
    pub rows: Vec<GaugeRow>,
}

impl GaugeListOutput {
    pub fn new(entries: &[ThresholdStatusEntry]) -> Self {
        Self {
            rows: group_by_tier(entries).into_iter().map(GaugeRow::from).collect(),
        }
    }
}

impl CommandOutput for GaugeListOutput {
    fn to_human(&self) -> String {
        if self.rows.is_empty() {
            return "No active threshold crossings.".to_string();
        }

        let mut lines = Vec::new();
        let mut tier: Option<ThresholdStatus> = None;
        for row in &self.rows {
            let entry = &row.entry;
            if tier != Some(entry.status) {
                tier = Some(entry.status);
                lines.push(String::new());
                lines.push(colorize_status(entry.status).to_string());
            }
            let gauge = match &row.gauge {
                Some(reading) => gauge_bar(reading),
                None => "invalid metric".to_string(),
            };
            lines.push(format!(
                "  {:<32} {}  {} / {} {}",
                truncate_ellipsis(&entry.metric_name, 32),
                gauge,
                entry.current_value,
                entry.threshold_value,
                entry.unit
            ));
            lines.push(format!(
                "  {:<32} {} \u{00b7} {}",
                "",
                entry.event_id,
                truncate_ellipsis(&entry.event_title, 60)
            ));
        }

        format!(
            "{} active crossing{}:{}",
            self.rows.len(),
            if self.rows.len() == 1 { "" } else { "s" },
            lines.join("\n")
        )
    }
}

pub async fn execute(args: ThresholdsArgs, ctx: &DashboardContext) -> Result<()> {
    match args.command {
        ThresholdsCommands::List => {
            let definitions = ctx
                .load("Loading thresholds", ctx.api.threshold_definitions())
                .await
                .context("Failed to list threshold definitions")?;
            output(&DefinitionListOutput { definitions }, ctx.json);
        }

        ThresholdsCommands::Status => {
            let entries = ctx
                .load("Loading threshold status", ctx.api.threshold_status())
                .await
                .context("Failed to load threshold status")?;
            output(&GaugeListOutput::new(&entries), ctx.json);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{AlertLevel, ThresholdCategory};
    use chrono::NaiveDate;

    fn entry(name: &str, current: f64, threshold: f64, status: ThresholdStatus) -> ThresholdStatusEntry {
        ThresholdStatusEntry {
            event_id: "evt-1".to_string(),
            event_title: "Lithium brine extraction".to_string(),
            metric_name: name.to_string(),
            category: ThresholdCategory::Absolute,
            baseline_value: 0.0,
            baseline_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            delta: current,
            current_value: current,
            threshold_value: threshold,
            unit: "%".to_string(),
            status,
            alert_level: AlertLevel::Alert,
            comparison: String::new(),
        }
    }

    #[test]
    fn test_rows_grouped_by_tier() {
        let entries = vec![
            entry("a", 10.0, 100.0, ThresholdStatus::Below),
            entry("b", 150.0, 100.0, ThresholdStatus::Exceeded),
            entry("c", 90.0, 100.0, ThresholdStatus::Approaching),
        ];
        let out = GaugeListOutput::new(&entries);
        let names: Vec<_> = out.rows.iter().map(|r| r.entry.metric_name.as_str()).collect();
        assert_eq!(names, ["b", "c", "a"]);
        let overshoot = out.rows[0].gauge.unwrap();
        assert!((overshoot.reported_percent - 120.0).abs() < f64::EPSILON);
        assert!((overshoot.display_percent - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_metric_is_isolated_to_its_row() {
        let entries = vec![
            entry("zero", 5.0, 0.0, ThresholdStatus::Exceeded),
            entry("ok", 50.0, 100.0, ThresholdStatus::Below),
        ];
        let out = GaugeListOutput::new(&entries);
        assert!(out.rows[0].gauge.is_none());
        assert!(out.rows[0].gauge_error.is_some());
        assert!(out.rows[1].gauge.is_some());

        console::set_colors_enabled(false);
        assert!(out.to_human().contains("invalid metric"));
    }

    #[test]
    fn test_empty_state() {
        assert_eq!(
            GaugeListOutput::new(&[]).to_human(),
            "No active threshold crossings."
        );
    }
}
