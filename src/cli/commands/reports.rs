//! Report archive and generation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::context::DashboardContext;
use crate::cli::display::{action_success, list_table, output, render_list, CommandOutput};
use crate::domain::models::{GeneratedReport, Report, ReportRequest};

#[derive(Args, Debug)]
pub struct ReportsArgs {
    #[command(subcommand)]
    pub command: ReportsCommands,
}

/// Optional date window for generated reports.
#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Start of the reporting window (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<NaiveDate>,

    /// End of the reporting window (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<NaiveDate>,
}

impl WindowArgs {
    fn to_request(&self) -> Result<ReportRequest> {
        if let (Some(since), Some(until)) = (self.since, self.until) {
            if since > until {
                bail!("--since ({since}) is after --until ({until})");
            }
        }
        Ok(ReportRequest {
            since: self.since,
            until: self.until,
            event_id: None,
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum ReportsCommands {
    /// Archived reports
    List,
    /// Generate a situation briefing
    Briefing {
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Generate a flash alert for one event
    FlashAlert {
        /// Event id
        event_id: String,
    },
    /// Generate a convergence report
    Convergence {
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Download an archived report
    Download {
        /// Archive filename as listed by `reports list`
        filename: String,

        /// Destination path (defaults to the archive filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Serialize)]
pub struct ReportListOutput {
    pub reports: Vec<Report>,
}

impl CommandOutput for ReportListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "type", "created", "filename"]);
        for report in &self.reports {
            table.add_row(vec![
                report.id.clone(),
                report.report_type.clone(),
                report.created_at.clone(),
                report.filename.clone(),
            ]);
        }
        render_list("report", table, self.reports.len())
    }
}

#[derive(Debug, Serialize)]
pub struct ReportGeneratedOutput {
    pub kind: &'static str,
    #[serde(flatten)]
    pub report: GeneratedReport,
}

impl CommandOutput for ReportGeneratedOutput {
    fn to_human(&self) -> String {
        action_success(&format!(
            "Generated {} {} ({})",
            self.kind, self.report.report_id, self.report.filename
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct DownloadOutput {
    pub filename: String,
    pub path: PathBuf,
    pub bytes: usize,
}

impl CommandOutput for DownloadOutput {
    fn to_human(&self) -> String {
        action_success(&format!(
            "Saved {} to {} ({} bytes)",
            self.filename,
            self.path.display(),
            self.bytes
        ))
    }
}

pub async fn execute(args: ReportsArgs, ctx: &DashboardContext) -> Result<()> {
    match args.command {
        ReportsCommands::List => {
            let reports = ctx
                .load("Loading reports", ctx.api.list_reports())
                .await
                .context("Failed to load reports")?;
            output(&ReportListOutput { reports }, ctx.json);
        }

        ReportsCommands::Briefing { window } => {
            let request = window.to_request()?;
            let report = ctx
                .load("Generating briefing", ctx.api.generate_briefing(&request))
                .await
                .context("Failed to generate briefing")?;
            output(
                &ReportGeneratedOutput {
                    kind: "briefing",
                    report,
                },
                ctx.json,
            );
        }

        ReportsCommands::FlashAlert { event_id } => {
            let report = ctx
                .load(
                    "Generating flash alert",
                    ctx.api.generate_flash_alert(&event_id),
                )
                .await
                .with_context(|| format!("Failed to generate flash alert for {event_id}"))?;
            output(
                &ReportGeneratedOutput {
                    kind: "flash alert",
                    report,
                },
                ctx.json,
            );
        }

        ReportsCommands::Convergence { window } => {
            let request = window.to_request()?;
            let report = ctx
                .load(
                    "Generating convergence report",
                    ctx.api.generate_convergence_report(&request),
                )
                .await
                .context("Failed to generate convergence report")?;
            output(
                &ReportGeneratedOutput {
                    kind: "convergence report",
                    report,
                },
                ctx.json,
            );
        }

        ReportsCommands::Download { filename, output: dest } => {
            let bytes = ctx
                .load("Downloading report", ctx.api.download_report(&filename))
                .await
                .with_context(|| format!("Failed to download {filename}"))?;
            let path = dest.unwrap_or_else(|| PathBuf::from(&filename));
            tokio::fs::write(&path, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output(
                &DownloadOutput {
                    filename,
                    path,
                    bytes: bytes.len(),
                },
                ctx.json,
            );
        }
    }

    Ok(())
}
