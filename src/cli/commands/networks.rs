//! Metabolic network commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use super::{parse_network, FilterArgs};
use crate::cli::context::DashboardContext;
use crate::cli::display::{
    colorize_alert, list_table, output, render_list, resistance_marker, truncate_ellipsis,
    CommandOutput, DetailView,
};
use crate::domain::models::{MetabolicNetwork, NetworkDetail, NetworkSummary};
use crate::services::convergence::summarize_networks;
use crate::services::resistance::ResistanceStatus;

#[derive(Args, Debug)]
pub struct NetworksArgs {
    #[command(subcommand)]
    pub command: NetworksCommands,
}

#[derive(Subcommand, Debug)]
pub enum NetworksCommands {
    /// Per-network counts and highest alert
    List {
        /// Aggregate locally from the filtered event feed
        #[arg(long)]
        local: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Events per analytical layer and resistance spotlight
    Show {
        /// Network id (1-8)
        #[arg(value_parser = parse_network)]
        network: MetabolicNetwork,
    },
}

#[derive(Debug, Serialize)]
pub struct NetworkListOutput {
    pub source: &'static str,
    pub networks: Vec<NetworkSummary>,
}

impl CommandOutput for NetworkListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["", "network", "events", "convergent", "crossings", "max alert"]);
        for network in &self.networks {
            table.add_row(vec![
                network.roman.clone(),
                network.label.clone(),
                network.event_count.to_string(),
                network.convergent_count.to_string(),
                network.threshold_crossings.to_string(),
                colorize_alert(network.max_alert).to_string(),
            ]);
        }
        render_list("network", table, self.networks.len())
    }
}

#[derive(Debug, Serialize)]
pub struct NetworkDetailOutput {
    #[serde(flatten)]
    pub detail: NetworkDetail,
}

impl CommandOutput for NetworkDetailOutput {
    fn to_human(&self) -> String {
        let detail = &self.detail;
        let mut view = DetailView::new(&format!("{}: {}", detail.roman, detail.label))
            .field("Events", detail.event_count.to_string());

        for (layer, events) in &detail.layers {
            view = view.section(&format!("Layer: {}", layer.as_str()));
            if events.is_empty() {
                view = view.item("No events in this layer.");
            }
            for event in events {
                view = view.item(format!(
                    "{} {} {} \u{00b7} {} ({})",
                    colorize_alert(event.alert_level),
                    event.id,
                    truncate_ellipsis(&event.title, 56),
                    event.country,
                    event.event_date
                ));
            }
        }

        view = view.section("Resistance spotlight");
        if detail.resistance_spotlight.is_empty() {
            view = view.item("No resistance narratives recorded.");
        }
        for entry in &detail.resistance_spotlight {
            let status = ResistanceStatus::classify(entry.resistance_summary.as_deref());
            view = view.item(
                format!(
                    "{} {} \u{00b7} {} {}",
                    entry.id,
                    truncate_ellipsis(&entry.title, 56),
                    entry.country,
                    resistance_marker(status)
                )
                .trim_end()
                .to_string(),
            );
        }

        view.render()
    }
}

pub async fn execute(args: NetworksArgs, ctx: &DashboardContext) -> Result<()> {
    match args.command {
        NetworksCommands::List { local: false, .. } => {
            let networks = ctx
                .load("Loading networks", ctx.api.list_networks())
                .await
                .context("Failed to list networks")?;
            output(
                &NetworkListOutput {
                    source: "service",
                    networks,
                },
                ctx.json,
            );
        }

        NetworksCommands::List { local: true, filter } => {
            let filter = filter.to_aggregate_filter();
            let page = ctx
                .load("Loading events", ctx.api.list_events(&filter))
                .await
                .context("Failed to list events")?;
            output(
                &NetworkListOutput {
                    source: "local",
                    networks: summarize_networks(&page.items),
                },
                ctx.json,
            );
        }

        NetworksCommands::Show { network } => {
            let detail = ctx
                .load("Loading network", ctx.api.get_network(network.id()))
                .await
                .with_context(|| format!("Failed to load network {}", network.roman()))?;
            output(&NetworkDetailOutput { detail }, ctx.json);
        }
    }

    Ok(())
}
