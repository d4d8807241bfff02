//! Event list and detail commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Serialize;

use super::FilterArgs;
use crate::cli::context::DashboardContext;
use crate::cli::display::{
    colorize_alert, list_table, or_dash, output, render_list, resistance_marker, truncate_ellipsis,
    CommandOutput, DetailView,
};
use crate::domain::models::{Event, EventPage};
use crate::services::overview::RankedEvent;
use crate::services::resistance::{resistance_status, ResistanceStatus};

const TITLE_COLUMN_CHARS: usize = 48;

#[derive(Args, Debug)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommands,
}

#[derive(Subcommand, Debug)]
pub enum EventsCommands {
    /// List events matching the filter facets
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show full event detail
    Show {
        /// Event id
        id: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventListOutput {
    /// Canonical query key for this page
    pub query: String,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
    pub events: Vec<RankedEvent>,
}

impl EventListOutput {
    pub fn new(query: String, page: &EventPage) -> Self {
        Self {
            query,
            total: page.total,
            limit: page.limit,
            offset: page.offset,
            events: page.items.iter().map(RankedEvent::from).collect(),
        }
    }
}

impl CommandOutput for EventListOutput {
    fn to_human(&self) -> String {
        if self.events.is_empty() {
            return "No events match the current filters.".to_string();
        }
        let mut table = list_table(&["id", "title", "country", "ci", "networks", "alert", ""]);
        for event in &self.events {
            table.add_row(vec![
                event.event_id.clone(),
                truncate_ellipsis(&event.title, TITLE_COLUMN_CHARS),
                event.country.clone(),
                event.convergence_index.to_string(),
                event.network_codes.clone(),
                colorize_alert(event.alert_level).to_string(),
                resistance_marker(event.resistance),
            ]);
        }
        let shown_from = u64::from(self.offset) + 1;
        let shown_to = u64::from(self.offset) + self.events.len() as u64;
        format!(
            "{}\nShowing {}-{} of {}",
            render_list("event", table, self.events.len()),
            shown_from,
            shown_to,
            self.total
        )
    }
}

#[derive(Debug, Serialize)]
pub struct EventDetailOutput {
    #[serde(flatten)]
    pub event: Event,
    pub convergence_index: usize,
    pub resistance: ResistanceStatus,
}

impl From<Event> for EventDetailOutput {
    fn from(event: Event) -> Self {
        Self {
            convergence_index: event.convergence_index(),
            resistance: resistance_status(&event),
            event,
        }
    }
}

impl CommandOutput for EventDetailOutput {
    fn to_human(&self) -> String {
        let event = &self.event;
        let location = match &event.region {
            Some(region) => format!("{}, {}", region, event.country),
            None => event.country.clone(),
        };
        let coordinates = event
            .coordinates
            .map(|(lat, lon)| format!("{lat:.4}, {lon:.4}"));

        let resistance = match self.resistance {
            ResistanceStatus::Absent => "-".to_string(),
            ResistanceStatus::Pending => "Resistance data pending".to_string(),
            ResistanceStatus::Present => event.resistance_summary.clone().unwrap_or_default(),
        };

        let mut view = DetailView::new(&event.title)
            .field("ID", event.id.as_str())
            .field("Date", event.event_date.to_string())
            .field("Location", location)
            .field("Coordinates", or_dash(coordinates.as_deref()))
            .field("Alert", colorize_alert(event.alert_level).to_string())
            .field(
                "Convergence",
                format!("CI {} ({})", self.convergence_index, event.network_codes()),
            )
            .field("Networks", event.network_labels())
            .field(
                "Layers",
                event
                    .layers
                    .iter()
                    .map(|layer| layer.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
            .section("Summary")
            .item(event.summary.as_str())
            .section("Coupling patterns")
            .items(event.coupling_patterns.iter().map(|p| p.label()))
            .section("Threshold crossings")
            .items(event.threshold_crossings.iter().map(|crossing| {
                format!(
                    "{} {} ({} / {} {})",
                    colorize_alert(crossing.alert_level),
                    crossing.metric.name,
                    crossing.metric.current_value,
                    crossing.metric.threshold_value,
                    crossing.metric.unit
                )
            }))
            .section("Actors")
            .items(event.actors.iter().map(|actor| {
                format!("{} ({}, {})", actor.name, actor.actor_type, actor.role)
            }))
            .section("Context")
            .field("Resistance", resistance)
            .field_opt("Governance", event.governance_context.as_deref())
            .field_opt("30-day outlook", event.outlook_30d.as_deref())
            .section("Sources");

        for source in &event.sources {
            let tag = if source.provisional { " [provisional]" } else { "" };
            view = view.item(format!("T{} {}{}", u8::from(source.tier), source.citation(), tag));
        }

        view.render()
    }
}

pub async fn execute(args: EventsArgs, ctx: &DashboardContext) -> Result<()> {
    match args.command {
        EventsCommands::List { filter } => {
            let filter = filter.to_filter();
            let page = ctx
                .load("Loading events", ctx.api.list_events(&filter))
                .await
                .context("Failed to list events")?;
            output(&EventListOutput::new(filter.query_key(), &page), ctx.json);
        }

        EventsCommands::Show { id } => {
            let event = ctx
                .load("Loading event", ctx.api.get_event(&id))
                .await
                .with_context(|| format!("Failed to load event {id}"))?;
            output(&EventDetailOutput::from(event), ctx.json);
        }
    }

    Ok(())
}

/// Compact one-line rendering used by other views.
pub fn event_line(event: &RankedEvent) -> String {
    format!(
        "{} {} {} (CI {}, {}) {}",
        colorize_alert(event.alert_level),
        event.event_id,
        truncate_ellipsis(&event.title, TITLE_COLUMN_CHARS),
        event.convergence_index,
        event.network_codes,
        resistance_marker(event.resistance)
    )
    .trim_end()
    .to_string()
}
