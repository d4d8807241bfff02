//! Geographic marker layer.
//!
//! Markers are projected onto the configured canvas; the terminal view
//! downsamples that canvas to a character grid.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use super::FilterArgs;
use crate::cli::context::DashboardContext;
use crate::cli::display::{colorize_alert, count_label, list_table, output, truncate_ellipsis, CommandOutput};
use crate::domain::models::AlertLevel;
use crate::services::geo::{GeoProjector, MapLayer, Marker};

const GRID_COLUMNS: usize = 72;
const GRID_ROWS: usize = 18;

#[derive(Args, Debug)]
pub struct MapArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Skip the character-grid sketch
    #[arg(long)]
    pub no_grid: bool,
}

#[derive(Debug, Serialize)]
pub struct MapOutput {
    pub canvas_width: f64,
    pub canvas_height: f64,
    #[serde(flatten)]
    pub layer: MapLayer,
    #[serde(skip)]
    pub grid: Option<Vec<String>>,
}

impl CommandOutput for MapOutput {
    fn to_human(&self) -> String {
        let mut lines = Vec::new();

        if let Some(grid) = &self.grid {
            let border = format!("+{}+", "-".repeat(GRID_COLUMNS));
            lines.push(border.clone());
            lines.extend(grid.iter().map(|row| format!("|{row}|")));
            lines.push(border);
        }

        if self.layer.markers.is_empty() {
            lines.push("No events with location data.".to_string());
        } else {
            let mut table = list_table(&["event", "title", "x", "y", "radius", "alert"]);
            for marker in &self.layer.markers {
                table.add_row(vec![
                    marker.event_id.clone(),
                    truncate_ellipsis(&marker.title, 40),
                    format!("{:.1}", marker.point.x),
                    format!("{:.1}", marker.point.y),
                    format!("{:.0}", marker.radius),
                    colorize_alert(marker.alert_level).to_string(),
                ]);
            }
            lines.push(table.to_string());
        }

        if self.layer.unlocated > 0 {
            lines.push(format!(
                "{} without location data",
                count_label(self.layer.unlocated, "event", "events")
            ));
        }

        lines.join("\n")
    }
}

/// Downsample marker positions onto a `columns x rows` character grid.
///
/// Where markers share a cell the most severe one wins. A grid with no
/// rows or no columns renders as no lines.
pub fn sketch(
    markers: &[Marker],
    projector: &GeoProjector,
    columns: usize,
    rows: usize,
) -> Vec<String> {
    if columns == 0 || rows == 0 {
        return Vec::new();
    }
    let mut cells: Vec<Vec<Option<AlertLevel>>> = vec![vec![None; columns]; rows];
    for marker in markers {
        let col = scale(marker.point.x, projector.width(), columns);
        let row = scale(marker.point.y, projector.height(), rows);
        let Some(cell) = cells.get_mut(row).and_then(|r| r.get_mut(col)) else {
            continue;
        };
        if cell.map_or(true, |current| marker.alert_level > current) {
            *cell = Some(marker.alert_level);
        }
    }
    cells
        .into_iter()
        .map(|row| row.into_iter().map(glyph).collect())
        .collect()
}

fn scale(position: f64, extent: f64, cells: usize) -> usize {
    let index = (position / extent * cells as f64).floor();
    if index.is_finite() && index > 0.0 {
        (index as usize).min(cells.saturating_sub(1))
    } else {
        0
    }
}

const fn glyph(level: Option<AlertLevel>) -> char {
    match level {
        None => ' ',
        Some(AlertLevel::Watch | AlertLevel::Monitor) => '.',
        Some(AlertLevel::Alert) => 'o',
        Some(AlertLevel::Critical) => 'O',
        Some(AlertLevel::Systemic) => '@',
    }
}

pub async fn execute(args: MapArgs, ctx: &DashboardContext) -> Result<()> {
    let filter = args.filter.to_aggregate_filter();
    let page = ctx
        .load("Loading events", ctx.api.list_events(&filter))
        .await
        .context("Failed to list events")?;

    let projector = ctx.projector();
    let layer = projector.layer(&page.items);
    let grid = (!args.no_grid && !ctx.json)
        .then(|| sketch(&layer.markers, &projector, GRID_COLUMNS, GRID_ROWS));

    output(
        &MapOutput {
            canvas_width: projector.width(),
            canvas_height: projector.height(),
            layer,
            grid,
        },
        ctx.json,
    );

    Ok(())
}
