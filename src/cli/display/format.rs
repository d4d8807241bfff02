//! Text formatters for gauges, heat cells, and counts.

use crate::services::gauge::GaugeReading;
use crate::services::heatmap::MAX_BUCKET;

use super::colors::apply_treatment;

/// Width of a gauge bar in terminal cells.
pub const GAUGE_WIDTH: usize = 20;

/// Heat glyphs for buckets 0..=4.
const HEAT_GLYPHS: [char; 5] = ['\u{00b7}', '\u{2591}', '\u{2592}', '\u{2593}', '\u{2588}'];

/// Render a gauge bar from its clamped display percentage plus the capped
/// label, e.g. `[#############-------]  64%`.
pub fn gauge_bar(reading: &GaugeReading) -> String {
    let filled = filled_cells(reading.display_percent, GAUGE_WIDTH);
    let bar = format!(
        "{}{}",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(GAUGE_WIDTH - filled)
    );
    format!(
        "{} {:>4.0}%",
        apply_treatment(console::style(bar), reading.treatment),
        reading.reported_percent
    )
}

/// Cells to fill for a `0..=100` percentage.
pub fn filled_cells(display_percent: f64, width: usize) -> usize {
    let cells = (display_percent / 100.0 * width as f64).round();
    if cells.is_finite() {
        (cells.max(0.0) as usize).min(width)
    } else {
        0
    }
}

/// Glyph for a heatmap bucket.
pub fn heat_glyph(bucket: u8) -> char {
    HEAT_GLYPHS[usize::from(bucket.min(MAX_BUCKET))]
}

/// Truncate a string with unicode ellipsis, counting characters.
pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}\u{2026}")
    }
}

/// Format a count with label: "1 event", "3 events".
pub fn count_label(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{} {}", n, singular)
    } else {
        format!("{} {}", n, plural)
    }
}

/// `-` for missing values.
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}
