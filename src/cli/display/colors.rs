//! Severity, tier, and heat color mapping for CLI output.
//!
//! `console` disables styling automatically when stdout is not a terminal or
//! `NO_COLOR` is set.

use console::{style, StyledObject};

use crate::domain::models::{AlertLevel, ThresholdStatus};
use crate::services::gauge::{GaugeColor, GaugeTreatment};
use crate::services::resistance::ResistanceStatus;

/// Returns a styled string for an alert level.
///
/// Color scheme:
/// - Dim:     WATCH
/// - Blue:    MONITOR
/// - Yellow:  ALERT
/// - Red:     CRITICAL
/// - Magenta: SYSTEMIC (bold)
pub fn colorize_alert(level: AlertLevel) -> StyledObject<&'static str> {
    let text = level.as_str();
    match level {
        AlertLevel::Watch => style(text).dim(),
        AlertLevel::Monitor => style(text).blue(),
        AlertLevel::Alert => style(text).yellow(),
        AlertLevel::Critical => style(text).red().bold(),
        AlertLevel::Systemic => style(text).magenta().bold(),
    }
}

pub fn colorize_status(status: ThresholdStatus) -> StyledObject<&'static str> {
    apply_treatment(style(status.as_str()), GaugeTreatment::for_status(status))
}

/// Apply a gauge treatment to any displayable value.
pub fn apply_treatment<D>(styled: StyledObject<D>, treatment: GaugeTreatment) -> StyledObject<D> {
    let styled = match treatment.color {
        GaugeColor::Green => styled.green(),
        GaugeColor::Amber => styled.yellow(),
        GaugeColor::Red => styled.red(),
    };
    if treatment.bold {
        styled.bold()
    } else {
        styled
    }
}

/// Marker shown in list views next to events with resistance data.
pub fn resistance_marker(status: ResistanceStatus) -> String {
    match status {
        ResistanceStatus::Present => style("\u{270a}").green().to_string(),
        ResistanceStatus::Pending => style("pending").dim().italic().to_string(),
        ResistanceStatus::Absent => String::new(),
    }
}

/// Styled label for detail views (bold + dimmed colon).
pub fn label(name: &str) -> String {
    format!("{}{}", style(name).bold(), style(":").dim())
}

/// Section header with underline.
pub fn section_header(title: &str) -> String {
    format!("\n{}", style(title).bold().underlined())
}
