//! Resistance narrative classification.
//!
//! Purely a text-marker check; no date-based staleness is computed here.

use serde::Serialize;

use crate::domain::models::{Event, PENDING_MARKER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResistanceStatus {
    /// No narrative.
    Absent,
    /// Narrative carries the pending marker.
    Pending,
    /// Narrative present and complete.
    Present,
}

impl ResistanceStatus {
    pub fn classify(narrative: Option<&str>) -> Self {
        match narrative {
            None => Self::Absent,
            Some(text) if text.contains(PENDING_MARKER) => Self::Pending,
            Some(_) => Self::Present,
        }
    }

    /// Whether list views show the "resistance data present" indicator.
    pub const fn shows_indicator(self) -> bool {
        matches!(self, Self::Present)
    }
}

pub fn resistance_status(event: &Event) -> ResistanceStatus {
    ResistanceStatus::classify(event.resistance_summary.as_deref())
}
