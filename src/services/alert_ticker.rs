//! High-severity ticker selection.
//!
//! Unlike list views, an empty ticker is suppressed entirely: `ticker`
//! returns `None` rather than an empty list so callers render nothing.

use serde::Serialize;

use crate::domain::models::{AlertLevel, Event};

/// Lowest severity shown on the ticker.
pub const TICKER_FLOOR: AlertLevel = AlertLevel::Critical;

/// Title length (in characters) before truncation.
pub const TITLE_MAX_CHARS: usize = 60;

pub const ELLIPSIS: char = '\u{2026}';

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickerItem {
    pub event_id: String,
    pub alert_level: AlertLevel,
    pub country: String,
    pub title: String,
}

/// Truncate to `max_chars` characters, appending an ellipsis when cut.
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    match title.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut truncated = title[..cut].to_string();
            truncated.push(ELLIPSIS);
            truncated
        }
        None => title.to_string(),
    }
}

/// CRITICAL and SYSTEMIC events in feed order, or `None` if there are none.
pub fn ticker(events: &[Event]) -> Option<Vec<TickerItem>> {
    let items: Vec<TickerItem> = events
        .iter()
        .filter(|e| e.alert_level.is_at_least(TICKER_FLOOR))
        .map(|e| TickerItem {
            event_id: e.id.clone(),
            alert_level: e.alert_level,
            country: e.country.clone(),
            title: truncate_title(&e.title, TITLE_MAX_CHARS),
        })
        .collect();
    (!items.is_empty()).then_some(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::event::fixtures::event_with_networks;

    fn event(id: &str, level: AlertLevel, title: &str) -> Event {
        let mut e = event_with_networks(id, &[1]);
        e.alert_level = level;
        e.title = title.to_string();
        e
    }

    #[test]
    fn test_selects_top_two_tiers() {
        let events = vec![
            event("a", AlertLevel::Alert, "a"),
            event("b", AlertLevel::Systemic, "b"),
            event("c", AlertLevel::Watch, "c"),
            event("d", AlertLevel::Critical, "d"),
        ];
        let items = ticker(&events).unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.event_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d"]);
    }

    #[test]
    fn test_empty_selection_suppresses_ticker() {
        let events = vec![event("a", AlertLevel::Alert, "a")];
        assert_eq!(ticker(&events), None);
        assert_eq!(ticker(&[]), None);
    }

    #[test]
    fn test_truncate_title() {
        let exact = "x".repeat(60);
        assert_eq!(truncate_title(&exact, 60), exact);

        let long = "y".repeat(61);
        let cut = truncate_title(&long, 60);
        assert_eq!(cut.chars().count(), 61);
        assert!(cut.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let title = "ç".repeat(70);
        let cut = truncate_title(&title, 60);
        assert_eq!(cut.chars().filter(|c| *c == 'ç').count(), 60);
    }
}
