//! Per-view request state.
//!
//! A `ViewSlot` tracks what a view should show and which request it is
//! waiting for. Each `begin` hands out a ticket; results carrying an older
//! ticket are discarded instead of rendered, which is how navigating away or
//! re-querying cancels a stale response.

use tracing::debug;

use crate::domain::errors::{DashboardError, DashboardResult};
use crate::domain::models::{ConvergenceMatrix, Event, EventPage, NetworkDetail, PipelineStatus};

/// Data that can be a valid-but-empty result.
pub trait ViewData {
    fn is_empty_result(&self) -> bool {
        false
    }
}

impl<T> ViewData for Vec<T> {
    fn is_empty_result(&self) -> bool {
        self.is_empty()
    }
}

impl ViewData for EventPage {
    fn is_empty_result(&self) -> bool {
        self.items.is_empty()
    }
}

impl ViewData for ConvergenceMatrix {
    fn is_empty_result(&self) -> bool {
        self.labels.is_empty()
    }
}

impl ViewData for PipelineStatus {
    fn is_empty_result(&self) -> bool {
        self.latest_run().is_none()
    }
}

impl ViewData for Event {}

impl ViewData for NetworkDetail {}

/// What a view renders.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    /// Nothing requested yet.
    NotQueried,
    Loading,
    Ready(T),
    /// Queried and found nothing. Not an error.
    Empty,
    Failed {
        error: DashboardError,
        /// Last successful data, kept so a failure never blanks the view.
        last_good: Option<T>,
    },
}

impl<T> ViewState<T> {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            Self::Failed {
                last_good: Some(data),
                ..
            } => Some(data),
            _ => None,
        }
    }
}

/// Identifies one request issued for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket(u64);

#[derive(Debug)]
pub struct ViewSlot<T> {
    generation: u64,
    state: ViewState<T>,
    last_good: Option<T>,
}

impl<T> Default for ViewSlot<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            state: ViewState::NotQueried,
            last_good: None,
        }
    }
}

impl<T: Clone + ViewData> ViewSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// Start a request, superseding any earlier one.
    pub fn begin(&mut self) -> RequestTicket {
        self.generation += 1;
        self.state = ViewState::Loading;
        RequestTicket(self.generation)
    }

    /// Apply a result if `ticket` is still current. Returns whether it was applied.
    pub fn resolve(&mut self, ticket: RequestTicket, result: DashboardResult<T>) -> bool {
        if ticket.0 != self.generation {
            debug!(
                ticket = ticket.0,
                current = self.generation,
                "discarding superseded result"
            );
            return false;
        }
        self.state = match result {
            Ok(data) if data.is_empty_result() => {
                self.last_good = None;
                ViewState::Empty
            }
            Ok(data) => {
                self.last_good = Some(data.clone());
                ViewState::Ready(data)
            }
            Err(error) => ViewState::Failed {
                error,
                last_good: self.last_good.clone(),
            },
        };
        true
    }

    /// The view went away: pending results must not be applied.
    pub fn abandon(&mut self) {
        self.generation += 1;
        self.state = ViewState::NotQueried;
    }
}
