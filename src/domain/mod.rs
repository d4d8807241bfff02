//! Domain layer for the dashboard
//!
//! Fixed vocabulary, entity snapshots, the error taxonomy, and the port the
//! fetch layer implements.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DashboardError, DashboardResult};
