//! Loading spinners using indicatif.
//!
//! Spinners draw to stderr and are hidden in JSON mode so that stdout stays
//! machine-readable.

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ";

/// Create a spinner for an in-flight request.
pub fn create_spinner(message: &str, hidden: bool) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if hidden {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        pb.set_draw_target(ProgressDrawTarget::stderr());
    }
    let style = ProgressStyle::default_spinner()
        .template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_CHARS);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Show a spinner while `fut` runs; it is cleared on completion either way.
pub async fn with_spinner<F, T>(message: &str, hidden: bool, fut: F) -> T
where
    F: Future<Output = T>,
{
    let pb = create_spinner(message, hidden);
    let result = fut.await;
    pb.finish_and_clear();
    result
}
