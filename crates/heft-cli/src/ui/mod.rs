//! Terminal output: status messages and analysis summaries.
//!
//! Everything here writes to stderr; stdout is reserved for command output.

mod format;
mod messages;

pub use format::{format_size, format_timestamp, print_analysis_summary};
pub use messages::{debug, info, success, warning};

/// Apply the color decision globally. Call once, early in `main`.
pub fn init_colors(no_color: bool) {
    owo_colors::set_override(!no_color && crate::logger::should_use_colors());
}
