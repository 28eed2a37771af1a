//! Conversion of CLI errors into miette reports.

use miette::Report;

use crate::error::CliError;

/// Convert a [`CliError`] into a report for the terminal.
///
/// Library errors keep their diagnostic codes and help text.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Analysis(e) => Report::new(e),
        CliError::Config(e) => match e.hint() {
            Some(hint) => miette::miette!(help = hint.to_string(), "Configuration error: {}", e),
            None => miette::miette!("Configuration error: {}", e),
        },
        CliError::FileNotFound(path) => miette::miette!(
            help = "Check the path, or generate stats with `webpack --json > stats.json`",
            "File not found: {}",
            path.display()
        ),
        _ => miette::miette!("{}", err),
    }
}
