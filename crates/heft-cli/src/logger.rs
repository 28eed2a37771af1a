//! Logging setup for the heft CLI.
//!
//! Log lines go to stderr so command output on stdout stays pipeable.
//!
//! Level selection, first match wins:
//! 1. `--verbose`: debug for heft crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. info for heft crates

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "heft=debug,heft_config=debug,heft_cli=debug";
const QUIET_FILTER: &str = "heft=error,heft_config=error,heft_cli=error";
const DEFAULT_FILTER: &str = "heft=info,heft_config=info,heft_cli=info";

/// Build the filter for the given flags.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. Call once, before any logging.
///
/// ```rust,no_run
/// use heft_cli::logger::init_logger;
///
/// init_logger(false, false, false);
/// ```
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .try_init();
}

/// Whether stderr should get ANSI colors.
///
/// `NO_COLOR` disables, `FORCE_COLOR` enables, otherwise terminal detection.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stderr().features().colors_supported()
}
