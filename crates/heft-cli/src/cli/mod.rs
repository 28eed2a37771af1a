//! Command-line interface definition.
//!
//! - `heft analyze` - normalize a stats file and persist or emit the report
//! - `heft check` - validate configuration
//! - `heft normalize` - print comparison keys for filenames

mod commands;

use clap::Parser;

pub use commands::{AnalyzeArgs, CheckArgs, Command, NormalizeArgs};

/// Heft - normalized bundle stats for cross-build comparison
#[derive(Parser, Debug)]
#[command(
    name = "heft",
    version,
    about = "Normalized bundle stats for cross-build comparison",
    long_about = "Heft reads the JSON stats a webpack or rspack build produces and turns them\n\
                  into a stable document of assets, chunks and modules that can be diffed\n\
                  across builds."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}
