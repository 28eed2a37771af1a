//! Heft CLI - normalized bundle stats from a bundler's `--json` output.
//!
//! Parses arguments, installs logging, and dispatches to a command.

use clap::Parser;
use heft_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Analyze(analyze_args) => commands::analyze_execute(analyze_args).await,
        cli::Command::Check(check_args) => commands::check_execute(check_args).await,
        cli::Command::Normalize(normalize_args) => commands::normalize_execute(normalize_args),
    };

    result.map_err(error::cli_error_to_miette)
}
