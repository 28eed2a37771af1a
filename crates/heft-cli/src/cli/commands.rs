use std::path::PathBuf;

use clap::{Args, Subcommand};
use heft_config::{OptionOverrides, OutputSettings};

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a bundler stats file
    ///
    /// Produces one document per compilation. Documents are written to the
    /// report directory, or with --dry-run emitted as `<bundle>-stats.json`
    /// next to the build output.
    Analyze(AnalyzeArgs),

    /// Validate configuration without analyzing
    Check(CheckArgs),

    /// Print the cross-build comparison key of each filename
    Normalize(NormalizeArgs),
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Stats file produced by `webpack --json` or `rspack --json`
    #[arg(value_name = "STATS")]
    pub stats: PathBuf,

    /// Config file (defaults to heft.config.json or heft.config.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base bundle name
    #[arg(short = 'n', long, value_name = "NAME")]
    pub bundle_name: Option<String>,

    /// Emit the document next to the build output instead of the report directory
    #[arg(long)]
    pub dry_run: bool,

    /// Chunk format to report (e.g. commonjs, module), overriding the stats
    #[arg(long, value_name = "FMT")]
    pub chunk_format: Option<String>,

    /// Directory holding the build output (defaults to the stats outputPath)
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Directory persisted reports are written to
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,
}

impl AnalyzeArgs {
    /// Flags that were actually given, as the top configuration layer.
    pub fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            bundle_name: self.bundle_name.clone(),
            dry_run: self.dry_run.then_some(true),
            report_dir: self.report_dir.clone(),
            output: OutputSettings {
                chunk_format: self.chunk_format.clone(),
                ..OutputSettings::default()
            },
            ..OptionOverrides::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Config file (defaults to heft.config.json or heft.config.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Filenames to normalize
    #[arg(required = true, value_name = "FILENAME")]
    pub filenames: Vec<String>,

    /// Filename template the names were produced with (e.g. "[name].[contenthash:8].js")
    #[arg(short, long, value_name = "TEMPLATE")]
    pub template: Option<String>,
}
