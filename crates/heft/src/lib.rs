#![cfg_attr(docsrs, feature(doc_cfg))]

//! # heft
//!
//! Turns a bundler's raw build statistics into a stable, cross-reference
//! consistent [`BundleStatsDocument`] that can be diffed across builds.
//!
//! ## Quick Start
//!
//! ### Run the pipeline directly
//!
//! ```no_run
//! use heft::{BundleAnalysis, AnalysisConfig, PluginInfo, StatsSnapshot};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let json = std::fs::read_to_string("stats.json")?;
//! let snapshot = StatsSnapshot::from_json(&json)?.remove(0);
//!
//! let mut analysis = BundleAnalysis::new(AnalysisConfig::new(
//!     "my-app",
//!     PluginInfo::new("heft", "0.1.0"),
//! ));
//! analysis.start();
//! analysis.analyze(&snapshot)?;
//! let document = analysis.finalize().expect("analysis ran");
//! println!("{}", document.to_json_pretty()?);
//! # Ok(()) }
//! ```
//!
//! ### Tap into a host's hooks
//!
//! ```no_run
//! use std::sync::Arc;
//! use heft::{AnalysisConfig, BundleAnalysisPlugin, Hooks, JsonFileSink, PluginInfo};
//!
//! let mut hooks = Hooks::new();
//! let plugin = BundleAnalysisPlugin::new(
//!     AnalysisConfig::new("my-app", PluginInfo::new("heft", "0.1.0")),
//!     Arc::new(JsonFileSink::new(".heft")),
//! );
//! plugin.apply(&mut hooks);
//! ```

pub mod assets;
pub mod chunks;
pub mod clock;
pub mod compression;
pub mod document;
pub mod filename;
pub mod lifecycle;
pub mod modules;
pub mod naming;
pub mod output;
pub mod stats;

// Logging utilities (optional, enabled with "logging" feature)
#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub use logging::{LogLevel, init_logging, init_logging_from_env};

pub use assets::normalize_assets;
pub use chunks::{ChunkIdMap, ResolvedChunks, resolve_chunks};
pub use clock::{Clock, SystemClock};
pub use document::{Asset, BundleStatsDocument, BundlerInfo, Chunk, Module, PluginInfo};
pub use filename::{FilenameTemplate, find_filename_format, normalize_filename};
pub use lifecycle::{
    AnalysisConfig, AssetEmitter, BundleAnalysis, BundleAnalysisPlugin, HookRegistry, Hooks,
    PendingPersists, Phase,
};
pub use modules::normalize_modules;
pub use naming::{ChunkFormat, compose_bundle_name};
pub use output::{JsonFileSink, StatsSink, stats_file_name};
pub use stats::{
    ChunkRef, OutputOptions, StatsAsset, StatsChunk, StatsModule, StatsSnapshot, StatsSource,
};

/// Error types for heft operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stats input did not have the expected shape.
    #[error("Invalid stats: {0}")]
    InvalidStats(String),

    /// Analysis was requested for a build attempt that never started.
    #[error("Analysis requested before the build started")]
    NotStarted,

    /// Invalid output path (e.g., directory traversal attempt).
    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    /// File write operation failed.
    #[error("Write failure: {0}")]
    WriteFailure(String),
}

/// Result type alias for heft operations.
pub type Result<T> = std::result::Result<T, Error>;

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Json(_) => "JSON_ERROR",
            Error::InvalidStats(_) => "INVALID_STATS",
            Error::NotStarted => "NOT_STARTED",
            Error::InvalidOutputPath(_) => "INVALID_OUTPUT_PATH",
            Error::WriteFailure(_) => "WRITE_FAILURE",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::Json(_) | Error::InvalidStats(_) => Some(Box::new(
                "Generate stats with `webpack --json` or `rspack --json` and pass the file unmodified.",
            )),
            Error::NotStarted => Some(Box::new(
                "Call `start()` (or fire the build-start hook) before the asset-processing stage.",
            )),
            Error::InvalidOutputPath(path) => Some(Box::new(format!(
                "The output path '{}' is invalid. Ensure it doesn't contain '..' components.",
                path
            ))),
            Error::WriteFailure(msg) => Some(Box::new(format!(
                "Failed to write file. Check disk space and permissions.\nError: {}",
                msg
            ))),
            _ => None,
        }
    }
}
