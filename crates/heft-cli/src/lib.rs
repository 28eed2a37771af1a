//! Heft CLI.
//!
//! The binary is a host for the heft analysis plugin: it reads a webpack or
//! rspack stats file, drives the build hooks once per compilation, and waits
//! for every report to be persisted before exiting.
//!
//! - [`cli`] - argument definitions
//! - [`commands`] - `analyze`, `check`, `normalize`
//! - [`error`] - error types and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status messages and summaries

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};

/// Plugin name reported in documents and log lines.
pub const PLUGIN_NAME: &str = "heft";
