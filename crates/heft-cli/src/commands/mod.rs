//! Command implementations.
//!
//! - [`analyze`] - drive the analysis plugin over a stats file
//! - [`check`] - configuration validation
//! - [`normalize`] - filename comparison keys

pub mod analyze;
pub mod check;
pub mod normalize;

pub use analyze::execute as analyze_execute;
pub use check::execute as check_execute;
pub use normalize::execute as normalize_execute;
