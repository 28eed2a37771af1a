//! Configuration for heft bundle analysis.
//!
//! Options are layered with figment, lowest priority first:
//!
//! 1. built-in defaults
//! 2. `heft.config.json` or `heft.config.toml` (or an explicit path)
//! 3. `HEFT_*` environment variables (`HEFT_OUTPUT__CHUNK_FORMAT` for nested keys)
//! 4. programmatic overrides, usually from CLI flags
//!
//! ```no_run
//! use heft_config::{AnalysisOptions, OptionOverrides};
//!
//! let options = AnalysisOptions::load(None, &OptionOverrides::default())?;
//! options.validate()?;
//! # Ok::<(), heft_config::ConfigError>(())
//! ```

pub mod error;
pub mod options;
pub mod validation;

pub use error::{ConfigError, Result};
pub use options::{
    AnalysisOptions, CONFIG_FILE_NAMES, ENV_PREFIX, OptionOverrides, OutputSettings,
};
pub use validation::{BUNDLE_NAME_PATTERN, validate_bundle_name};
