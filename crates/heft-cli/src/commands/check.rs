//! Check command implementation.

use heft_config::{AnalysisOptions, CONFIG_FILE_NAMES, OptionOverrides};
use std::path::Path;

use crate::cli::CheckArgs;
use crate::error::Result;
use crate::ui;

/// Load options from every layer and validate them.
pub async fn execute(args: CheckArgs) -> Result<()> {
    ui::info("Checking configuration...");

    match args.config.as_deref() {
        Some(path) => ui::info(&format!("Using {}", path.display())),
        None => match CONFIG_FILE_NAMES.iter().find(|name| Path::new(name).is_file()) {
            Some(name) => ui::info(&format!("Using {}", name)),
            None => ui::warning("No heft.config.json or heft.config.toml found, using defaults"),
        },
    }

    let options = AnalysisOptions::load(args.config.as_deref(), &OptionOverrides::default())?;
    options.validate()?;

    if !options.enable_bundle_analysis {
        ui::warning("Bundle analysis is disabled (enableBundleAnalysis = false)");
        return Ok(());
    }

    ui::success(&format!(
        "Configuration is valid (bundle '{}', {})",
        options.bundle_name,
        if options.dry_run {
            "dry run".to_string()
        } else {
            format!("reports in {}", options.report_dir.display())
        }
    ));
    Ok(())
}
