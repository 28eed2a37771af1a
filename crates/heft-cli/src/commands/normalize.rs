//! Normalize command implementation.

use std::io::Write;

use heft::{FilenameTemplate, normalize_filename};

use crate::cli::NormalizeArgs;
use crate::error::Result;
use crate::ui;

/// Print one comparison key per filename to stdout, in argument order.
pub fn execute(args: NormalizeArgs) -> Result<()> {
    if let Some(template) = args.template.as_deref() {
        if !FilenameTemplate::parse(template).has_volatile() {
            ui::warning(&format!(
                "Template '{}' has no hash placeholder; falling back to hash detection",
                template
            ));
        }
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for filename in &args.filenames {
        writeln!(out, "{}", normalize_filename(filename, args.template.as_deref()))?;
    }
    Ok(())
}
