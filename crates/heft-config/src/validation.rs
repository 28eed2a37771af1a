use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ConfigError, Result};
use crate::options::AnalysisOptions;

/// Characters a bundle name may contain.
pub const BUNDLE_NAME_PATTERN: &str = r"^[\w\d_:/@\.{}\[\]$-]+$";

static BUNDLE_NAME: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(BUNDLE_NAME_PATTERN).ok());

pub fn validate_bundle_name(name: &str) -> Result<()> {
    if BUNDLE_NAME.as_ref().is_some_and(|re| re.is_match(name)) {
        Ok(())
    } else {
        Err(ConfigError::InvalidBundleName {
            name: name.to_string(),
        })
    }
}

impl AnalysisOptions {
    /// Validate configuration for logical consistency.
    ///
    /// A disabled analysis only needs a usable report directory.
    pub fn validate(&self) -> Result<()> {
        if self.report_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "reportDir".to_string(),
                value: String::new(),
                hint: "Report directory cannot be empty".to_string(),
            });
        }

        if !self.enable_bundle_analysis {
            return Ok(());
        }

        if self.bundle_name.is_empty() {
            return Err(ConfigError::MissingField {
                field: "bundleName".to_string(),
                hint: "Set bundleName in heft.config.json, HEFT_BUNDLE_NAME, or --bundle-name"
                    .to_string(),
            });
        }
        validate_bundle_name(&self.bundle_name)?;

        if let Some(bundler) = &self.bundler {
            if bundler.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "bundler.name".to_string(),
                    value: bundler.name.clone(),
                    hint: "Bundler override needs a name, e.g. \"webpack\"".to_string(),
                });
            }
        }

        if self.output.chunk_format.as_deref() == Some("") {
            return Err(ConfigError::InvalidValue {
                field: "output.chunkFormat".to_string(),
                value: String::new(),
                hint: "Remove chunkFormat or set it to commonjs, module, or another format"
                    .to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_name_pattern() {
        for name in ["my-app", "@scope/app", "app_v2.client", "{app}[1]$x", "a:b"] {
            assert!(validate_bundle_name(name).is_ok(), "{name} should be valid");
        }
        for name in ["", "my app", "app!", "a,b", "名前?"] {
            assert!(validate_bundle_name(name).is_err(), "{name} should be invalid");
        }
    }

    #[test]
    fn test_validate_requires_bundle_name_when_enabled() {
        let options = AnalysisOptions::default();
        assert!(matches!(
            options.validate(),
            Err(ConfigError::MissingField { ref field, .. }) if field == "bundleName"
        ));

        let disabled = AnalysisOptions {
            enable_bundle_analysis: false,
            ..AnalysisOptions::default()
        };
        assert!(disabled.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_bundler_name() {
        let options = AnalysisOptions {
            bundle_name: "app".to_string(),
            bundler: Some(heft::BundlerInfo::new(" ", "5.0.0")),
            ..AnalysisOptions::default()
        };
        assert!(matches!(options.validate(), Err(ConfigError::InvalidValue { .. })));
    }
}
