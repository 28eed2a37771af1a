use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized, Toml},
};
use heft::{AnalysisConfig, BundlerInfo, OutputOptions, PluginInfo};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Environment variable prefix. `__` separates nested keys.
pub const ENV_PREFIX: &str = "HEFT_";

/// Files discovered in the working directory, in priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &["heft.config.json", "heft.config.toml"];

/// Options for one bundle analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisOptions {
    /// Base name the reported bundle name is composed from.
    pub bundle_name: String,
    pub enable_bundle_analysis: bool,
    /// Emit `<bundleName>-stats.json` next to the build output instead of persisting.
    pub dry_run: bool,
    /// Where persisted reports are written.
    pub report_dir: PathBuf,
    pub debug: bool,
    pub output: OutputSettings,
    /// Replaces the bundler identity detected from the stats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundler: Option<BundlerInfo>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            bundle_name: String::new(),
            enable_bundle_analysis: true,
            dry_run: false,
            report_dir: PathBuf::from(".heft"),
            debug: false,
            output: OutputSettings::default(),
            bundler: None,
        }
    }
}

/// Output settings that take precedence over what the stats report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_chunk_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_module_filename: Option<String>,
}

impl OutputSettings {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrite the fields of `output` that are set here.
    pub fn apply_to(&self, output: &mut OutputOptions) {
        let pairs = [
            (&self.chunk_format, &mut output.chunk_format),
            (&self.filename, &mut output.filename),
            (&self.chunk_filename, &mut output.chunk_filename),
            (&self.css_filename, &mut output.css_filename),
            (&self.css_chunk_filename, &mut output.css_chunk_filename),
            (&self.asset_module_filename, &mut output.asset_module_filename),
        ];
        for (setting, target) in pairs {
            if let Some(value) = setting {
                *target = Some(value.clone());
            }
        }
    }
}

/// Values that win over every other layer. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_bundle_analysis: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    #[serde(skip_serializing_if = "OutputSettings::is_empty")]
    pub output: OutputSettings,
}

impl AnalysisOptions {
    /// Load options from every layer.
    ///
    /// With `config_path`, that file must exist; otherwise the first of
    /// [`CONFIG_FILE_NAMES`] present in the working directory is used, if any.
    pub fn load(config_path: Option<&Path>, overrides: &OptionOverrides) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = config_file(config_path)? {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(path)),
                _ => figment.merge(Json::file(path)),
            };
        }

        figment = figment
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .lowercase(false)
                    .map(|key| env_key_to_path(key.as_str()).into()),
            )
            .merge(Serialized::defaults(overrides));

        Ok(figment.extract()?)
    }

    /// Coordinator configuration for these options.
    pub fn analysis_config(&self, plugin: PluginInfo) -> AnalysisConfig {
        AnalysisConfig::new(self.bundle_name.clone(), plugin).with_dry_run(self.dry_run)
    }
}

fn config_file(config_path: Option<&Path>) -> Result<Option<PathBuf>> {
    match config_path {
        Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
        Some(path) => Err(ConfigError::FileNotFound(path.to_path_buf())),
        None => Ok(CONFIG_FILE_NAMES
            .iter()
            .map(Path::new)
            .find(|path| path.is_file())
            .map(Path::to_path_buf)),
    }
}

/// `OUTPUT__CHUNK_FORMAT` → `output.chunkFormat`.
fn env_key_to_path(key: &str) -> String {
    key.split("__")
        .map(camel_case)
        .collect::<Vec<_>>()
        .join(".")
}

fn camel_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for (i, word) in segment.split('_').filter(|w| !w.is_empty()).enumerate() {
        let word = word.to_ascii_lowercase();
        if i == 0 {
            out.push_str(&word);
            continue;
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
