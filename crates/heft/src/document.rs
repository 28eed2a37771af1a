//! The normalized bundle stats document.
//!
//! Field names serialize in camelCase; the JSON shape is what the analysis
//! service and the dry-run artifact consume.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Schema version of the serialized document.
pub const DOCUMENT_VERSION: &str = "3";

/// Name and version of a tool (bundler or plugin).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundlerInfo {
    pub name: String,
    pub version: String,
}

impl BundlerInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Identity of the plugin that produced a document.
pub type PluginInfo = BundlerInfo;

/// One emitted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub name: String,
    pub size: u64,
    pub gzip_size: Option<u64>,
    /// Filename with volatile tokens generalized, for cross-build matching.
    pub normalized: String,
    pub chunk_unique_ids: Vec<String>,
}

/// One output chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// Host's primary id, kept for traceability.
    pub id: String,
    pub unique_id: String,
    pub entry: bool,
    pub initial: bool,
    pub files: Vec<String>,
    pub names: Vec<String>,
    pub dynamic_imports: Vec<String>,
}

/// One source module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub name: String,
    pub size: u64,
    pub chunk_unique_ids: Vec<String>,
}

/// Normalized description of one build attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleStatsDocument {
    pub version: String,
    pub plugin: PluginInfo,
    pub bundler: BundlerInfo,
    pub bundle_name: String,
    /// Build start, milliseconds since the Unix epoch.
    pub built_at: i64,
    /// Milliseconds from `built_at` to the end of the analysis stage.
    pub duration: u64,
    pub output_path: String,
    pub assets: Vec<Asset>,
    pub chunks: Vec<Chunk>,
    pub modules: Vec<Module>,
}

impl BundleStatsDocument {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total emitted bytes across all assets.
    pub fn total_size(&self) -> u64 {
        self.assets.iter().map(|asset| asset.size).sum()
    }

    /// Chunk ids referenced by assets or modules that no chunk declares.
    ///
    /// Empty for every document the pipeline produces.
    pub fn dangling_chunk_references(&self) -> Vec<&str> {
        let known: rustc_hash::FxHashSet<&str> =
            self.chunks.iter().map(|c| c.unique_id.as_str()).collect();

        self.assets
            .iter()
            .flat_map(|a| a.chunk_unique_ids.iter())
            .chain(self.modules.iter().flat_map(|m| m.chunk_unique_ids.iter()))
            .map(String::as_str)
            .filter(|id| !known.contains(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BundleStatsDocument {
        BundleStatsDocument {
            version: DOCUMENT_VERSION.to_string(),
            plugin: PluginInfo::new("heft", "0.1.0"),
            bundler: BundlerInfo::new("rspack", "1.1.0"),
            bundle_name: "app-esm".to_string(),
            built_at: 1_700_000_000_000,
            duration: 42,
            output_path: "/dist".to_string(),
            assets: vec![Asset {
                name: "app.js".to_string(),
                size: 100,
                gzip_size: None,
                normalized: "app.js".to_string(),
                chunk_unique_ids: vec!["0-1".to_string()],
            }],
            chunks: vec![Chunk {
                id: "1".to_string(),
                unique_id: "0-1".to_string(),
                entry: true,
                initial: true,
                files: vec!["app.js".to_string()],
                names: vec!["main".to_string()],
                dynamic_imports: vec![],
            }],
            modules: vec![Module {
                name: "./src/index.js".to_string(),
                size: 40,
                chunk_unique_ids: vec!["0-1".to_string(), "9-ghost".to_string()],
            }],
        }
    }

    #[test]
    fn test_json_field_names() {
        let value: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();

        assert_eq!(value["bundleName"], "app-esm");
        assert_eq!(value["bundler"]["name"], "rspack");
        assert_eq!(value["plugin"]["version"], "0.1.0");
        assert_eq!(value["builtAt"], 1_700_000_000_000_i64);
        assert_eq!(value["outputPath"], "/dist");
        assert!(value["assets"][0]["gzipSize"].is_null());
        assert_eq!(value["assets"][0]["chunkUniqueIds"][0], "0-1");
        assert_eq!(value["chunks"][0]["uniqueId"], "0-1");
        assert!(value["chunks"][0]["dynamicImports"].is_array());
    }

    #[test]
    fn test_dangling_chunk_references() {
        let document = sample();
        assert_eq!(document.dangling_chunk_references(), vec!["9-ghost"]);
        assert_eq!(document.total_size(), 100);
    }
}
