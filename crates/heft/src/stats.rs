//! Read-only view of a host build's statistics.
//!
//! The host bundler reports its assets, chunks and modules in its own shape,
//! with chunk identifiers that may be numeric in one configuration and named in
//! another. Everything downstream consumes this module through the
//! [`StatsSource`] trait, so a host integration only has to expose its stats;
//! the shipped [`StatsSnapshot`] covers the webpack/rspack `--json` format.

use std::fmt;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde::{Deserialize, Serialize};

use crate::document::BundlerInfo;
use crate::{Error, Result};

/// A chunk identifier as reported by the host.
///
/// Numeric and string identifiers are distinct: `1` and `"1"` never alias each
/// other unless the host lists both for the same chunk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChunkRef {
    Number(u64),
    Name(String),
}

impl fmt::Display for ChunkRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkRef::Number(n) => write!(f, "{n}"),
            ChunkRef::Name(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ChunkRef {
    fn from(value: u64) -> Self {
        ChunkRef::Number(value)
    }
}

impl From<&str> for ChunkRef {
    fn from(value: &str) -> Self {
        ChunkRef::Name(value.to_string())
    }
}

impl From<String> for ChunkRef {
    fn from(value: String) -> Self {
        ChunkRef::Name(value)
    }
}

/// One emitted file as the host reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsAsset {
    pub name: String,
    pub size: u64,
    /// Chunks that emitted this file.
    pub chunks: Vec<ChunkRef>,
}

/// One output chunk as the host reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsChunk {
    /// Primary native id.
    pub id: Option<ChunkRef>,
    /// Additional native ids the host uses for the same chunk.
    pub ids: Vec<ChunkRef>,
    pub names: Vec<String>,
    pub files: Vec<String>,
    pub entry: bool,
    pub initial: bool,
    pub hash: Option<String>,
    /// Chunks loaded on demand from this one.
    pub children: Vec<ChunkRef>,
}

impl StatsChunk {
    /// Every native identifier this chunk is known by, primary id first.
    pub fn aliases(&self) -> impl Iterator<Item = &ChunkRef> {
        self.id.iter().chain(self.ids.iter())
    }
}

/// One source module as the host reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsModule {
    pub name: Option<String>,
    pub size: Option<u64>,
    /// Chunks that contain this module.
    pub chunks: Vec<ChunkRef>,
}

/// Output configuration of the compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputOptions {
    /// Output directory.
    pub path: Option<String>,
    /// Chunk interop format (`commonjs`, `module`, `array-push`, ...).
    pub chunk_format: Option<String>,
    pub filename: Option<String>,
    pub chunk_filename: Option<String>,
    pub css_filename: Option<String>,
    pub css_chunk_filename: Option<String>,
    pub asset_module_filename: Option<String>,
}

/// Read-only accessor over a single compilation's statistics.
pub trait StatsSource {
    fn assets(&self) -> &[StatsAsset];

    fn chunks(&self) -> &[StatsChunk];

    fn modules(&self) -> &[StatsModule];

    fn output(&self) -> &OutputOptions;

    /// Name of this compilation when the host runs several in one invocation.
    fn compilation_name(&self) -> Option<&str>;

    fn bundler(&self) -> BundlerInfo;

    /// Emitted bytes of an asset, when the host can provide them.
    fn asset_contents(&self, _name: &str) -> Option<Vec<u8>> {
        None
    }
}

/// Owned stats for one compilation.
#[derive(Debug, Clone, Default)]
pub struct StatsSnapshot {
    pub assets: Vec<StatsAsset>,
    pub chunks: Vec<StatsChunk>,
    pub modules: Vec<StatsModule>,
    pub output: OutputOptions,
    pub compilation_name: Option<String>,
    pub bundler: BundlerInfo,
    /// Directory emitted assets can be read from.
    pub asset_root: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawStats {
    version: Option<String>,
    rspack_version: Option<String>,
    name: Option<String>,
    output_path: Option<String>,
    assets: Vec<StatsAsset>,
    chunks: Vec<StatsChunk>,
    modules: Vec<StatsModule>,
    children: Vec<RawStats>,
}

impl RawStats {
    fn bundler(&self) -> Option<BundlerInfo> {
        if let Some(version) = &self.rspack_version {
            return Some(BundlerInfo::new("rspack", version.clone()));
        }
        self.version
            .as_ref()
            .map(|version| BundlerInfo::new("webpack", version.clone()))
    }

    fn into_snapshot(self, inherited: &BundlerInfo) -> StatsSnapshot {
        let bundler = self.bundler().unwrap_or_else(|| inherited.clone());
        let asset_root = self.output_path.as_ref().map(PathBuf::from);

        StatsSnapshot {
            assets: self.assets,
            chunks: self.chunks,
            modules: self.modules,
            output: OutputOptions {
                path: self.output_path,
                ..OutputOptions::default()
            },
            compilation_name: self.name.filter(|name| !name.is_empty()),
            bundler,
            asset_root,
        }
    }
}

impl StatsSnapshot {
    /// Parse a webpack/rspack `--json` stats document.
    ///
    /// A multi-compilation document (top-level `children` and no assets of its
    /// own) yields one snapshot per child, in order.
    pub fn from_json(json: &str) -> Result<Vec<StatsSnapshot>> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(Error::InvalidStats(
                "expected a JSON object at the top level".to_string(),
            ));
        }

        let mut raw: RawStats = serde_json::from_value(value)?;
        let root_bundler = raw
            .bundler()
            .unwrap_or_else(|| BundlerInfo::new("webpack", "unknown"));

        if raw.assets.is_empty() && raw.chunks.is_empty() && !raw.children.is_empty() {
            let children = std::mem::take(&mut raw.children);
            return Ok(children
                .into_iter()
                .map(|child| child.into_snapshot(&root_bundler))
                .collect());
        }

        raw.children.clear();
        Ok(vec![raw.into_snapshot(&root_bundler)])
    }

    pub fn with_output(mut self, output: OutputOptions) -> Self {
        self.output = output;
        self
    }

    pub fn with_bundler(mut self, bundler: BundlerInfo) -> Self {
        self.bundler = bundler;
        self
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = Some(root.into());
        self
    }
}

impl StatsSource for StatsSnapshot {
    fn assets(&self) -> &[StatsAsset] {
        &self.assets
    }

    fn chunks(&self) -> &[StatsChunk] {
        &self.chunks
    }

    fn modules(&self) -> &[StatsModule] {
        &self.modules
    }

    fn output(&self) -> &OutputOptions {
        &self.output
    }

    fn compilation_name(&self) -> Option<&str> {
        self.compilation_name.as_deref()
    }

    fn bundler(&self) -> BundlerInfo {
        self.bundler.clone()
    }

    fn asset_contents(&self, name: &str) -> Option<Vec<u8>> {
        let root = self.asset_root.as_deref()?;
        let path = contained_path(root, name)?;
        std::fs::read(path).ok()
    }
}

/// Join `name` onto `root`, refusing anything that escapes `root`.
fn contained_path(root: &Path, name: &str) -> Option<PathBuf> {
    if name.contains('\0') || Path::new(name).is_absolute() {
        return None;
    }
    let root = root.clean();
    let joined = root.join(name).clean();
    joined.starts_with(&root).then_some(joined)
}
