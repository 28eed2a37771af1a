//! Persistence of finished documents.
//!
//! The analysis service is reached through a [`StatsSink`]. Sinks run after the
//! host has reported its own completion, and their failures never reach the
//! host: the plugin logs and drops them.

pub mod writer;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::document::BundleStatsDocument;
use crate::lifecycle::AssetEmitter;
use crate::Result;

pub use writer::write_file_atomic;

/// Filename of the JSON artifact for a bundle.
pub fn stats_file_name(bundle_name: &str) -> String {
    format!("{bundle_name}-stats.json")
}

/// Destination for finished documents.
#[async_trait]
pub trait StatsSink: Send + Sync {
    /// Short label used in log output.
    fn name(&self) -> &str;

    async fn persist(&self, document: &BundleStatsDocument) -> anyhow::Result<()>;
}

/// Writes `<bundleName>-stats.json` into a report directory.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl StatsSink for JsonFileSink {
    fn name(&self) -> &str {
        "json-file"
    }

    async fn persist(&self, document: &BundleStatsDocument) -> anyhow::Result<()> {
        let json = document.to_json_pretty()?;
        let filename = stats_file_name(&document.bundle_name);
        let dir = self.dir.clone();

        let path = tokio::task::spawn_blocking(move || {
            write_file_atomic(&dir, &filename, json.as_bytes())
        })
        .await??;

        tracing::debug!(path = %path.display(), "wrote bundle stats");
        Ok(())
    }
}

/// Emits artifacts into a directory, alongside the build's own output.
#[derive(Debug, Clone)]
pub struct DirectoryEmitter {
    dir: PathBuf,
    emitted: Vec<PathBuf>,
}

impl DirectoryEmitter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            emitted: Vec::new(),
        }
    }

    /// Paths written so far.
    pub fn emitted(&self) -> &[PathBuf] {
        &self.emitted
    }
}

impl AssetEmitter for DirectoryEmitter {
    fn emit_asset(&mut self, name: &str, contents: Vec<u8>) -> Result<()> {
        let path = write_file_atomic(&self.dir, name, &contents)?;
        self.emitted.push(path);
        Ok(())
    }
}
