//! Shared test utilities for heft integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use heft::{
    AnalysisConfig, AssetEmitter, BundleStatsDocument, ChunkRef, Clock, PluginInfo, StatsAsset,
    StatsChunk, StatsModule, StatsSnapshot,
};
use parking_lot::Mutex;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(name))
        .unwrap_or_else(|e| panic!("missing fixture {name}: {e}"))
}

/// Clock the test advances by hand.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn at(millis: i64) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(millis)))
    }

    pub fn advance(&self, millis: i64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Sink that keeps every document, or fails every handoff.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub documents: Mutex<Vec<BundleStatsDocument>>,
    pub fail: bool,
}

impl MemorySink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn bundle_names(&self) -> Vec<String> {
        self.documents
            .lock()
            .iter()
            .map(|d| d.bundle_name.clone())
            .collect()
    }
}

#[async_trait]
impl heft::StatsSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn persist(&self, document: &BundleStatsDocument) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("service unavailable");
        }
        self.documents.lock().push(document.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct VecEmitter {
    pub assets: Vec<(String, Vec<u8>)>,
}

impl AssetEmitter for VecEmitter {
    fn emit_asset(&mut self, name: &str, contents: Vec<u8>) -> heft::Result<()> {
        self.assets.push((name.to_string(), contents));
        Ok(())
    }
}

pub fn test_config(bundle_name: &str, clock: Arc<ManualClock>) -> AnalysisConfig {
    AnalysisConfig::new(bundle_name, PluginInfo::new("heft-test", "0.0.0")).with_clock(clock)
}

pub fn chunk(id: impl Into<ChunkRef>, files: &[&str]) -> StatsChunk {
    StatsChunk {
        id: Some(id.into()),
        files: files.iter().map(|f| f.to_string()).collect(),
        ..StatsChunk::default()
    }
}

pub fn asset(name: &str, size: u64, chunks: &[ChunkRef]) -> StatsAsset {
    StatsAsset {
        name: name.to_string(),
        size,
        chunks: chunks.to_vec(),
    }
}

pub fn module(name: &str, size: Option<u64>, chunks: &[ChunkRef]) -> StatsModule {
    StatsModule {
        name: Some(name.to_string()),
        size,
        chunks: chunks.to_vec(),
    }
}

/// One chunk known as both `1` and `"main"`, one asset, one module.
pub fn aliased_build() -> StatsSnapshot {
    let mut main = chunk(1u64, &["app.js"]);
    main.ids = vec![ChunkRef::Number(1), ChunkRef::from("main")];
    main.entry = true;
    main.initial = true;

    StatsSnapshot {
        assets: vec![asset("app.js", 100, &[ChunkRef::Number(1)])],
        chunks: vec![main],
        modules: vec![module("./src/index.js", Some(40), &[ChunkRef::from("main")])],
        ..StatsSnapshot::default()
    }
}
