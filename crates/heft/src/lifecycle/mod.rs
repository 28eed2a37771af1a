//! Build lifecycle coordination.
//!
//! [`BundleAnalysis`] owns one document per build attempt and sequences the
//! pipeline against the host's lifecycle:
//!
//! ```text
//! Idle ──start──▶ Started ──analyze──▶ Analyzing ──finalize──▶ Finalized ──▶ Persisted
//!   ▲                                                                  │
//!   └────────────────────────── start (next attempt) ◀─────────────────┘
//! ```
//!
//! `start` is legal from any state and discards whatever the previous attempt
//! left behind. The host-facing wiring lives in [`hooks`].

pub mod hooks;

use std::sync::Arc;

use tracing::debug;

use crate::assets::normalize_assets;
use crate::chunks::resolve_chunks;
use crate::clock::{Clock, SystemClock};
use crate::compression::fill_gzip_sizes;
use crate::document::{BundleStatsDocument, DOCUMENT_VERSION, PluginInfo};
use crate::modules::normalize_modules;
use crate::naming::compose_bundle_name;
use crate::stats::StatsSource;
use crate::{Error, Result};

pub use hooks::{
    AssetEmitter, BuildStartHook, BundleAnalysisPlugin, DoneHook, HookRegistry, Hooks,
    PendingPersists, PersistFuture, PersistHook, ProcessAssetsHook,
};

/// Where the coordinator is within the current build attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Started,
    Analyzing,
    Finalized,
    Persisted,
}

/// Values injected into the coordinator at construction.
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Base bundle name, before compilation and format decoration.
    pub bundle_name: String,
    pub plugin: PluginInfo,
    /// Emit the document as a build artifact instead of persisting it.
    pub dry_run: bool,
    pub clock: Arc<dyn Clock>,
}

impl AnalysisConfig {
    pub fn new(bundle_name: impl Into<String>, plugin: PluginInfo) -> Self {
        Self {
            bundle_name: bundle_name.into(),
            plugin,
            dry_run: false,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl std::fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("bundle_name", &self.bundle_name)
            .field("plugin", &self.plugin)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

/// Per-process coordinator, reusable across any number of build attempts.
#[derive(Debug)]
pub struct BundleAnalysis {
    config: AnalysisConfig,
    phase: Phase,
    built_at: Option<i64>,
    draft: Option<BundleStatsDocument>,
    finalized: Option<Arc<BundleStatsDocument>>,
}

impl BundleAnalysis {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            built_at: None,
            draft: None,
            finalized: None,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Start time of the current attempt, milliseconds since the Unix epoch.
    pub fn built_at(&self) -> Option<i64> {
        self.built_at
    }

    /// Begin a build attempt, resetting `builtAt`.
    pub fn start(&mut self) {
        self.built_at = Some(self.config.clock.now_millis());
        self.draft = None;
        self.finalized = None;
        self.phase = Phase::Started;
    }

    /// Run the pipeline over the host's stats for the current attempt.
    ///
    /// May run more than once per attempt; each pass rebuilds the document
    /// from scratch.
    pub fn analyze(&mut self, source: &dyn StatsSource) -> Result<&BundleStatsDocument> {
        let built_at = match (self.phase, self.built_at) {
            (Phase::Started | Phase::Analyzing, Some(built_at)) => built_at,
            _ => return Err(Error::NotStarted),
        };

        let resolved = resolve_chunks(source.chunks());
        let mut assets = normalize_assets(source.assets(), &resolved.ids, source.output());
        fill_gzip_sizes(&mut assets, source);
        let modules = normalize_modules(source.modules(), &resolved.ids);

        let output = source.output();
        let bundle_name = compose_bundle_name(
            &self.config.bundle_name,
            source.compilation_name(),
            output.chunk_format.as_deref(),
        );
        let duration = u64::try_from(self.config.clock.now_millis() - built_at).unwrap_or(0);

        debug!(
            plugin = %self.config.plugin.name,
            bundle = %bundle_name,
            assets = assets.len(),
            chunks = resolved.chunks.len(),
            modules = modules.len(),
            "analyzed build stats"
        );

        self.phase = Phase::Analyzing;
        Ok(&*self.draft.insert(BundleStatsDocument {
            version: DOCUMENT_VERSION.to_string(),
            plugin: self.config.plugin.clone(),
            bundler: source.bundler(),
            bundle_name,
            built_at,
            duration,
            output_path: output.path.clone().unwrap_or_default(),
            assets,
            chunks: resolved.chunks,
            modules,
        }))
    }

    /// Close the document for this attempt.
    ///
    /// Returns `None` when no analysis pass ran; no partial document is ever
    /// produced. Calling it again returns the same document.
    pub fn finalize(&mut self) -> Option<Arc<BundleStatsDocument>> {
        if self.phase == Phase::Analyzing {
            let document = Arc::new(self.draft.take()?);
            self.finalized = Some(Arc::clone(&document));
            self.phase = Phase::Finalized;
            return Some(document);
        }
        self.finalized.clone()
    }

    /// Closed document of the current attempt, if any.
    pub fn finalized(&self) -> Option<Arc<BundleStatsDocument>> {
        self.finalized.clone()
    }

    /// Record a successful handoff of `document`.
    ///
    /// Ignored when a newer attempt has started since the document was closed.
    pub fn mark_persisted(&mut self, document: &Arc<BundleStatsDocument>) -> bool {
        let current = self
            .finalized
            .as_ref()
            .is_some_and(|finalized| Arc::ptr_eq(finalized, document));
        if current && self.phase == Phase::Finalized {
            self.phase = Phase::Persisted;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{ChunkRef, OutputOptions, StatsAsset, StatsChunk, StatsSnapshot};
    use std::sync::atomic::{AtomicI64, Ordering};

    struct StepClock(AtomicI64);

    impl Clock for StepClock {
        fn now_millis(&self) -> i64 {
            self.0.fetch_add(25, Ordering::SeqCst)
        }
    }

    fn analysis() -> BundleAnalysis {
        BundleAnalysis::new(
            AnalysisConfig::new("app", PluginInfo::new("heft", "0.1.0"))
                .with_clock(Arc::new(StepClock(AtomicI64::new(1_000)))),
        )
    }

    fn snapshot() -> StatsSnapshot {
        StatsSnapshot {
            assets: vec![StatsAsset {
                name: "app.js".to_string(),
                size: 10,
                chunks: vec![ChunkRef::Number(0)],
            }],
            chunks: vec![StatsChunk {
                id: Some(ChunkRef::Number(0)),
                ..StatsChunk::default()
            }],
            output: OutputOptions {
                path: Some("/dist".to_string()),
                chunk_format: Some("module".to_string()),
                ..OutputOptions::default()
            },
            ..StatsSnapshot::default()
        }
    }

    #[test]
    fn test_analyze_before_start_is_rejected() {
        let mut analysis = analysis();
        assert!(matches!(analysis.analyze(&snapshot()), Err(Error::NotStarted)));
        assert_eq!(analysis.phase(), Phase::Idle);
    }

    #[test]
    fn test_full_attempt() {
        let mut analysis = analysis();
        analysis.start();
        assert_eq!(analysis.built_at(), Some(1_000));

        let document = analysis.analyze(&snapshot()).unwrap();
        assert_eq!(document.bundle_name, "app-esm");
        assert_eq!(document.duration, 25);
        assert_eq!(document.output_path, "/dist");
        assert_eq!(document.version, "3");
        assert_eq!(analysis.phase(), Phase::Analyzing);

        let document = analysis.finalize().unwrap();
        assert_eq!(analysis.phase(), Phase::Finalized);
        assert!(analysis.mark_persisted(&document));
        assert_eq!(analysis.phase(), Phase::Persisted);
    }

    #[test]
    fn test_finalize_without_analysis_is_none() {
        let mut analysis = analysis();
        assert!(analysis.finalize().is_none());
        analysis.start();
        assert!(analysis.finalize().is_none());
        assert_eq!(analysis.phase(), Phase::Started);
    }

    #[test]
    fn test_restart_discards_previous_attempt() {
        let mut analysis = analysis();
        analysis.start();
        analysis.analyze(&snapshot()).unwrap();
        let first = analysis.finalize().unwrap();

        analysis.start();
        assert_eq!(analysis.phase(), Phase::Started);
        assert!(analysis.finalized().is_none());
        assert!(!analysis.mark_persisted(&first));
        assert_eq!(analysis.phase(), Phase::Started);
    }

    #[test]
    fn test_analyze_after_finalize_needs_new_start() {
        let mut analysis = analysis();
        analysis.start();
        analysis.analyze(&snapshot()).unwrap();
        analysis.finalize();
        assert!(matches!(analysis.analyze(&snapshot()), Err(Error::NotStarted)));
    }

    #[test]
    fn test_duration_never_negative() {
        struct Backwards(AtomicI64);
        impl Clock for Backwards {
            fn now_millis(&self) -> i64 {
                self.0.fetch_sub(10, Ordering::SeqCst)
            }
        }

        let mut analysis = BundleAnalysis::new(
            AnalysisConfig::new("app", PluginInfo::new("heft", "0.1.0"))
                .with_clock(Arc::new(Backwards(AtomicI64::new(500)))),
        );
        analysis.start();
        assert_eq!(analysis.analyze(&snapshot()).unwrap().duration, 0);
    }
}
