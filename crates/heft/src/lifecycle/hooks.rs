//! Host hook wiring.
//!
//! A host exposes four tap points: build start, asset processing, done, and
//! persist. [`HookRegistry`] is the seam a host adapter implements;
//! [`Hooks`] is an in-process registry that adapters can drive directly.
//! [`BundleAnalysisPlugin`] subscribes a [`BundleAnalysis`] to all four.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::{AnalysisConfig, BundleAnalysis};
use crate::Result;
use crate::output::{StatsSink, stats_file_name};
use crate::stats::StatsSource;

/// Host-side artifact output, used for the dry-run document.
pub trait AssetEmitter {
    fn emit_asset(&mut self, name: &str, contents: Vec<u8>) -> Result<()>;
}

pub type BuildStartHook = Box<dyn FnMut() + Send>;
pub type ProcessAssetsHook =
    Box<dyn FnMut(&dyn StatsSource, &mut dyn AssetEmitter) -> Result<()> + Send>;
pub type DoneHook = Box<dyn FnMut() + Send>;
pub type PersistFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
/// Returns the handoff to run, or `None` when there is nothing to persist.
pub type PersistHook = Box<dyn FnMut() -> Option<PersistFuture> + Send>;

/// Registration points a host offers to plugins.
pub trait HookRegistry {
    fn tap_build_start(&mut self, name: &str, hook: BuildStartHook);

    fn tap_process_assets(&mut self, name: &str, hook: ProcessAssetsHook);

    fn tap_done(&mut self, name: &str, hook: DoneHook);

    fn tap_persist(&mut self, name: &str, hook: PersistHook);
}

/// In-process hook registry. Taps fire in registration order.
#[derive(Default)]
pub struct Hooks {
    build_start: Vec<(String, BuildStartHook)>,
    process_assets: Vec<(String, ProcessAssetsHook)>,
    done: Vec<(String, DoneHook)>,
    persist: Vec<(String, PersistHook)>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_build_start(&mut self) {
        for (_, hook) in &mut self.build_start {
            hook();
        }
    }

    /// Run every asset-processing tap. Stops at the first failing tap.
    pub fn call_process_assets(
        &mut self,
        source: &dyn StatsSource,
        emitter: &mut dyn AssetEmitter,
    ) -> Result<()> {
        for (_, hook) in &mut self.process_assets {
            hook(source, &mut *emitter)?;
        }
        Ok(())
    }

    pub fn call_done(&mut self) {
        for (_, hook) in &mut self.done {
            hook();
        }
    }

    /// Start every persist tap without waiting for any of them.
    ///
    /// Inside a tokio runtime the handoffs are spawned and run concurrently
    /// with the caller; outside one they run when the returned set is flushed.
    pub fn call_persist(&mut self) -> PendingPersists {
        let mut pending = PendingPersists::default();
        for (name, hook) in &mut self.persist {
            if let Some(future) = hook() {
                pending.push(name.clone(), future);
            }
        }
        pending
    }

    /// Names of every registered tap, per hook, for diagnostics.
    pub fn taps(&self) -> Vec<(&'static str, &str)> {
        let build_start = self.build_start.iter().map(|(n, _)| ("build_start", n.as_str()));
        let process_assets = self
            .process_assets
            .iter()
            .map(|(n, _)| ("process_assets", n.as_str()));
        let done = self.done.iter().map(|(n, _)| ("done", n.as_str()));
        let persist = self.persist.iter().map(|(n, _)| ("persist", n.as_str()));

        build_start
            .chain(process_assets)
            .chain(done)
            .chain(persist)
            .collect()
    }
}

impl HookRegistry for Hooks {
    fn tap_build_start(&mut self, name: &str, hook: BuildStartHook) {
        self.build_start.push((name.to_string(), hook));
    }

    fn tap_process_assets(&mut self, name: &str, hook: ProcessAssetsHook) {
        self.process_assets.push((name.to_string(), hook));
    }

    fn tap_done(&mut self, name: &str, hook: DoneHook) {
        self.done.push((name.to_string(), hook));
    }

    fn tap_persist(&mut self, name: &str, hook: PersistHook) {
        self.persist.push((name.to_string(), hook));
    }
}

enum Pending {
    Spawned(JoinHandle<()>),
    Deferred(PersistFuture),
}

/// Persistence handoffs still in flight.
///
/// Dropping this set does not cancel spawned handoffs, but the process may
/// exit before they finish; hosts call [`PendingPersists::flush`] first.
#[derive(Default)]
pub struct PendingPersists {
    tasks: Vec<(String, Pending)>,
}

impl PendingPersists {
    fn push(&mut self, name: String, future: PersistFuture) {
        let pending = match tokio::runtime::Handle::try_current() {
            Ok(handle) => Pending::Spawned(handle.spawn(future)),
            Err(_) => Pending::Deferred(future),
        };
        self.tasks.push((name, pending));
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every handoff to finish.
    pub async fn flush(self) {
        for (name, pending) in self.tasks {
            match pending {
                Pending::Spawned(handle) => {
                    if let Err(err) = handle.await {
                        error!(plugin = %name, error = %err, "persistence task aborted");
                    }
                }
                Pending::Deferred(future) => future.await,
            }
        }
    }
}

impl std::fmt::Debug for PendingPersists {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingPersists")
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

/// Subscribes a [`BundleAnalysis`] to a host's hooks.
///
/// Analysis and persistence failures are logged under the plugin's name and
/// never reach the host.
#[derive(Clone)]
pub struct BundleAnalysisPlugin {
    analysis: Arc<Mutex<BundleAnalysis>>,
    sink: Arc<dyn StatsSink>,
    name: String,
    dry_run: bool,
}

impl BundleAnalysisPlugin {
    pub fn new(config: AnalysisConfig, sink: Arc<dyn StatsSink>) -> Self {
        let name = config.plugin.name.clone();
        let dry_run = config.dry_run;
        Self {
            analysis: Arc::new(Mutex::new(BundleAnalysis::new(config))),
            sink,
            name,
            dry_run,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the coordinator, for inspection by the host.
    pub fn analysis(&self) -> Arc<Mutex<BundleAnalysis>> {
        Arc::clone(&self.analysis)
    }

    pub fn apply(&self, hooks: &mut impl HookRegistry) {
        let analysis = Arc::clone(&self.analysis);
        hooks.tap_build_start(&self.name, Box::new(move || analysis.lock().start()));

        let analysis = Arc::clone(&self.analysis);
        let dry_run = self.dry_run;
        let name = self.name.clone();
        hooks.tap_process_assets(
            &self.name,
            Box::new(move |source, emitter| {
                if let Err(err) = analyze_and_emit(&mut analysis.lock(), source, emitter, dry_run) {
                    error!(plugin = %name, error = %err, "bundle analysis failed");
                }
                Ok(())
            }),
        );

        let analysis = Arc::clone(&self.analysis);
        let name = self.name.clone();
        hooks.tap_done(
            &self.name,
            Box::new(move || {
                if let Some(document) = analysis.lock().finalize() {
                    info!(
                        plugin = %name,
                        bundle = %document.bundle_name,
                        assets = document.assets.len(),
                        chunks = document.chunks.len(),
                        modules = document.modules.len(),
                        duration_ms = document.duration,
                        "bundle analysis complete"
                    );
                }
            }),
        );

        if self.dry_run {
            return;
        }

        let analysis = Arc::clone(&self.analysis);
        let sink = Arc::clone(&self.sink);
        let name = self.name.clone();
        hooks.tap_persist(
            &self.name,
            Box::new(move || {
                let document = analysis.lock().finalized()?;
                let analysis = Arc::clone(&analysis);
                let sink = Arc::clone(&sink);
                let name = name.clone();

                Some(Box::pin(async move {
                    match sink.persist(&document).await {
                        Ok(()) => {
                            analysis.lock().mark_persisted(&document);
                            info!(plugin = %name, sink = sink.name(), bundle = %document.bundle_name, "persisted bundle stats");
                        }
                        Err(err) => {
                            error!(
                                plugin = %name,
                                sink = sink.name(),
                                bundle = %document.bundle_name,
                                error = %format!("{err:#}"),
                                "failed to persist bundle stats"
                            );
                        }
                    }
                }) as PersistFuture)
            }),
        );
    }
}

/// One analysis pass, plus the dry-run artifact when enabled.
fn analyze_and_emit(
    analysis: &mut BundleAnalysis,
    source: &dyn StatsSource,
    emitter: &mut dyn AssetEmitter,
    dry_run: bool,
) -> Result<()> {
    let document = analysis.analyze(source)?;
    if dry_run {
        let json = document.to_json_pretty()?;
        emitter.emit_asset(&stats_file_name(&document.bundle_name), json.into_bytes())?;
    }
    Ok(())
}

impl std::fmt::Debug for BundleAnalysisPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleAnalysisPlugin")
            .field("name", &self.name)
            .field("dry_run", &self.dry_run)
            .field("sink", &self.sink.name())
            .finish_non_exhaustive()
    }
}
