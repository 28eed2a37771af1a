//! Analyze command implementation.
//!
//! The CLI plays the host build: each compilation in the stats file is one
//! build attempt, run through the hook sequence against a single plugin.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use heft::output::DirectoryEmitter;
use heft::{
    BundleAnalysisPlugin, BundleStatsDocument, Hooks, JsonFileSink, PendingPersists, PluginInfo,
    StatsSnapshot,
};
use heft_config::AnalysisOptions;
use tracing::debug;

use crate::PLUGIN_NAME;
use crate::cli::AnalyzeArgs;
use crate::error::{Result, ResultExt};
use crate::ui;

/// Execute the analyze command.
///
/// # Steps
///
/// 1. Load and validate options (file, environment, flags)
/// 2. Parse the stats file into one snapshot per compilation
/// 3. Run start, asset processing and done for each compilation
/// 4. Wait for every persistence handoff before returning
///
/// Persistence failures are logged and do not fail the command.
pub async fn execute(args: AnalyzeArgs) -> Result<()> {
    let options = AnalysisOptions::load(args.config.as_deref(), &args.overrides())?;
    options.validate()?;

    if !options.enable_bundle_analysis {
        ui::warning("Bundle analysis is disabled (enableBundleAnalysis = false)");
        return Ok(());
    }

    let json = tokio::fs::read_to_string(&args.stats)
        .await
        .with_path(&args.stats)?;
    let snapshots = StatsSnapshot::from_json(&json)
        .with_hint(format!("{} is not a bundler stats file", args.stats.display()))?;
    if snapshots.is_empty() {
        ui::warning("Stats file contains no compilations");
        return Ok(());
    }

    let stats_dir = args
        .stats
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let plugin = BundleAnalysisPlugin::new(
        options.analysis_config(PluginInfo::new(PLUGIN_NAME, env!("CARGO_PKG_VERSION"))),
        Arc::new(JsonFileSink::new(&options.report_dir)),
    );
    let mut hooks = Hooks::new();
    plugin.apply(&mut hooks);

    let mut documents: Vec<Arc<BundleStatsDocument>> = Vec::with_capacity(snapshots.len());
    let mut pending: Vec<PendingPersists> = Vec::with_capacity(snapshots.len());

    for snapshot in snapshots {
        let build_dir = output_dir(&args, &snapshot, &stats_dir);
        let snapshot = prepare(snapshot, &options, &build_dir);
        let mut emitter = DirectoryEmitter::new(&build_dir);
        ui::debug(
            options.debug,
            &format!(
                "Analyzing compilation {} ({} assets, {} chunks, {} modules)",
                snapshot.compilation_name.as_deref().unwrap_or("<root>"),
                snapshot.assets.len(),
                snapshot.chunks.len(),
                snapshot.modules.len()
            ),
        );

        hooks.call_build_start();
        // Reads emitted assets from disk for gzip sizes.
        tokio::task::block_in_place(|| hooks.call_process_assets(&snapshot, &mut emitter))?;
        hooks.call_done();

        if let Some(document) = plugin.analysis().lock().finalized() {
            documents.push(document);
        }
        for path in emitter.emitted() {
            ui::success(&format!("Wrote {}", path.display()));
        }

        pending.push(hooks.call_persist());
    }

    let in_flight: usize = pending.iter().map(PendingPersists::len).sum();
    if in_flight > 0 {
        ui::info(&format!(
            "Persisting {} report(s) to {}",
            in_flight,
            options.report_dir.display()
        ));
    }
    for persists in pending {
        persists.flush().await;
    }
    debug!(documents = documents.len(), "analysis finished");

    ui::print_analysis_summary(&documents, options.debug);
    Ok(())
}

/// Where the compilation's files live: `--out-dir`, then the stats
/// `outputPath`, then the stats file's directory.
fn output_dir(args: &AnalyzeArgs, snapshot: &StatsSnapshot, stats_dir: &Path) -> PathBuf {
    args.out_dir
        .clone()
        .or_else(|| snapshot.asset_root.clone())
        .unwrap_or_else(|| stats_dir.to_path_buf())
}

/// Apply configured overrides to a snapshot before analysis.
fn prepare(snapshot: StatsSnapshot, options: &AnalysisOptions, build_dir: &Path) -> StatsSnapshot {
    let mut output = snapshot.output.clone();
    options.output.apply_to(&mut output);

    let snapshot = snapshot.with_output(output).with_asset_root(build_dir);
    match &options.bundler {
        Some(bundler) => snapshot.with_bundler(bundler.clone()),
        None => snapshot,
    }
}
