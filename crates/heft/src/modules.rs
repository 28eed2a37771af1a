//! Module normalization.

use crate::chunks::ChunkIdMap;
use crate::document::Module;
use crate::stats::StatsModule;

/// Normalize the host's modules against a resolved chunk table.
///
/// Output mirrors input order with no deduplication. A missing name becomes
/// `""` and a missing size `0`.
pub fn normalize_modules(modules: &[StatsModule], ids: &ChunkIdMap) -> Vec<Module> {
    modules
        .iter()
        .map(|module| Module {
            name: module.name.clone().unwrap_or_default(),
            size: module.size.unwrap_or(0),
            chunk_unique_ids: ids.resolve_all(&module.chunks),
        })
        .collect()
}
