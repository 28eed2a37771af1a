//! Asset normalization.

use tracing::trace;

use crate::chunks::ChunkIdMap;
use crate::document::Asset;
use crate::filename::{find_filename_format, normalize_filename};
use crate::stats::{OutputOptions, StatsAsset};

/// Normalize the host's assets against a resolved chunk table.
///
/// One record per input asset, in input order. Chunk references missing from
/// `ids` are dropped from `chunk_unique_ids`; the asset itself is always kept.
/// `gzip_size` is left empty for [`crate::compression`] to fill in.
pub fn normalize_assets(
    assets: &[StatsAsset],
    ids: &ChunkIdMap,
    output: &OutputOptions,
) -> Vec<Asset> {
    assets
        .iter()
        .map(|asset| {
            let chunk_unique_ids = ids.resolve_all(&asset.chunks);
            if chunk_unique_ids.len() < asset.chunks.len() {
                trace!(asset = %asset.name, "dropped unresolved chunk references");
            }

            let template = find_filename_format(&asset.name, output);
            Asset {
                name: asset.name.clone(),
                size: asset.size,
                gzip_size: None,
                normalized: normalize_filename(&asset.name, template),
                chunk_unique_ids,
            }
        })
        .collect()
}
