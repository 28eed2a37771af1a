//! Chunk identity resolution.
//!
//! Host chunk ids are build-local: they may be numeric indices, may be names,
//! and a single chunk may be referred to by more than one of them. The resolver
//! assigns every chunk one `uniqueId` and records every native alias it is
//! known by in a [`ChunkIdMap`].
//!
//! The map can only be obtained from [`resolve_chunks`], and the asset and
//! module normalizers take it by reference. Normalizing before resolving is
//! therefore not expressible.

use indexmap::IndexSet;
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::document::Chunk;
use crate::stats::{ChunkRef, StatsChunk};

/// Native chunk id → resolver-assigned `uniqueId`, for one build.
#[derive(Debug, Clone)]
pub struct ChunkIdMap {
    ids: FxHashMap<ChunkRef, String>,
}

impl ChunkIdMap {
    pub fn get(&self, native: &ChunkRef) -> Option<&str> {
        self.ids.get(native).map(String::as_str)
    }

    /// Map native references to unique ids.
    ///
    /// Unknown references are dropped. The result is deduplicated and keeps
    /// first-seen order.
    pub fn resolve_all<'a>(&self, natives: impl IntoIterator<Item = &'a ChunkRef>) -> Vec<String> {
        natives
            .into_iter()
            .filter_map(|native| self.get(native))
            .map(str::to_owned)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Output of chunk resolution: the chunk records plus the alias table.
#[derive(Debug, Clone)]
pub struct ResolvedChunks {
    pub chunks: Vec<Chunk>,
    pub ids: ChunkIdMap,
}

/// Assign a `uniqueId` to every chunk and build the alias table.
///
/// `uniqueId` is `"<index>-<primary id>"`, unique within the build because the
/// index is. An alias already claimed by an earlier chunk keeps its first owner.
pub fn resolve_chunks(chunks: &[StatsChunk]) -> ResolvedChunks {
    let mut ids = ChunkIdMap {
        ids: FxHashMap::default(),
    };
    let mut owners: FxHashMap<&ChunkRef, usize> = FxHashMap::default();
    let mut unique_ids = Vec::with_capacity(chunks.len());

    for (index, chunk) in chunks.iter().enumerate() {
        let native = chunk.id.as_ref().map(ChunkRef::to_string).unwrap_or_default();
        let unique_id = format!("{index}-{native}");

        for alias in chunk.aliases() {
            match owners.get(alias) {
                Some(&owner) if owner != index => {
                    warn!(
                        alias = %alias,
                        owner = %unique_ids[owner],
                        ignored = %unique_id,
                        "chunk alias claimed by more than one chunk"
                    );
                }
                Some(_) => {}
                None => {
                    owners.insert(alias, index);
                    ids.ids.insert(alias.clone(), unique_id.clone());
                }
            }
        }

        unique_ids.push(unique_id);
    }

    let records = chunks
        .iter()
        .zip(unique_ids)
        .map(|(chunk, unique_id)| Chunk {
            id: chunk.id.as_ref().map(ChunkRef::to_string).unwrap_or_default(),
            unique_id,
            entry: chunk.entry,
            initial: chunk.initial,
            files: chunk.files.clone(),
            names: chunk.names.clone(),
            dynamic_imports: dynamic_imports(chunk, chunks, &owners),
        })
        .collect();

    ResolvedChunks {
        chunks: records,
        ids,
    }
}

/// Files of every child chunk that resolves through the alias table.
fn dynamic_imports(
    chunk: &StatsChunk,
    all: &[StatsChunk],
    owners: &FxHashMap<&ChunkRef, usize>,
) -> Vec<String> {
    chunk
        .children
        .iter()
        .filter_map(|child| owners.get(child))
        .flat_map(|&index| all[index].files.iter().cloned())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}
