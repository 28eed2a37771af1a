//! Bundle naming policy.
//!
//! The reported bundle name is the configured base name, decorated with the
//! compilation name (multi-compilation hosts) and the chunk format:
//! `<base>[-<compilation>][-<format>]`. Absent or empty facets are omitted
//! entirely, and hyphens at a segment's edges are dropped so joining never
//! doubles them.

use std::fmt;

/// Chunk interop format of a compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkFormat {
    CommonJs,
    Module,
    Other(String),
}

impl ChunkFormat {
    /// Parse the host's chunk format string. Empty strings are no format.
    pub fn parse(format: &str) -> Option<Self> {
        match format {
            "" => None,
            "commonjs" => Some(ChunkFormat::CommonJs),
            "module" => Some(ChunkFormat::Module),
            other => Some(ChunkFormat::Other(other.to_string())),
        }
    }

    /// Short token used in bundle names.
    pub fn token(&self) -> &str {
        match self {
            ChunkFormat::CommonJs => "cjs",
            ChunkFormat::Module => "esm",
            ChunkFormat::Other(other) => other,
        }
    }
}

impl fmt::Display for ChunkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Compose the final bundle name.
///
/// ```
/// use heft::compose_bundle_name;
///
/// assert_eq!(compose_bundle_name("app", Some("client"), Some("commonjs")), "app-client-cjs");
/// assert_eq!(compose_bundle_name("mybundle", Some(""), Some("module")), "mybundle-esm");
/// assert_eq!(compose_bundle_name("app", None, None), "app");
/// ```
pub fn compose_bundle_name(
    base: &str,
    compilation_name: Option<&str>,
    chunk_format: Option<&str>,
) -> String {
    let format = chunk_format.and_then(ChunkFormat::parse);

    [Some(base), compilation_name, format.as_ref().map(ChunkFormat::token)]
        .into_iter()
        .flatten()
        .map(|segment| segment.trim_matches('-'))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
