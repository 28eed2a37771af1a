//! Gzip size reporting for emitted assets.

use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use tracing::debug;

use crate::document::Asset;
use crate::stats::StatsSource;

const COMPRESSIBLE_EXTENSIONS: &[&str] = &[
    "js", "mjs", "cjs", "css", "html", "json", "svg", "txt", "xml",
];

/// Whether gzip size is reported for this filename.
pub fn is_compressible(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| COMPRESSIBLE_EXTENSIONS.contains(&ext))
}

/// Length of `bytes` after gzip at the default level.
pub fn gzip_size(bytes: &[u8]) -> std::io::Result<u64> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    let compressed = encoder.finish()?;
    Ok(compressed.len() as u64)
}

/// Fill `gzip_size` for every compressible asset the source can supply bytes for.
pub fn fill_gzip_sizes(assets: &mut [Asset], source: &dyn StatsSource) {
    for asset in assets.iter_mut().filter(|a| is_compressible(&a.name)) {
        let Some(bytes) = source.asset_contents(&asset.name) else {
            continue;
        };
        match gzip_size(&bytes) {
            Ok(size) => asset.gzip_size = Some(size),
            Err(err) => debug!(asset = %asset.name, error = %err, "gzip size unavailable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_compressible() {
        assert!(is_compressible("app.js"));
        assert!(is_compressible("styles/main.css"));
        assert!(!is_compressible("logo.png"));
        assert!(!is_compressible("app.js.map"));
        assert!(!is_compressible("LICENSE"));
    }

    #[test]
    fn test_gzip_shrinks_repetitive_input() {
        let input = "console.log('hello');\n".repeat(200);
        let size = gzip_size(input.as_bytes()).unwrap();
        assert!(size > 0);
        assert!(size < input.len() as u64);
    }
}
