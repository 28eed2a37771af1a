//! Formatting for sizes, timestamps and analysis summaries.

use chrono::{DateTime, SecondsFormat};
use console::Term;
use heft::BundleStatsDocument;
use owo_colors::{OwoColorize, Stream::Stderr};

/// Human-readable byte size.
///
/// ```
/// use heft_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// RFC 3339 rendering of a millisecond Unix timestamp.
pub fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| millis.to_string())
}

/// Print one block per analyzed bundle to stderr.
///
/// With `detailed`, every asset is listed with its comparison key.
pub fn print_analysis_summary(documents: &[std::sync::Arc<BundleStatsDocument>], detailed: bool) {
    let width = (Term::stderr().size().1 as usize).min(80);

    let title = "Bundle Analysis".if_supports_color(Stderr, |t| t.bold().underline().to_string());
    eprintln!("\n{}", title);
    eprintln!("{}", "─".repeat(width));

    for document in documents {
        let gzip_total: u64 = document.assets.iter().filter_map(|a| a.gzip_size).sum();

        eprintln!(
            "  {} {} {}",
            "▸".if_supports_color(Stderr, |t| t.blue()),
            document
                .bundle_name
                .if_supports_color(Stderr, |t| t.bright_white().bold().to_string()),
            format!("({} {})", document.bundler.name, document.bundler.version)
                .if_supports_color(Stderr, |t| t.dimmed())
        );
        eprintln!(
            "    {} assets, {} chunks, {} modules",
            document.assets.len(),
            document.chunks.len(),
            document.modules.len()
        );
        eprintln!(
            "    {} total, {} gzip",
            format_size(document.total_size()).if_supports_color(Stderr, |t| t.green()),
            format_size(gzip_total).if_supports_color(Stderr, |t| t.green())
        );
        eprintln!(
            "    {}",
            format!("built at {}", format_timestamp(document.built_at))
                .if_supports_color(Stderr, |t| t.dimmed())
        );

        if detailed {
            for asset in &document.assets {
                eprintln!(
                    "      {} {} {}",
                    asset.name,
                    format!("→ {}", asset.normalized).if_supports_color(Stderr, |t| t.dimmed()),
                    format_size(asset.size).if_supports_color(Stderr, |t| t.dimmed())
                );
            }
        }
    }

    eprintln!("{}", "─".repeat(width));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.00 GB");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_timestamp(1_700_000_000_123), "2023-11-14T22:13:20.123Z");
    }
}
