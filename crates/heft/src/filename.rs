//! Filename format detection.
//!
//! Hashed filenames change on every content change, so `app.abcd1234.js` in
//! one build and `app.ef567890.js` in the next are the same asset. This module
//! turns a filename into a comparison key where volatile tokens are replaced by
//! `*`, using the host's filename template when one matches and a
//! hash-shape heuristic otherwise.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::stats::OutputOptions;

/// Placeholder substituted for volatile tokens.
pub const VOLATILE_PLACEHOLDER: &str = "*";

const VOLATILE_TOKENS: &[&str] = &["hash", "fullhash", "chunkhash", "contenthash", "modulehash"];

static ALNUM_RUN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new("[A-Za-z0-9]+").ok());

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Stable,
    Volatile { len: Option<usize> },
}

/// A parsed filename template such as `js/[name].[contenthash:8].js`.
#[derive(Debug, Clone)]
pub struct FilenameTemplate {
    source: String,
    segments: Vec<Segment>,
    matcher: Option<Regex>,
}

impl FilenameTemplate {
    pub fn parse(template: &str) -> Self {
        let segments = parse_segments(template);
        let matcher = build_matcher(&segments);
        Self {
            source: template.to_string(),
            segments,
            matcher,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the template contains any volatile placeholder.
    pub fn has_volatile(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Volatile { .. }))
    }

    pub fn matches(&self, filename: &str) -> bool {
        self.matcher.as_ref().is_some_and(|m| m.is_match(filename))
    }

    /// Replace the parts of `filename` that fill volatile placeholders.
    ///
    /// Returns `None` when the filename doesn't match the template.
    pub fn generalize(&self, filename: &str) -> Option<String> {
        let captures = self.matcher.as_ref()?.captures(filename)?;
        let mut out = String::with_capacity(filename.len());
        let mut group = 1;

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Stable => {
                    out.push_str(captures.get(group).map_or("", |m| m.as_str()));
                    group += 1;
                }
                Segment::Volatile { .. } => {
                    out.push_str(VOLATILE_PLACEHOLDER);
                    group += 1;
                }
            }
        }

        Some(out)
    }
}

fn parse_segments(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find(']').map(|c| open + c) else {
            break;
        };
        literal.push_str(&rest[..open]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }

        let token = &rest[open + 1..close];
        let (name, len) = match token.split_once(':') {
            Some((name, len)) => (name, len.parse().ok()),
            None => (token, None),
        };
        if VOLATILE_TOKENS.contains(&name) {
            segments.push(Segment::Volatile { len });
        } else {
            segments.push(Segment::Stable);
        }

        rest = &rest[close + 1..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

fn build_matcher(segments: &[Segment]) -> Option<Regex> {
    let mut pattern = String::from("^");
    for segment in segments {
        match segment {
            Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
            Segment::Stable => pattern.push_str("(.*?)"),
            Segment::Volatile { len: Some(n) } => {
                pattern.push_str(&format!("([0-9A-Za-z]{{{n}}})"));
            }
            Segment::Volatile { len: None } => pattern.push_str("([0-9A-Za-z]+)"),
        }
    }
    pattern.push('$');

    Regex::new(&pattern).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetKind {
    Script,
    Style,
    Other,
}

fn asset_kind(name: &str) -> AssetKind {
    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some("js" | "mjs" | "cjs") => AssetKind::Script,
        Some("css") => AssetKind::Style,
        _ => AssetKind::Other,
    }
}

/// Pick the output template that produced `asset_name`.
///
/// Stylesheets try `css_filename` then `css_chunk_filename`, scripts try
/// `filename` then `chunk_filename`, everything else `asset_module_filename`.
/// The first template that matches wins.
pub fn find_filename_format<'a>(asset_name: &str, output: &'a OutputOptions) -> Option<&'a str> {
    let candidates = match asset_kind(asset_name) {
        AssetKind::Script => [&output.filename, &output.chunk_filename],
        AssetKind::Style => [&output.css_filename, &output.css_chunk_filename],
        AssetKind::Other => [&output.asset_module_filename, &None],
    };

    candidates
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|template| FilenameTemplate::parse(template).matches(asset_name))
}

/// Comparison key for `filename`.
///
/// With a matching `template`, volatile placeholders are generalized; otherwise
/// hash-shaped tokens are. A filename with nothing volatile is returned as is.
pub fn normalize_filename(filename: &str, template: Option<&str>) -> String {
    if let Some(template) = template.map(FilenameTemplate::parse) {
        if template.has_volatile() {
            if let Some(generalized) = template.generalize(filename) {
                return generalized;
            }
        }
    }
    generalize_hash_tokens(filename)
}

fn generalize_hash_tokens(filename: &str) -> String {
    let Some(alnum_run) = ALNUM_RUN.as_ref() else {
        return filename.to_string();
    };
    alnum_run
        .replace_all(filename, |caps: &regex::Captures<'_>| {
            let token = &caps[0];
            if looks_like_hash(token) {
                VOLATILE_PLACEHOLDER.to_string()
            } else {
                token.to_string()
            }
        })
        .into_owned()
}

fn looks_like_hash(token: &str) -> bool {
    let has_digit = token.bytes().any(|b| b.is_ascii_digit());
    if !has_digit {
        return false;
    }
    let hex = token.len() >= 8 && token.bytes().all(|b| b.is_ascii_hexdigit());
    let long_mixed = token.len() >= 16 && token.bytes().any(|b| b.is_ascii_alphabetic());
    hex || long_mixed
}
