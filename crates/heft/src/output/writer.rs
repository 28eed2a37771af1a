//! Atomic, contained file writes for stats artifacts.
//!
//! Every write goes to a temporary sibling first and is renamed into place, so
//! a reader never sees a half-written document. Target names are resolved
//! against the output directory and rejected if they escape it; bundle names
//! may legitimately contain `/`, which turns into a subdirectory.

use std::fs;
use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::{Error, Result};

/// Write `content` to `dir/filename` atomically, creating directories as needed.
///
/// Returns the final path.
pub fn write_file_atomic(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf> {
    let dir = validate_and_normalize_dir(dir)?;
    let target_path = validate_output_path(&dir, filename)?;

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            Error::WriteFailure(format!(
                "Failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut temp_name = target_path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    fs::write(&temp_path, content).map_err(|e| {
        Error::WriteFailure(format!(
            "Failed to write temporary file '{}': {}",
            temp_path.display(),
            e
        ))
    })?;

    if let Err(e) = fs::rename(&temp_path, &target_path) {
        cleanup_temp_file(&temp_path);
        return Err(Error::WriteFailure(format!(
            "Failed to rename '{}' to '{}': {}",
            temp_path.display(),
            target_path.display(),
            e
        )));
    }

    Ok(target_path)
}

fn validate_and_normalize_dir(dir: &Path) -> Result<PathBuf> {
    let cleaned = dir.clean();
    if cleaned.is_absolute() {
        return Ok(cleaned);
    }

    let cwd = std::env::current_dir().map_err(|e| {
        Error::InvalidOutputPath(format!("Failed to get current directory: {}", e))
    })?;
    Ok(cwd.join(&cleaned).clean())
}

/// Resolve `filename` under `base_dir`, rejecting traversal and null bytes.
pub(crate) fn validate_output_path(base_dir: &Path, filename: &str) -> Result<PathBuf> {
    if filename.contains('\0') {
        return Err(Error::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }

    let full_path = base_dir.join(Path::new(filename).clean()).clean();
    if !full_path.starts_with(base_dir) || full_path == base_dir {
        return Err(Error::InvalidOutputPath(format!(
            "Path '{}' escapes output directory '{}' (resolved to '{}')",
            filename,
            base_dir.display(),
            full_path.display()
        )));
    }

    Ok(full_path)
}

fn cleanup_temp_file(temp_path: &Path) {
    if temp_path.exists() {
        if let Err(e) = fs::remove_file(temp_path) {
            tracing::warn!(
                path = %temp_path.display(),
                error = %e,
                "failed to clean up temporary file"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_output_path_normal() {
        let base = Path::new("/tmp/output");
        let result = validate_output_path(base, "app-stats.json").unwrap();
        assert_eq!(result, Path::new("/tmp/output/app-stats.json"));
    }

    #[test]
    fn test_validate_output_path_bundle_name_with_slash() {
        let base = Path::new("/tmp/output");
        let result = validate_output_path(base, "@scope/app-stats.json").unwrap();
        assert_eq!(result, Path::new("/tmp/output/@scope/app-stats.json"));
    }

    #[test]
    fn test_validate_output_path_traversal() {
        let base = Path::new("/tmp/output");
        assert!(matches!(
            validate_output_path(base, "../etc/passwd"),
            Err(Error::InvalidOutputPath(_))
        ));
        assert!(validate_output_path(base, "safe/../../../../etc/passwd").is_err());
        assert!(validate_output_path(base, ".").is_err());
    }

    #[test]
    fn test_validate_output_path_null_byte() {
        let base = Path::new("/tmp/output");
        assert!(validate_output_path(base, "file\0name.json").is_err());
    }

    #[test]
    fn test_write_file_atomic_creates_directories() {
        let temp = tempfile::tempdir().unwrap();
        let path = write_file_atomic(temp.path(), "nested/app-stats.json", b"{}").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"{}");
        assert!(!path.with_file_name("app-stats.json.tmp").exists());
    }
}
