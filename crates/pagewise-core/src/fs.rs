//! Atomic output file writes

use std::io::Write;
use std::path::Path;

use crate::error::{PagewiseError, Result};

/// Create a directory and its parents if missing.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Write `content` to `path` so readers never observe a partial file.
///
/// The text goes to a temporary file in the destination directory first and is
/// then renamed over `path`. On failure the temporary file is removed and any
/// previous file at `path` is left untouched.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written, or if
/// the final rename fails.
pub fn write_text_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".pagewise-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| PagewiseError::IoError(e.error))?;

    log::debug!("wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_write_creates_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("combined.txt");

        write_text_atomic(&target, "hello\n").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "hello\n");
        assert_eq!(entries(dir.path()), vec!["combined.txt".to_string()]);
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("_errors.txt");
        std::fs::write(&target, "old content that is longer").unwrap();

        write_text_atomic(&target, "new").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
        assert_eq!(entries(dir.path()), vec!["_errors.txt".to_string()]);
    }

    #[test]
    fn test_failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("combined.txt");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), "x").unwrap();

        let result = write_text_atomic(&blocker, "content");

        assert!(matches!(result, Err(PagewiseError::IoError(_))));
        assert_eq!(entries(dir.path()), vec!["combined.txt".to_string()]);
        assert!(blocker.join("keep").exists());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("combined.txt");
        assert!(write_text_atomic(&target, "x").is_err());
    }

    #[test]
    fn test_ensure_dir_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir(&nested).unwrap();
    }
}
