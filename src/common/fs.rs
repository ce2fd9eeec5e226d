//! File system helpers shared by the parsers and touchpoint actions

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{ProvisorError, Result};

/// Rename an existing file to a timestamped sibling before it is rewritten.
///
/// Returns the backup path, or `None` when the destination does not exist.
/// A failed rename is a hard I/O error: the caller must not overwrite a file
/// it promised to preserve.
pub fn backup_file(path: &Path) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "backup".to_string());
    let mut backup = path.with_file_name(format!("{file_name}.{stamp}.bak"));

    // Avoid clobbering an earlier backup taken in the same second.
    let mut counter = 1;
    while backup.exists() {
        backup = path.with_file_name(format!("{file_name}.{stamp}-{counter}.bak"));
        counter += 1;
    }

    std::fs::rename(path, &backup).map_err(|e| ProvisorError::BackupFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(Some(backup))
}

/// Write file contents, creating parent directories as needed.
pub fn write_with_parents(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ProvisorError::write_failed(path, &e))?;
    }
    std::fs::write(path, contents).map_err(|e| ProvisorError::write_failed(path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_missing_file_is_none() {
        let temp = TempDir::new().unwrap();
        let result = backup_file(&temp.path().join("missing.ini")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_backup_moves_original() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "original").unwrap();

        let backup = backup_file(&path).unwrap().unwrap();
        assert!(!path.exists());
        assert!(backup.exists());
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "original");
    }

    #[test]
    fn test_backup_twice_does_not_clobber() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");

        std::fs::write(&path, "first").unwrap();
        let first = backup_file(&path).unwrap().unwrap();
        std::fs::write(&path, "second").unwrap();
        let second = backup_file(&path).unwrap().unwrap();

        assert_ne!(first, second);
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "first");
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "second");
    }

    #[test]
    fn test_write_with_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("configuration/config.ini");
        write_with_parents(&path, "key=value").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "key=value");
    }
}
