//! Path normalization utilities
//!
//! Bundle locations and launcher config locations are compared by normalized
//! path, so `/install/plugins/../plugins/a.jar` and `/install/plugins/a.jar`
//! identify the same bundle regardless of how they were written.

use normpath::PathExt;
use std::path::{Path, PathBuf};

/// Normalize a path, resolving symlinks and `..` components where possible.
///
/// For non-existent paths, the longest existing ancestor is normalized and
/// the remaining components are appended, so comparisons stay stable across
/// paths that have not been created yet.
pub fn normalize(path: &Path) -> PathBuf {
    if let Ok(norm) = path.normalize() {
        return dunce::simplified(norm.as_path()).to_path_buf();
    }

    // Walk up until an existing ancestor is found.
    let mut current = path;
    let mut components = Vec::new();
    while !current.exists() {
        match (current.file_name(), current.parent()) {
            (Some(name), Some(parent)) => {
                components.push(name.to_os_string());
                current = parent;
            }
            _ => return path.to_path_buf(),
        }
    }

    let mut result = current
        .normalize()
        .map(|norm| norm.as_path().to_path_buf())
        .unwrap_or_else(|_| current.to_path_buf());
    for component in components.iter().rev() {
        result.push(component);
    }
    dunce::simplified(&result).to_path_buf()
}

/// Whether two paths identify the same location once normalized.
pub fn same_location(a: &Path, b: &Path) -> bool {
    normalize(a) == normalize(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_resolves_dotdot() {
        let temp = TempDir::new().unwrap();
        let plugins = temp.path().join("plugins");
        std::fs::create_dir(&plugins).unwrap();

        let direct = plugins.join("a.jar");
        let indirect = temp.path().join("plugins/../plugins/a.jar");
        assert!(same_location(&direct, &indirect));
    }

    #[test]
    fn test_normalize_nonexistent_path_keeps_tail() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("does/not/exist.jar");
        let normalized = normalize(&missing);
        assert!(normalized.ends_with("does/not/exist.jar"));
    }

    #[test]
    fn test_different_files_are_different_locations() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.jar");
        let b = temp.path().join("b.jar");
        assert!(!same_location(&a, &b));
    }
}
