//! Bundle entries in a runtime configuration

use std::path::{Path, PathBuf};

use crate::common::path_normalizer;
use crate::version::Version;

/// Sentinel for "no start level assigned".
pub const NO_LEVEL: i32 = -1;

/// Sentinel for "no bundle id assigned yet".
pub const NO_BUNDLE_ID: i64 = -1;

/// One bundle in a runtime installation's configuration.
///
/// Identity for dedup purposes is (symbolic name, version), or the
/// normalized location when the names differ.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleInfo {
    pub symbolic_name: String,
    pub version: Version,
    pub location: PathBuf,
    pub start_level: i32,
    pub marked_as_started: bool,
    pub bundle_id: i64,
}

impl BundleInfo {
    pub fn new(
        symbolic_name: impl Into<String>,
        version: Version,
        location: impl Into<PathBuf>,
    ) -> Self {
        BundleInfo {
            symbolic_name: symbolic_name.into(),
            version,
            location: location.into(),
            start_level: NO_LEVEL,
            marked_as_started: false,
            bundle_id: NO_BUNDLE_ID,
        }
    }

    pub fn with_start_level(mut self, start_level: i32) -> Self {
        self.start_level = start_level;
        self
    }

    pub fn with_started(mut self, started: bool) -> Self {
        self.marked_as_started = started;
        self
    }

    /// Whether two bundle infos identify the same bundle: same symbolic
    /// name and version, or the same normalized location.
    pub fn same_bundle(&self, other: &BundleInfo) -> bool {
        (self.symbolic_name == other.symbolic_name && self.version == other.version)
            || path_normalizer::same_location(&self.location, &other.location)
    }

    /// Whether this bundle lives at the given location (normalized).
    pub fn at_location(&self, location: &Path) -> bool {
        path_normalizer::same_location(&self.location, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str, version: &str, location: &str) -> BundleInfo {
        BundleInfo::new(name, Version::parse(version).unwrap(), location)
    }

    #[test]
    fn test_defaults() {
        let bundle = info("org.example.core", "1.0.0", "/plugins/core.jar");
        assert_eq!(bundle.start_level, NO_LEVEL);
        assert_eq!(bundle.bundle_id, NO_BUNDLE_ID);
        assert!(!bundle.marked_as_started);
    }

    #[test]
    fn test_same_bundle_by_name_and_version() {
        let a = info("org.example.core", "1.0.0", "/a/core.jar");
        let b = info("org.example.core", "1.0.0", "/b/core.jar");
        assert!(a.same_bundle(&b));
    }

    #[test]
    fn test_different_version_is_different_bundle() {
        let a = info("org.example.core", "1.0.0", "/a/core-1.jar");
        let b = info("org.example.core", "2.0.0", "/a/core-2.jar");
        assert!(!a.same_bundle(&b));
    }

    #[test]
    fn test_same_bundle_by_location() {
        let a = info("org.example.core", "1.0.0", "/plugins/core.jar");
        let b = info("unknown", "0.0.0", "/plugins/core.jar");
        assert!(a.same_bundle(&b));
    }
}
