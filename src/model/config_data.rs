//! The bundle list and properties of a runtime configuration

use std::collections::BTreeMap;
use std::path::Path;

use crate::model::bundle_info::BundleInfo;
use crate::version::Version;

/// Default start level assigned to bundles without an explicit one.
pub const DEFAULT_INITIAL_BUNDLE_START_LEVEL: i32 = 4;

/// Default framework beginning start level.
pub const DEFAULT_BEGINNING_FW_START_LEVEL: i32 = 6;

/// Property key prefixes reserved for the framework.
const FW_DEPENDENT_PREFIXES: [&str; 2] = ["osgi.", "eclipse."];

/// Mutable bundle list and property maps of one installation.
///
/// Holds at most one [`BundleInfo`] per (symbolic name, version) pair;
/// [`ConfigData::add_bundle`] silently drops duplicates so installs are
/// idempotent. Properties are partitioned into framework-dependent keys
/// (reserved prefixes) and framework-independent ones.
#[derive(Debug, Clone)]
pub struct ConfigData {
    pub initial_bundle_start_level: i32,
    pub beginning_fw_start_level: i32,
    bundles: Vec<BundleInfo>,
    fw_dependent: BTreeMap<String, String>,
    fw_independent: BTreeMap<String, String>,
}

impl ConfigData {
    pub fn new() -> Self {
        ConfigData {
            initial_bundle_start_level: DEFAULT_INITIAL_BUNDLE_START_LEVEL,
            beginning_fw_start_level: DEFAULT_BEGINNING_FW_START_LEVEL,
            bundles: Vec::new(),
            fw_dependent: BTreeMap::new(),
            fw_independent: BTreeMap::new(),
        }
    }

    /// Append a bundle unless an equal bundle (same name+version or same
    /// normalized location) is already present. Returns whether the bundle
    /// was added.
    pub fn add_bundle(&mut self, bundle: BundleInfo) -> bool {
        if self.bundles.iter().any(|b| b.same_bundle(&bundle)) {
            return false;
        }
        self.bundles.push(bundle);
        true
    }

    /// Remove the bundle matching the given one, returning it.
    pub fn remove_bundle(&mut self, bundle: &BundleInfo) -> Option<BundleInfo> {
        let index = self.bundles.iter().position(|b| b.same_bundle(bundle))?;
        Some(self.bundles.remove(index))
    }

    /// Remove by symbolic name and version.
    pub fn remove_bundle_named(&mut self, name: &str, version: &Version) -> Option<BundleInfo> {
        let index = self
            .bundles
            .iter()
            .position(|b| b.symbolic_name == name && b.version == *version)?;
        Some(self.bundles.remove(index))
    }

    pub fn bundles(&self) -> &[BundleInfo] {
        &self.bundles
    }

    pub fn find_bundle(&self, name: &str, version: &Version) -> Option<&BundleInfo> {
        self.bundles
            .iter()
            .find(|b| b.symbolic_name == name && b.version == *version)
    }

    pub fn find_bundle_mut(&mut self, name: &str, version: &Version) -> Option<&mut BundleInfo> {
        self.bundles
            .iter_mut()
            .find(|b| b.symbolic_name == name && b.version == *version)
    }

    pub fn find_bundle_at(&self, location: &Path) -> Option<&BundleInfo> {
        self.bundles.iter().find(|b| b.at_location(location))
    }

    /// Whether a property key belongs to the framework-dependent partition.
    pub fn is_fw_dependent_key(key: &str) -> bool {
        FW_DEPENDENT_PREFIXES.iter().any(|p| key.starts_with(p))
    }

    /// Set a property, routed to the partition its key prefix selects.
    /// Returns the previous value.
    pub fn set_property(&mut self, key: &str, value: impl Into<String>) -> Option<String> {
        if Self::is_fw_dependent_key(key) {
            self.fw_dependent.insert(key.to_string(), value.into())
        } else {
            self.fw_independent.insert(key.to_string(), value.into())
        }
    }

    pub fn get_property(&self, key: &str) -> Option<&str> {
        if Self::is_fw_dependent_key(key) {
            self.fw_dependent.get(key).map(String::as_str)
        } else {
            self.fw_independent.get(key).map(String::as_str)
        }
    }

    /// Remove a property, returning the previous value.
    pub fn remove_property(&mut self, key: &str) -> Option<String> {
        if Self::is_fw_dependent_key(key) {
            self.fw_dependent.remove(key)
        } else {
            self.fw_independent.remove(key)
        }
    }

    pub fn fw_dependent_properties(&self) -> &BTreeMap<String, String> {
        &self.fw_dependent
    }

    pub fn fw_independent_properties(&self) -> &BTreeMap<String, String> {
        &self.fw_independent
    }
}

impl Default for ConfigData {
    fn default() -> Self {
        ConfigData::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(name: &str, version: &str) -> BundleInfo {
        BundleInfo::new(
            name,
            Version::parse(version).unwrap(),
            format!("/plugins/{name}_{version}.jar"),
        )
    }

    #[test]
    fn test_add_bundle_is_idempotent() {
        let mut data = ConfigData::new();
        assert!(data.add_bundle(bundle("org.example.a", "1.0.0")));
        assert!(!data.add_bundle(bundle("org.example.a", "1.0.0")));
        assert_eq!(data.bundles().len(), 1);
    }

    #[test]
    fn test_add_bundle_dedups_by_location() {
        let mut data = ConfigData::new();
        let a = BundleInfo::new("a", Version::new(1, 0, 0), "/plugins/a.jar");
        let b = BundleInfo::new("b", Version::new(2, 0, 0), "/plugins/x/../a.jar");
        assert!(data.add_bundle(a));
        assert!(!data.add_bundle(b));
    }

    #[test]
    fn test_two_versions_coexist() {
        let mut data = ConfigData::new();
        assert!(data.add_bundle(bundle("org.example.a", "1.0.0")));
        assert!(data.add_bundle(bundle("org.example.a", "2.0.0")));
        assert_eq!(data.bundles().len(), 2);
    }

    #[test]
    fn test_remove_bundle_named() {
        let mut data = ConfigData::new();
        data.add_bundle(bundle("org.example.a", "1.0.0"));
        let removed = data.remove_bundle_named("org.example.a", &Version::new(1, 0, 0));
        assert!(removed.is_some());
        assert!(data.bundles().is_empty());
        // Removing again finds nothing.
        assert!(
            data.remove_bundle_named("org.example.a", &Version::new(1, 0, 0))
                .is_none()
        );
    }

    #[test]
    fn test_property_partitioning() {
        let mut data = ConfigData::new();
        data.set_property("osgi.instance.area", "/workspace");
        data.set_property("eclipse.p2.data.area", "/p2");
        data.set_property("my.app.setting", "on");

        assert_eq!(data.fw_dependent_properties().len(), 2);
        assert_eq!(data.fw_independent_properties().len(), 1);
        assert_eq!(data.get_property("my.app.setting"), Some("on"));
    }

    #[test]
    fn test_set_property_returns_previous() {
        let mut data = ConfigData::new();
        assert!(data.set_property("my.key", "one").is_none());
        assert_eq!(data.set_property("my.key", "two"), Some("one".to_string()));
        assert_eq!(data.remove_property("my.key"), Some("two".to_string()));
        assert!(data.remove_property("my.key").is_none());
    }
}
