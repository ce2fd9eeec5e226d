//! Requirements and requirement changes

use serde::{Deserialize, Serialize};

use crate::ldap::Filter;
use crate::metadata::capability::{ProvidedCapability, namespaces};
use crate::version::{Version, VersionRange};

/// A required capability: namespace + name + version range, optionally
/// scoped to a platform filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    pub namespace: String,
    pub name: String,
    pub range: VersionRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default = "default_greedy")]
    pub greedy: bool,
}

fn default_greedy() -> bool {
    true
}

impl Requirement {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, range: VersionRange) -> Self {
        Requirement {
            namespace: namespace.into(),
            name: name.into(),
            range,
            filter: None,
            optional: false,
            greedy: true,
        }
    }

    /// A requirement on an installable unit by id.
    pub fn on_iu(id: impl Into<String>, range: VersionRange) -> Self {
        Requirement::new(namespaces::IU, id, range)
    }

    /// A requirement pinned to exactly one version, `[v, v]`.
    pub fn exact(id: impl Into<String>, version: Version) -> Self {
        Requirement::on_iu(id, VersionRange::exact(version))
    }

    pub fn with_filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_greedy(mut self, greedy: bool) -> Self {
        self.greedy = greedy;
        self
    }

    /// Whether the two requirements target the same (namespace, name) slot.
    pub fn same_slot(&self, other: &Requirement) -> bool {
        self.namespace == other.namespace && self.name == other.name
    }

    pub fn is_satisfied_by(&self, capability: &ProvidedCapability) -> bool {
        self.namespace == capability.namespace
            && self.name == capability.name
            && self.range.includes(&capability.version)
    }
}

/// A patch entry: replace requirements matching `applies_to` with
/// `new_requirement` in the patched unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementChange {
    pub applies_to: Requirement,
    pub new_requirement: Requirement,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_requirement_is_singleton_range() {
        let req = Requirement::exact("org.example.app", Version::new(1, 2, 3));
        assert!(req.is_satisfied_by(&ProvidedCapability::self_capability(
            "org.example.app",
            &Version::new(1, 2, 3)
        )));
        assert!(!req.is_satisfied_by(&ProvidedCapability::self_capability(
            "org.example.app",
            &Version::new(1, 2, 4)
        )));
    }

    #[test]
    fn test_satisfaction_requires_matching_namespace() {
        let req = Requirement::new(
            namespaces::OSGI_BUNDLE,
            "core",
            VersionRange::any(),
        );
        let wrong_ns = ProvidedCapability::new(namespaces::IU, "core", Version::new(1, 0, 0));
        assert!(!req.is_satisfied_by(&wrong_ns));
    }

    #[test]
    fn test_serde_defaults() {
        let json = r#"{"namespace":"org.eclipse.equinox.p2.iu","name":"x","range":"[1.0.0,1.0.0]"}"#;
        let req: Requirement = serde_json::from_str(json).unwrap();
        assert!(!req.optional);
        assert!(req.greedy);
        assert!(req.filter.is_none());
    }
}
