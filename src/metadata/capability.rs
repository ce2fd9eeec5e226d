//! Provided capabilities

use serde::{Deserialize, Serialize};

use crate::version::Version;

/// Well-known capability namespaces.
pub mod namespaces {
    /// The namespace of installable unit identities.
    pub const IU: &str = "org.eclipse.equinox.p2.iu";
    /// OSGi bundles.
    pub const OSGI_BUNDLE: &str = "osgi.bundle";
    /// Eclipse features.
    pub const FEATURE: &str = "org.eclipse.update.feature";
    /// Fragment host slots.
    pub const OSGI_FRAGMENT: &str = "osgi.fragment";
    /// Exported Java packages.
    pub const JAVA_PACKAGE: &str = "java.package";
}

/// A (namespace, name, version) tuple an installable unit offers.
///
/// A unit's capability set holds at most one entry per (namespace, name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidedCapability {
    pub namespace: String,
    pub name: String,
    pub version: Version,
}

impl ProvidedCapability {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: Version,
    ) -> Self {
        ProvidedCapability {
            namespace: namespace.into(),
            name: name.into(),
            version,
        }
    }

    /// The self-capability every unit must carry: its own id and version in
    /// the IU namespace.
    pub fn self_capability(id: &str, version: &Version) -> Self {
        ProvidedCapability::new(namespaces::IU, id, version.clone())
    }

    pub fn same_slot(&self, other: &ProvidedCapability) -> bool {
        self.namespace == other.namespace && self.name == other.name
    }
}
