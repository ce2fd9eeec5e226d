//! Installable unit metadata
//!
//! The immutable metadata graph the publisher produces: installable units
//! with provided capabilities, requirements, touchpoint data, and artifact
//! keys. Units are assembled through [`iu::InstallableUnitBuilder`] and
//! frozen on build; nothing mutates a built unit.

/// Well-known unit property keys.
pub mod props {
    /// Marks a unit as a group of other units (features, root units).
    pub const TYPE_GROUP: &str = "org.eclipse.equinox.p2.type.group";
    /// Marks a unit as an installable-unit patch.
    pub const TYPE_PATCH: &str = "org.eclipse.equinox.p2.type.patch";
    /// Marks a configuration fragment unit.
    pub const TYPE_FRAGMENT: &str = "org.eclipse.equinox.p2.type.fragment";
    /// Human-readable unit name.
    pub const NAME: &str = "org.eclipse.equinox.p2.name";
    pub const PROVIDER: &str = "org.eclipse.equinox.p2.provider";
    pub const DESCRIPTION: &str = "org.eclipse.equinox.p2.description";
}

pub mod artifact_key;
pub mod capability;
pub mod iu;
pub mod requirement;
pub mod touchpoint_data;

pub use artifact_key::ArtifactKey;
pub use capability::{ProvidedCapability, namespaces};
pub use iu::{InstallableUnit, InstallableUnitBuilder, PatchInfo};
pub use requirement::{Requirement, RequirementChange};
pub use touchpoint_data::{TouchpointData, TouchpointType};
