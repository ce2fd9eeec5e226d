//! Installable units and their builder
//!
//! Units are immutable once built. The builder enforces the structural
//! invariants: the self-capability is always present, capability slots are
//! unique per (namespace, name), and requirement slots are deduplicated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ldap::Filter;
use crate::metadata::artifact_key::ArtifactKey;
use crate::metadata::capability::ProvidedCapability;
use crate::metadata::requirement::{Requirement, RequirementChange};
use crate::metadata::touchpoint_data::{TouchpointData, TouchpointType};
use crate::version::{Version, VersionRange};

/// Patch information carried by an installable-unit patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchInfo {
    /// The units this patch applies to.
    pub applicability_scope: Vec<Requirement>,
    /// Requirement replacements performed on the patched unit.
    pub requirement_changes: Vec<RequirementChange>,
    /// Requirement tying the patch's lifecycle to its target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle: Option<Requirement>,
}

/// An immutable installable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallableUnit {
    pub id: String,
    pub version: Version,
    #[serde(default)]
    pub singleton: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    pub provided: Vec<ProvidedCapability>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<Requirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub touchpoint_type: Option<TouchpointType>,
    #[serde(default, skip_serializing_if = "TouchpointData::is_empty")]
    pub touchpoint_data: TouchpointData,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<ArtifactKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<PatchInfo>,
    /// Host requirements when this unit is a fragment.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host_requirements: Vec<Requirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_descriptor: Option<UpdateDescriptor>,
}

/// Describes which older units this unit updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDescriptor {
    pub id: String,
    pub range: VersionRange,
}

impl InstallableUnit {
    pub fn builder(id: impl Into<String>, version: Version) -> InstallableUnitBuilder {
        InstallableUnitBuilder::new(id, version)
    }

    pub fn is_patch(&self) -> bool {
        self.patch.is_some()
    }

    pub fn is_fragment(&self) -> bool {
        !self.host_requirements.is_empty()
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// Mutable assembly state for one installable unit; call
/// [`InstallableUnitBuilder::build`] to freeze it.
#[derive(Debug, Clone)]
pub struct InstallableUnitBuilder {
    unit: InstallableUnit,
}

impl InstallableUnitBuilder {
    pub fn new(id: impl Into<String>, version: Version) -> Self {
        InstallableUnitBuilder {
            unit: InstallableUnit {
                id: id.into(),
                version,
                singleton: false,
                filter: None,
                properties: BTreeMap::new(),
                provided: Vec::new(),
                requirements: Vec::new(),
                touchpoint_type: None,
                touchpoint_data: TouchpointData::new(),
                artifacts: Vec::new(),
                patch: None,
                host_requirements: Vec::new(),
                update_descriptor: None,
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.unit.id
    }

    pub fn version(&self) -> &Version {
        &self.unit.version
    }

    pub fn singleton(mut self, singleton: bool) -> Self {
        self.unit.singleton = singleton;
        self
    }

    pub fn filter(mut self, filter: Option<Filter>) -> Self {
        self.unit.filter = filter;
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.unit.properties.insert(key.into(), value.into());
    }

    /// Add a capability. A capability already occupying the same
    /// (namespace, name) slot is replaced, keeping the set unique.
    pub fn add_capability(&mut self, capability: ProvidedCapability) {
        if let Some(existing) = self
            .unit
            .provided
            .iter_mut()
            .find(|c| c.same_slot(&capability))
        {
            *existing = capability;
        } else {
            self.unit.provided.push(capability);
        }
    }

    pub fn capability(mut self, capability: ProvidedCapability) -> Self {
        self.add_capability(capability);
        self
    }

    /// Add a requirement unless one for the same slot is already present
    /// (additive with dedup, the advice merge rule).
    pub fn add_requirement(&mut self, requirement: Requirement) {
        if !self.unit.requirements.iter().any(|r| r.same_slot(&requirement)) {
            self.unit.requirements.push(requirement);
        }
    }

    pub fn requirement(mut self, requirement: Requirement) -> Self {
        self.add_requirement(requirement);
        self
    }

    pub fn add_host_requirement(&mut self, requirement: Requirement) {
        self.unit.host_requirements.push(requirement);
    }

    pub fn touchpoint_type(mut self, touchpoint: TouchpointType) -> Self {
        self.unit.touchpoint_type = Some(touchpoint);
        self
    }

    pub fn add_touchpoint_instruction(&mut self, phase: &str, instruction: &str) {
        self.unit.touchpoint_data.add_instruction(phase, instruction);
    }

    pub fn merge_touchpoint_data(&mut self, data: &TouchpointData) {
        self.unit.touchpoint_data.merge(data);
    }

    pub fn add_artifact(&mut self, key: ArtifactKey) {
        if !self.unit.artifacts.contains(&key) {
            self.unit.artifacts.push(key);
        }
    }

    pub fn patch(mut self, patch: PatchInfo) -> Self {
        self.unit.patch = Some(patch);
        self
    }

    pub fn update_descriptor(mut self, descriptor: UpdateDescriptor) -> Self {
        self.set_update_descriptor(descriptor);
        self
    }

    pub fn set_update_descriptor(&mut self, descriptor: UpdateDescriptor) {
        self.unit.update_descriptor = Some(descriptor);
    }

    /// Freeze the unit. The self-capability (id + version in the IU
    /// namespace) is added when absent, upholding the invariant that every
    /// unit provides its own identity.
    pub fn build(mut self) -> InstallableUnit {
        let self_cap =
            ProvidedCapability::self_capability(&self.unit.id, &self.unit.version);
        if !self.unit.provided.iter().any(|c| c.same_slot(&self_cap)) {
            self.unit.provided.insert(0, self_cap);
        }
        self.unit
    }
}
