//! Advice kinds and applicability scopes

use std::collections::BTreeMap;

use crate::metadata::capability::ProvidedCapability;
use crate::metadata::iu::{InstallableUnit, UpdateDescriptor};
use crate::metadata::requirement::Requirement;
use crate::metadata::touchpoint_data::TouchpointData;
use crate::model::bundle_info::BundleInfo;
use crate::model::config_spec::ConfigSpec;
use crate::version::{Version, VersionRange};

/// Version filter on an advice scope: exact or a range.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionConstraint {
    Exact(Version),
    Range(VersionRange),
}

impl VersionConstraint {
    fn accepts(&self, version: &Version) -> bool {
        match self {
            VersionConstraint::Exact(exact) => exact == version,
            VersionConstraint::Range(range) => range.includes(version),
        }
    }
}

/// The applicability predicate attached to one piece of advice.
///
/// An unset field matches everything in that dimension, except the config
/// spec: when it is unset, applicability falls back to the caller's
/// `include_default` flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdviceScope {
    pub config_spec: Option<ConfigSpec>,
    pub id: Option<String>,
    pub version: Option<VersionConstraint>,
}

impl AdviceScope {
    /// Advice with no filters at all: applies whenever defaults are wanted.
    pub fn default_scope() -> Self {
        AdviceScope::default()
    }

    pub fn for_id(id: impl Into<String>) -> Self {
        AdviceScope {
            id: Some(id.into()),
            ..AdviceScope::default()
        }
    }

    pub fn for_unit(id: impl Into<String>, version: Version) -> Self {
        AdviceScope {
            id: Some(id.into()),
            version: Some(VersionConstraint::Exact(version)),
            ..AdviceScope::default()
        }
    }

    pub fn for_config(config_spec: ConfigSpec) -> Self {
        AdviceScope {
            config_spec: Some(config_spec),
            ..AdviceScope::default()
        }
    }

    /// The applicability algorithm: id filter, then version filter, then
    /// config-spec filter (falling back to `include_default` when unset).
    pub fn is_applicable(
        &self,
        config_spec: &ConfigSpec,
        include_default: bool,
        id: &str,
        version: &Version,
    ) -> bool {
        if let Some(wanted) = &self.id
            && wanted != id
        {
            return false;
        }
        if let Some(constraint) = &self.version
            && !constraint.accepts(version)
        {
            return false;
        }
        match &self.config_spec {
            None => include_default,
            Some(advice_spec) => advice_spec.matches(config_spec),
        }
    }
}

/// One piece of advice. Closed set, dispatched by match.
#[derive(Debug, Clone, PartialEq)]
pub enum Advice {
    /// Extra touchpoint instructions merged into matching units by phase.
    Touchpoint(TouchpointData),
    /// Extra unit properties; later-registered advice wins per key.
    Property(BTreeMap<String, String>),
    /// Extra provided capabilities, additive with slot dedup.
    Capability(Vec<ProvidedCapability>),
    /// Extra requirements, additive with slot dedup.
    Requirement(Vec<Requirement>),
    /// Version overrides for artifacts whose version is not self-describing.
    Version(BTreeMap<String, Version>),
    /// Per-platform configuration harvested from config/launcher files.
    Config(ConfigAdvice),
    /// Update descriptor override.
    UpdateDescriptor(UpdateDescriptor),
    /// Complete extra units to publish alongside the advised one.
    ExtraUnits(Vec<InstallableUnit>),
}

/// Bundle list, properties and launcher arguments for one platform,
/// consulted when generating configuration units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigAdvice {
    pub config_spec: ConfigSpec,
    pub bundles: Vec<BundleInfo>,
    pub properties: BTreeMap<String, String>,
    pub jvm_args: Vec<String>,
    pub program_args: Vec<String>,
}
