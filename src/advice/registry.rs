//! The ordered advice collection

use crate::advice::kinds::{Advice, AdviceScope, ConfigAdvice};
use crate::metadata::capability::ProvidedCapability;
use crate::metadata::iu::InstallableUnit;
use crate::metadata::requirement::Requirement;
use crate::metadata::touchpoint_data::TouchpointData;
use crate::model::config_spec::ConfigSpec;
use crate::version::Version;

/// One registered piece of advice with its applicability scope.
#[derive(Debug, Clone)]
pub struct ScopedAdvice {
    pub scope: AdviceScope,
    pub advice: Advice,
}

/// Insertion-ordered advice collection for one publishing run.
///
/// Queries return the applicable subsequence in registration order; when
/// nothing applies the result is empty, never an error. Callers must
/// tolerate zero advice of any kind.
#[derive(Debug, Clone, Default)]
pub struct AdviceRegistry {
    entries: Vec<ScopedAdvice>,
}

impl AdviceRegistry {
    pub fn new() -> Self {
        AdviceRegistry::default()
    }

    pub fn add(&mut self, scope: AdviceScope, advice: Advice) {
        self.entries.push(ScopedAdvice { scope, advice });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All applicable advice for the query, in registration order.
    pub fn applicable(
        &self,
        config_spec: &ConfigSpec,
        include_default: bool,
        id: &str,
        version: &Version,
    ) -> impl DoubleEndedIterator<Item = &Advice> {
        self.entries
            .iter()
            .filter(move |entry| {
                entry
                    .scope
                    .is_applicable(config_spec, include_default, id, version)
            })
            .map(|entry| &entry.advice)
    }

    pub fn touchpoint_advice(
        &self,
        config_spec: &ConfigSpec,
        include_default: bool,
        id: &str,
        version: &Version,
    ) -> Vec<&TouchpointData> {
        self.applicable(config_spec, include_default, id, version)
            .filter_map(|advice| match advice {
                Advice::Touchpoint(data) => Some(data),
                _ => None,
            })
            .collect()
    }

    pub fn property_advice(
        &self,
        config_spec: &ConfigSpec,
        include_default: bool,
        id: &str,
        version: &Version,
    ) -> Vec<&std::collections::BTreeMap<String, String>> {
        self.applicable(config_spec, include_default, id, version)
            .filter_map(|advice| match advice {
                Advice::Property(properties) => Some(properties),
                _ => None,
            })
            .collect()
    }

    pub fn capability_advice(
        &self,
        config_spec: &ConfigSpec,
        include_default: bool,
        id: &str,
        version: &Version,
    ) -> Vec<&Vec<ProvidedCapability>> {
        self.applicable(config_spec, include_default, id, version)
            .filter_map(|advice| match advice {
                Advice::Capability(capabilities) => Some(capabilities),
                _ => None,
            })
            .collect()
    }

    pub fn requirement_advice(
        &self,
        config_spec: &ConfigSpec,
        include_default: bool,
        id: &str,
        version: &Version,
    ) -> Vec<&Vec<Requirement>> {
        self.applicable(config_spec, include_default, id, version)
            .filter_map(|advice| match advice {
                Advice::Requirement(requirements) => Some(requirements),
                _ => None,
            })
            .collect()
    }

    /// Update descriptor override; the last applicable registration wins.
    pub fn update_descriptor_advice(
        &self,
        config_spec: &ConfigSpec,
        include_default: bool,
        id: &str,
        version: &Version,
    ) -> Option<&crate::metadata::iu::UpdateDescriptor> {
        self.applicable(config_spec, include_default, id, version)
            .filter_map(|advice| match advice {
                Advice::UpdateDescriptor(descriptor) => Some(descriptor),
                _ => None,
            })
            .next_back()
    }

    /// Version override for an artifact id, if any advice carries one.
    /// Registration order means the last registered override wins.
    pub fn version_advice(&self, id: &str) -> Option<&Version> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.advice {
                Advice::Version(versions) => versions.get(id),
                _ => None,
            })
            .next_back()
    }

    /// All config advice for a platform, in registration order.
    pub fn config_advice(&self, config_spec: &ConfigSpec) -> Vec<&ConfigAdvice> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.advice {
                Advice::Config(config) if config.config_spec.matches(config_spec) => Some(config),
                _ => None,
            })
            .collect()
    }

    pub fn extra_units(
        &self,
        config_spec: &ConfigSpec,
        include_default: bool,
        id: &str,
        version: &Version,
    ) -> Vec<&InstallableUnit> {
        self.applicable(config_spec, include_default, id, version)
            .filter_map(|advice| match advice {
                Advice::ExtraUnits(units) => Some(units.iter()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn spec(s: &str) -> ConfigSpec {
        ConfigSpec::parse(s).unwrap()
    }

    fn props(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_empty_registry_yields_empty() {
        let registry = AdviceRegistry::new();
        let found = registry.property_advice(&spec("gtk.linux.x86_64"), true, "x", &Version::zero());
        assert!(found.is_empty());
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut registry = AdviceRegistry::new();
        registry.add(
            AdviceScope::default_scope(),
            Advice::Property(props(&[("first", "1")])),
        );
        registry.add(
            AdviceScope::default_scope(),
            Advice::Property(props(&[("second", "2")])),
        );

        let found = registry.property_advice(&spec("gtk.linux.x86_64"), true, "x", &Version::zero());
        assert_eq!(found.len(), 2);
        assert!(found[0].contains_key("first"));
        assert!(found[1].contains_key("second"));
    }

    #[test]
    fn test_kind_filtering() {
        let mut registry = AdviceRegistry::new();
        registry.add(
            AdviceScope::default_scope(),
            Advice::Property(props(&[("k", "v")])),
        );
        registry.add(
            AdviceScope::default_scope(),
            Advice::Requirement(vec![]),
        );

        let query = spec("gtk.linux.x86_64");
        assert_eq!(
            registry.property_advice(&query, true, "x", &Version::zero()).len(),
            1
        );
        assert_eq!(
            registry.requirement_advice(&query, true, "x", &Version::zero()).len(),
            1
        );
        assert!(registry.touchpoint_advice(&query, true, "x", &Version::zero()).is_empty());
    }

    #[test]
    fn test_scoped_advice_filtered_by_unit() {
        let mut registry = AdviceRegistry::new();
        registry.add(
            AdviceScope::for_id("org.example.core"),
            Advice::Property(props(&[("scoped", "yes")])),
        );

        let query = spec("gtk.linux.x86_64");
        assert_eq!(
            registry
                .property_advice(&query, true, "org.example.core", &Version::zero())
                .len(),
            1
        );
        assert!(
            registry
                .property_advice(&query, true, "org.example.other", &Version::zero())
                .is_empty()
        );
    }

    #[test]
    fn test_last_version_advice_wins() {
        let mut registry = AdviceRegistry::new();
        let mut first = BTreeMap::new();
        first.insert("x".to_string(), Version::new(1, 0, 0));
        let mut second = BTreeMap::new();
        second.insert("x".to_string(), Version::new(2, 0, 0));
        registry.add(AdviceScope::default_scope(), Advice::Version(first));
        registry.add(AdviceScope::default_scope(), Advice::Version(second));

        assert_eq!(registry.version_advice("x"), Some(&Version::new(2, 0, 0)));
        assert_eq!(registry.version_advice("y"), None);
    }

    #[test]
    fn test_config_advice_matched_by_platform() {
        let mut registry = AdviceRegistry::new();
        let config = ConfigAdvice {
            config_spec: spec("gtk.linux.ANY"),
            ..ConfigAdvice::default()
        };
        registry.add(AdviceScope::default_scope(), Advice::Config(config));

        assert_eq!(registry.config_advice(&spec("gtk.linux.x86_64")).len(), 1);
        assert!(registry.config_advice(&spec("win32.win32.x86")).is_empty());
    }
}
