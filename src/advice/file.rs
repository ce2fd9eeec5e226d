//! Advice file (p2.inf) parsing
//!
//! A flat property file with dotted-hierarchical keys placed next to an
//! artifact's metadata:
//!
//! ```text
//! properties.0.name = org.eclipse.equinox.p2.type.group
//! properties.0.value = true
//! requires.0.namespace = org.eclipse.equinox.p2.iu
//! requires.0.name = org.example.other
//! requires.0.range = [1.0.0,2.0.0)
//! provides.0.namespace = java.package
//! provides.0.name = org.example.api
//! provides.0.version = $version$
//! instructions.configure = addProgramArg(programArg:-console);
//! units.0.id = org.example.extra
//! units.0.version = 1.0.0
//! ```
//!
//! Unknown keys are ignored. The token `$version$` in a value is replaced
//! by the advised unit's version.

use std::collections::BTreeMap;
use std::path::Path;

use crate::advice::kinds::{Advice, AdviceScope};
use crate::error::{ProvisorError, Result};
use crate::ldap::Filter;
use crate::metadata::capability::ProvidedCapability;
use crate::metadata::iu::{InstallableUnit, UpdateDescriptor};
use crate::metadata::requirement::Requirement;
use crate::metadata::touchpoint_data::{TouchpointData, TouchpointType};
use crate::version::{Version, VersionRange};

/// The conventional advice file name.
pub const ADVICE_FILE_NAME: &str = "p2.inf";

/// Parse an advice file for the unit identified by (id, version).
/// Everything parsed is scoped to exactly that unit.
pub fn load(path: &Path, id: &str, version: &Version) -> Result<Vec<(AdviceScope, Advice)>> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ProvisorError::read_failed(path, &e))?;
    Ok(parse(&contents, id, version))
}

/// Parse advice file contents. Malformed entries are dropped silently, the
/// same way unknown keys are ignored.
pub fn parse(contents: &str, id: &str, version: &Version) -> Vec<(AdviceScope, Advice)> {
    let properties = read_properties(contents, version);
    let scope = AdviceScope::for_unit(id, version.clone());
    let mut advice = Vec::new();

    let unit_properties = collect_properties(&properties, "properties");
    if !unit_properties.is_empty() {
        advice.push((scope.clone(), Advice::Property(unit_properties)));
    }

    let capabilities = collect_capabilities(&properties, "provides");
    if !capabilities.is_empty() {
        advice.push((scope.clone(), Advice::Capability(capabilities)));
    }

    let requirements = collect_requirements(&properties, "requires");
    if !requirements.is_empty() {
        advice.push((scope.clone(), Advice::Requirement(requirements)));
    }

    let touchpoint = collect_instructions(&properties, "instructions.");
    if !touchpoint.is_empty() {
        advice.push((scope.clone(), Advice::Touchpoint(touchpoint)));
    }

    if let Some(descriptor) = collect_update_descriptor(&properties) {
        advice.push((scope.clone(), Advice::UpdateDescriptor(descriptor)));
    }

    let units = collect_units(&properties);
    if !units.is_empty() {
        advice.push((scope, Advice::ExtraUnits(units)));
    }

    advice
}

fn read_properties(contents: &str, version: &Version) -> BTreeMap<String, String> {
    let version_text = version.to_string();
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            (
                key.trim().to_string(),
                value.trim().replace("$version$", &version_text),
            )
        })
        .collect()
}

/// Group `prefix.N.rest` keys by index N.
fn indexed<'a>(
    properties: &'a BTreeMap<String, String>,
    prefix: &str,
) -> BTreeMap<usize, BTreeMap<&'a str, &'a str>> {
    let mut groups: BTreeMap<usize, BTreeMap<&str, &str>> = BTreeMap::new();
    let lead = format!("{prefix}.");
    for (key, value) in properties {
        let Some(rest) = key.strip_prefix(&lead) else {
            continue;
        };
        let Some((index, field)) = rest.split_once('.') else {
            continue;
        };
        let Ok(index) = index.parse::<usize>() else {
            continue;
        };
        groups.entry(index).or_default().insert(field, value);
    }
    groups
}

fn collect_properties(
    properties: &BTreeMap<String, String>,
    prefix: &str,
) -> BTreeMap<String, String> {
    indexed(properties, prefix)
        .values()
        .filter_map(|group| {
            let name = group.get("name")?;
            let value = group.get("value")?;
            Some(((*name).to_string(), (*value).to_string()))
        })
        .collect()
}

fn collect_capabilities(
    properties: &BTreeMap<String, String>,
    prefix: &str,
) -> Vec<ProvidedCapability> {
    indexed(properties, prefix)
        .values()
        .filter_map(|group| {
            let namespace = group.get("namespace")?;
            let name = group.get("name")?;
            let version = group
                .get("version")
                .and_then(|v| Version::parse(v).ok())
                .unwrap_or_else(Version::zero);
            Some(ProvidedCapability::new(*namespace, *name, version))
        })
        .collect()
}

fn collect_requirements(
    properties: &BTreeMap<String, String>,
    prefix: &str,
) -> Vec<Requirement> {
    indexed(properties, prefix)
        .values()
        .filter_map(|group| {
            let namespace = group.get("namespace")?;
            let name = group.get("name")?;
            let range = group
                .get("range")
                .and_then(|r| VersionRange::parse(r).ok())
                .unwrap_or_else(VersionRange::any);
            let filter = group.get("filter").and_then(|f| Filter::parse(f).ok());
            let optional = group.get("optional").is_some_and(|v| *v == "true");
            let greedy = group.get("greedy").is_none_or(|v| *v == "true");
            Some(
                Requirement::new(*namespace, *name, range)
                    .with_filter(filter)
                    .with_optional(optional)
                    .with_greedy(greedy),
            )
        })
        .collect()
}

fn collect_instructions(properties: &BTreeMap<String, String>, lead: &str) -> TouchpointData {
    let mut data = TouchpointData::new();
    for (key, value) in properties {
        let Some(phase) = key.strip_prefix(lead) else {
            continue;
        };
        // instructions.<phase>.import lines name action providers, which a
        // closed action registry does not need.
        if phase.contains('.') {
            continue;
        }
        data.add_instruction(phase, value);
    }
    data
}

fn collect_update_descriptor(properties: &BTreeMap<String, String>) -> Option<UpdateDescriptor> {
    let id = properties.get("update.id")?;
    let range = properties
        .get("update.range")
        .and_then(|r| VersionRange::parse(r).ok())
        .unwrap_or_else(VersionRange::any);
    Some(UpdateDescriptor {
        id: id.clone(),
        range,
    })
}

fn collect_units(properties: &BTreeMap<String, String>) -> Vec<InstallableUnit> {
    indexed(properties, "units")
        .values()
        .filter_map(|group| {
            // Re-assemble the sub-properties so the same collectors work on
            // the nested unit definition.
            let nested: BTreeMap<String, String> = group
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect();

            let id = nested.get("id")?;
            let version = nested
                .get("version")
                .and_then(|v| Version::parse(v).ok())
                .unwrap_or_else(Version::zero);

            let mut builder = InstallableUnit::builder(id.clone(), version);
            if nested.get("singleton").is_some_and(|v| v == "true") {
                builder = builder.singleton(true);
            }
            if let Some(touchpoint_id) = nested.get("touchpoint.id") {
                let touchpoint_version = nested
                    .get("touchpoint.version")
                    .and_then(|v| Version::parse(v).ok())
                    .unwrap_or_else(|| Version::new(1, 0, 0));
                builder = builder.touchpoint_type(TouchpointType {
                    id: touchpoint_id.clone(),
                    version: touchpoint_version,
                });
            }
            for (name, value) in collect_properties(&nested, "properties") {
                builder.set_property(name, value);
            }
            for capability in collect_capabilities(&nested, "provides") {
                builder.add_capability(capability);
            }
            for requirement in collect_requirements(&nested, "requires") {
                builder.add_requirement(requirement);
            }
            builder.merge_touchpoint_data(&collect_instructions(&nested, "instructions."));
            Some(builder.build())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::capability::namespaces;

    fn advised(contents: &str) -> Vec<(AdviceScope, Advice)> {
        parse(contents, "org.example.core", &Version::new(1, 2, 3))
    }

    #[test]
    fn test_empty_file_yields_no_advice() {
        assert!(advised("# nothing here\n").is_empty());
    }

    #[test]
    fn test_properties_advice() {
        let advice = advised(
            "properties.0.name=org.eclipse.equinox.p2.type.group\nproperties.0.value=true\n",
        );
        assert_eq!(advice.len(), 1);
        match &advice[0].1 {
            Advice::Property(props) => {
                assert_eq!(
                    props.get("org.eclipse.equinox.p2.type.group").map(String::as_str),
                    Some("true")
                );
            }
            other => panic!("expected property advice, got {other:?}"),
        }
    }

    #[test]
    fn test_version_token_substitution() {
        let advice = advised(
            "provides.0.namespace=java.package\nprovides.0.name=org.example.api\nprovides.0.version=$version$\n",
        );
        match &advice[0].1 {
            Advice::Capability(caps) => {
                assert_eq!(caps[0].version, Version::new(1, 2, 3));
            }
            other => panic!("expected capability advice, got {other:?}"),
        }
    }

    #[test]
    fn test_requires_with_range_and_filter() {
        let advice = advised(
            "requires.0.namespace=org.eclipse.equinox.p2.iu\nrequires.0.name=org.example.other\nrequires.0.range=[1.0.0,2.0.0)\nrequires.0.filter=(osgi.os=linux)\nrequires.0.optional=true\n",
        );
        match &advice[0].1 {
            Advice::Requirement(reqs) => {
                assert_eq!(reqs.len(), 1);
                assert_eq!(reqs[0].name, "org.example.other");
                assert_eq!(reqs[0].range.to_string(), "[1.0.0,2.0.0)");
                assert!(reqs[0].optional);
                assert!(reqs[0].filter.is_some());
            }
            other => panic!("expected requirement advice, got {other:?}"),
        }
    }

    #[test]
    fn test_instructions_by_phase() {
        let advice = advised(
            "instructions.configure=addProgramArg(programArg:-console);\ninstructions.configure.import=some.action.provider\n",
        );
        assert_eq!(advice.len(), 1);
        match &advice[0].1 {
            Advice::Touchpoint(data) => {
                assert_eq!(
                    data.instruction("configure"),
                    Some("addProgramArg(programArg:-console)")
                );
            }
            other => panic!("expected touchpoint advice, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_units() {
        let advice = advised(
            "units.0.id=org.example.extra\nunits.0.version=2.0.0\nunits.0.provides.0.namespace=org.eclipse.equinox.p2.iu\nunits.0.provides.0.name=org.example.extra\nunits.0.provides.0.version=2.0.0\nunits.0.instructions.install=mkdir(path:x);\n",
        );
        match &advice[0].1 {
            Advice::ExtraUnits(units) => {
                assert_eq!(units.len(), 1);
                assert_eq!(units[0].id, "org.example.extra");
                assert_eq!(units[0].version, Version::new(2, 0, 0));
                assert!(units[0].touchpoint_data.instruction("install").is_some());
                assert!(
                    units[0]
                        .provided
                        .iter()
                        .any(|c| c.namespace == namespaces::IU)
                );
            }
            other => panic!("expected extra units, got {other:?}"),
        }
    }

    #[test]
    fn test_update_descriptor() {
        let advice = advised("update.id=org.example.core\nupdate.range=[0.0.0,1.2.3)\n");
        match &advice[0].1 {
            Advice::UpdateDescriptor(descriptor) => {
                assert_eq!(descriptor.id, "org.example.core");
                assert_eq!(descriptor.range.to_string(), "[0.0.0,1.2.3)");
            }
            other => panic!("expected update descriptor advice, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let advice = advised("some.unknown.key=value\nanother=thing\n");
        assert!(advice.is_empty());
    }

    #[test]
    fn test_all_advice_scoped_to_unit() {
        let advice = advised("properties.0.name=a\nproperties.0.value=b\n");
        let scope = &advice[0].0;
        assert_eq!(scope.id.as_deref(), Some("org.example.core"));
    }
}
