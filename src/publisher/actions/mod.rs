//! The publisher action set
//!
//! Each action is an independent transformation from filesystem inputs plus
//! advice into installable units in the shared [`PublisherResult`]. Actions
//! report outcomes as [`Status`] values; an error aborts only the action
//! that raised it.

pub mod bundles;
pub mod config_cu;
pub mod features;
pub mod jre;
pub mod product;
pub mod root_files;
pub mod root_iu;

pub use bundles::BundlesAction;
pub use config_cu::ConfigCuAction;
pub use features::FeaturesAction;
pub use jre::JreAction;
pub use product::ProductAction;
pub use root_files::RootFilesAction;
pub use root_iu::RootIuAction;

use std::path::Path;

use crate::advice::file as advice_file;
use crate::ldap::Filter;
use crate::metadata::artifact_key::ArtifactKey;
use crate::metadata::iu::InstallableUnitBuilder;
use crate::model::config_spec::{ANY, ConfigSpec};
use crate::publisher::info::{ArtifactMode, PublisherInfo};
use crate::publisher::result::PublisherResult;
use crate::status::Status;
use crate::ui::Reporter;
use crate::version::Version;

/// One step of the publishing pipeline.
pub trait PublisherAction {
    /// Short name used for progress and status messages.
    fn name(&self) -> &str;

    /// Run the action against the shared state. Must be idempotent with
    /// respect to (id, version) pairs already present in `result`.
    fn perform(
        &self,
        info: &mut PublisherInfo,
        result: &mut PublisherResult,
        reporter: &mut dyn Reporter,
    ) -> Status;
}

/// Fold all applicable unit-level advice into a builder: properties
/// (later registrations win per key), capabilities and requirements
/// (additive with slot dedup), touchpoint instructions (merged by phase),
/// and the update descriptor (last one wins).
pub(crate) fn apply_unit_advice(builder: &mut InstallableUnitBuilder, info: &PublisherInfo) {
    let query = ConfigSpec::any();
    let id = builder.id().to_string();
    let version = builder.version().clone();

    for properties in info.advice().property_advice(&query, true, &id, &version) {
        for (key, value) in properties {
            builder.set_property(key.clone(), value.clone());
        }
    }
    for capabilities in info.advice().capability_advice(&query, true, &id, &version) {
        for capability in capabilities {
            builder.add_capability(capability.clone());
        }
    }
    for requirements in info.advice().requirement_advice(&query, true, &id, &version) {
        for requirement in requirements {
            builder.add_requirement(requirement.clone());
        }
    }
    for data in info.advice().touchpoint_advice(&query, true, &id, &version) {
        builder.merge_touchpoint_data(data);
    }
    if let Some(descriptor) = info
        .advice()
        .update_descriptor_advice(&query, true, &id, &version)
    {
        builder.set_update_descriptor(descriptor.clone());
    }
}

/// Register advice from a `p2.inf` sitting next to an artifact, then
/// publish the extra units it defines. Parse failures degrade to a
/// warning; the artifact itself still publishes.
pub(crate) fn ingest_advice_file(
    info: &mut PublisherInfo,
    result: &mut PublisherResult,
    dir: &Path,
    id: &str,
    version: &Version,
    reporter: &mut dyn Reporter,
) {
    let path = dir.join(advice_file::ADVICE_FILE_NAME);
    if !path.is_file() {
        return;
    }
    match advice_file::load(&path, id, version) {
        Ok(entries) => {
            for (scope, advice) in entries {
                if let crate::advice::Advice::ExtraUnits(units) = &advice {
                    result.add_ius(units.clone(), crate::publisher::result::IuKind::NonRoot);
                }
                info.advice_mut().add(scope, advice);
            }
        }
        Err(e) => reporter.warning(&format!("skipping advice file {}: {e}", path.display())),
    }
}

/// Record an artifact per the run's artifact mode. Index-only runs treat a
/// missing payload as a warning; publishing runs require it.
pub(crate) fn publish_artifact(
    info: &mut PublisherInfo,
    key: &ArtifactKey,
    source: &Path,
    reporter: &mut dyn Reporter,
) -> Status {
    match info.artifact_mode() {
        ArtifactMode::IndexOnly => {
            if source.exists() {
                Status::ok()
            } else {
                let message = format!("Artifact file not found: {}", source.display());
                reporter.warning(&message);
                Status::warning(message)
            }
        }
        ArtifactMode::Publish => {
            if !source.exists() {
                return Status::error(format!("Artifact file not found: {}", source.display()));
            }
            let Some(repository) = info.artifact_repository_mut() else {
                return Status::error(format!(
                    "No artifact repository configured for publishing {key}"
                ));
            };
            match repository.add_artifact(key, source) {
                Ok(()) => Status::ok(),
                Err(e) => Status::error(e.to_string()),
            }
        }
    }
}

/// Platform filter pinning a unit to a concrete config spec. `ANY`
/// segments contribute nothing; a fully wildcarded spec yields no filter.
pub(crate) fn config_spec_filter(config_spec: &ConfigSpec) -> Option<Filter> {
    let mut terms = Vec::new();
    for (key, value) in [
        ("osgi.ws", &config_spec.ws),
        ("osgi.os", &config_spec.os),
        ("osgi.arch", &config_spec.arch),
    ] {
        if value != ANY {
            terms.push(Filter::eq(key, value.clone()));
        }
    }
    Filter::and(terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::{Advice, AdviceScope};
    use crate::metadata::iu::InstallableUnit;
    use crate::ui::SilentReporter;
    use std::collections::BTreeMap;

    #[test]
    fn test_apply_unit_advice_later_property_wins() {
        let mut info = PublisherInfo::new();
        let mut first = BTreeMap::new();
        first.insert("key".to_string(), "first".to_string());
        let mut second = BTreeMap::new();
        second.insert("key".to_string(), "second".to_string());
        info.advice_mut()
            .add(AdviceScope::default_scope(), Advice::Property(first));
        info.advice_mut()
            .add(AdviceScope::default_scope(), Advice::Property(second));

        let mut builder = InstallableUnit::builder("x", Version::new(1, 0, 0));
        apply_unit_advice(&mut builder, &info);
        let unit = builder.build();
        assert_eq!(unit.property("key"), Some("second"));
    }

    #[test]
    fn test_config_spec_filter_skips_any() {
        let spec = ConfigSpec::parse("gtk.linux.ANY").unwrap();
        let filter = config_spec_filter(&spec).unwrap();
        let text = filter.to_string();
        assert!(text.contains("(osgi.ws=gtk)"));
        assert!(text.contains("(osgi.os=linux)"));
        assert!(!text.contains("osgi.arch"));
        assert!(config_spec_filter(&ConfigSpec::any()).is_none());
    }

    #[test]
    fn test_publish_artifact_missing_file_index_only_warns() {
        let mut info = PublisherInfo::new();
        let mut reporter = SilentReporter::new();
        let key = ArtifactKey::bundle("ghost", Version::new(1, 0, 0));
        let status = publish_artifact(
            &mut info,
            &key,
            Path::new("/nonexistent/ghost.jar"),
            &mut reporter,
        );
        assert_eq!(status.severity(), crate::status::Severity::Warning);
        assert_eq!(reporter.warnings.len(), 1);
    }

    #[test]
    fn test_publish_artifact_missing_file_publish_mode_errors() {
        let mut info = PublisherInfo::new().with_artifact_mode(ArtifactMode::Publish);
        let mut reporter = SilentReporter::new();
        let key = ArtifactKey::bundle("ghost", Version::new(1, 0, 0));
        let status = publish_artifact(
            &mut info,
            &key,
            Path::new("/nonexistent/ghost.jar"),
            &mut reporter,
        );
        assert!(status.is_error());
    }
}
