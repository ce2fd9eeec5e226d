//! Publishing action for features
//!
//! Each feature directory (holding a `feature.json`) becomes a group unit
//! whose requirements are translated from the feature's entries. Patch
//! features become installable-unit patches instead: requires entries form
//! the applicability scope and plugin entries become requirement changes.

use std::path::{Path, PathBuf};

use crate::descriptor::feature::{EntryKind, FEATURE_DESCRIPTOR_NAME, Feature, FeatureEntry};
use crate::metadata::artifact_key::ArtifactKey;
use crate::metadata::capability::{ProvidedCapability, namespaces};
use crate::metadata::iu::{InstallableUnit, PatchInfo};
use crate::metadata::props;
use crate::metadata::requirement::{Requirement, RequirementChange};
use crate::metadata::touchpoint_data::TouchpointType;
use crate::publisher::actions::{PublisherAction, apply_unit_advice, ingest_advice_file, publish_artifact};
use crate::publisher::info::PublisherInfo;
use crate::publisher::result::{IuKind, PublisherResult};
use crate::status::{MultiStatus, Status};
use crate::ui::Reporter;
use crate::version::VersionRange;

pub struct FeaturesAction {
    locations: Vec<PathBuf>,
}

impl FeaturesAction {
    /// `locations` are feature directories or directories of feature
    /// directories (a `features/` folder).
    pub fn new(locations: Vec<PathBuf>) -> Self {
        FeaturesAction { locations }
    }

    fn feature_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        for location in &self.locations {
            if is_feature_dir(location) {
                dirs.push(location.clone());
                continue;
            }
            let Ok(entries) = std::fs::read_dir(location) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if is_feature_dir(&path) {
                    dirs.push(path);
                }
            }
        }
        dirs.sort();
        dirs
    }

    fn publish_feature(
        &self,
        dir: &Path,
        info: &mut PublisherInfo,
        result: &mut PublisherResult,
        reporter: &mut dyn Reporter,
    ) -> Status {
        let feature = match Feature::load(&dir.join(FEATURE_DESCRIPTOR_NAME)) {
            Ok(feature) => feature,
            // A broken descriptor aborts this feature only.
            Err(e) => return Status::error(e.to_string()),
        };

        let group_id = feature.group_id();
        if result.contains(&group_id, &feature.version) {
            reporter.info(&format!("feature {group_id} {} already published", feature.version));
            return Status::ok();
        }

        ingest_advice_file(info, result, dir, &group_id, &feature.version, reporter);

        let key = ArtifactKey::feature(&feature.id, feature.version.clone());
        let artifact_status = publish_artifact(info, &key, dir, reporter);
        if artifact_status.is_error() {
            return artifact_status;
        }

        let mut builder = InstallableUnit::builder(&group_id, feature.version.clone())
            .singleton(true)
            .touchpoint_type(TouchpointType::osgi())
            .property(props::TYPE_GROUP, "true");
        if let Some(label) = &feature.label {
            builder.set_property(props::NAME, label.clone());
        }
        if let Some(provider) = &feature.provider {
            builder.set_property(props::PROVIDER, provider.clone());
        }
        if let Some(description) = &feature.description {
            builder.set_property(props::DESCRIPTION, description.clone());
        }
        builder.add_capability(ProvidedCapability::new(
            namespaces::FEATURE,
            &feature.id,
            feature.version.clone(),
        ));
        builder.add_artifact(key);

        if feature.is_patch() {
            builder.set_property(props::TYPE_PATCH, "true");
            builder = builder.patch(patch_info(&feature));
        } else {
            for entry in feature.content_entries() {
                builder.add_requirement(entry_requirement(entry));
            }
            for entry in feature.requires_entries() {
                builder.add_requirement(entry_requirement(entry));
            }
        }

        apply_unit_advice(&mut builder, info);
        result.add_iu(builder.build(), IuKind::Root);
        artifact_status
    }
}

impl PublisherAction for FeaturesAction {
    fn name(&self) -> &str {
        "features"
    }

    fn perform(
        &self,
        info: &mut PublisherInfo,
        result: &mut PublisherResult,
        reporter: &mut dyn Reporter,
    ) -> Status {
        let dirs = self.feature_dirs();
        if dirs.is_empty() {
            reporter.info("no features found");
            return Status::ok();
        }

        let mut multi = MultiStatus::new("publishing features");
        for dir in dirs {
            multi.add(self.publish_feature(&dir, info, result, reporter));
        }
        multi.into_status()
    }
}

/// Translate one feature entry into a requirement: the match rule fixes
/// the version range and the selectors compile into a platform filter.
fn entry_requirement(entry: &FeatureEntry) -> Requirement {
    Requirement::on_iu(entry.target_iu_id(), entry.version_range())
        .with_filter(entry.filter())
        .with_optional(entry.optional)
}

/// Patch translation: requires entries become the applicability scope
/// (the first seeds the lifecycle requirement), plugin entries become
/// requirement changes on the patched unit.
fn patch_info(feature: &Feature) -> PatchInfo {
    let scope: Vec<Requirement> = feature
        .requires_entries()
        .map(entry_requirement)
        .collect();
    let lifecycle = scope.first().cloned();

    let requirement_changes: Vec<RequirementChange> = feature
        .content_entries()
        .filter(|e| e.kind == EntryKind::Plugin)
        .map(|entry| RequirementChange {
            applies_to: Requirement::on_iu(entry.target_iu_id(), VersionRange::any()),
            new_requirement: entry_requirement(entry),
        })
        .collect();

    PatchInfo {
        applicability_scope: scope,
        requirement_changes,
        lifecycle,
    }
}

fn is_feature_dir(path: &Path) -> bool {
    path.join(FEATURE_DESCRIPTOR_NAME).is_file()
}
