//! Publishing action for OSGi bundles
//!
//! Scans bundle locations (exploded directories with a
//! `META-INF/MANIFEST.MF`), turns each manifest into an installable unit
//! with the OSGi touchpoint, ingests any `p2.inf` advice next to the
//! manifest, and records the bundle artifact.

use std::path::{Path, PathBuf};

use crate::manifest::BundleManifest;
use crate::metadata::artifact_key::ArtifactKey;
use crate::metadata::capability::{ProvidedCapability, namespaces};
use crate::metadata::iu::InstallableUnit;
use crate::metadata::requirement::Requirement;
use crate::metadata::touchpoint_data::TouchpointType;
use crate::metadata::props;
use crate::publisher::actions::{PublisherAction, apply_unit_advice, ingest_advice_file, publish_artifact};
use crate::publisher::info::PublisherInfo;
use crate::publisher::result::{IuKind, PublisherResult};
use crate::status::{MultiStatus, Status};
use crate::ui::Reporter;

pub struct BundlesAction {
    locations: Vec<PathBuf>,
}

impl BundlesAction {
    /// `locations` are bundle directories or directories of bundle
    /// directories (a `plugins/` folder).
    pub fn new(locations: Vec<PathBuf>) -> Self {
        BundlesAction { locations }
    }

    fn bundle_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        for location in &self.locations {
            if is_bundle_dir(location) {
                dirs.push(location.clone());
                continue;
            }
            let Ok(entries) = std::fs::read_dir(location) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if is_bundle_dir(&path) {
                    dirs.push(path);
                }
            }
        }
        dirs.sort();
        dirs
    }

    fn publish_bundle(
        &self,
        dir: &Path,
        info: &mut PublisherInfo,
        result: &mut PublisherResult,
        reporter: &mut dyn Reporter,
    ) -> Status {
        let manifest = match BundleManifest::load(dir) {
            Ok(manifest) => manifest,
            Err(e) => return Status::error(e.to_string()),
        };

        // Advice may override the version before the unit id is fixed.
        let version = info
            .advice()
            .version_advice(&manifest.symbolic_name)
            .cloned()
            .unwrap_or_else(|| manifest.version.clone());

        if result.contains(&manifest.symbolic_name, &version) {
            reporter.info(&format!(
                "bundle {} {version} already published",
                manifest.symbolic_name
            ));
            return Status::ok();
        }

        ingest_advice_file(info, result, dir, &manifest.symbolic_name, &version, reporter);

        let key = ArtifactKey::bundle(&manifest.symbolic_name, version.clone());
        let artifact_status = publish_artifact(info, &key, dir, reporter);
        if artifact_status.is_error() {
            return artifact_status;
        }

        let mut builder = InstallableUnit::builder(&manifest.symbolic_name, version.clone())
            .singleton(true)
            .touchpoint_type(TouchpointType::osgi());
        builder.add_capability(ProvidedCapability::new(
            namespaces::OSGI_BUNDLE,
            &manifest.symbolic_name,
            version.clone(),
        ));
        if let Some(host) = &manifest.fragment_host {
            builder.add_capability(ProvidedCapability::new(
                namespaces::OSGI_FRAGMENT,
                &host.name,
                version.clone(),
            ));
            builder.add_host_requirement(Requirement::new(
                namespaces::OSGI_BUNDLE,
                &host.name,
                host.range.clone(),
            ));
            builder.set_property(props::TYPE_FRAGMENT, "true");
        }
        builder.add_artifact(key);
        apply_unit_advice(&mut builder, info);

        result.add_iu(builder.build(), IuKind::NonRoot);
        artifact_status
    }
}

impl PublisherAction for BundlesAction {
    fn name(&self) -> &str {
        "bundles"
    }

    fn perform(
        &self,
        info: &mut PublisherInfo,
        result: &mut PublisherResult,
        reporter: &mut dyn Reporter,
    ) -> Status {
        let dirs = self.bundle_dirs();
        if dirs.is_empty() {
            reporter.info("no bundles found");
            return Status::ok();
        }

        let mut multi = MultiStatus::new("publishing bundles");
        for dir in dirs {
            multi.add(self.publish_bundle(&dir, info, result, reporter));
        }
        multi.into_status()
    }
}

fn is_bundle_dir(path: &Path) -> bool {
    path.join("META-INF").join("MANIFEST.MF").is_file()
}
