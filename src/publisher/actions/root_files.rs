//! Publishing action for root files
//!
//! Root files are the non-bundle payload of a product (launchers, license
//! text, configuration templates) that land directly in the installation
//! folder. They publish as one binary artifact per platform with a unit
//! scoped to that platform's filter. Exclusion globs keep build droppings
//! out of the payload.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use crate::metadata::artifact_key::ArtifactKey;
use crate::metadata::iu::InstallableUnit;
use crate::metadata::touchpoint_data::TouchpointType;
use crate::publisher::actions::{PublisherAction, apply_unit_advice, config_spec_filter, publish_artifact};
use crate::publisher::info::{ArtifactMode, PublisherInfo};
use crate::publisher::result::{IuKind, PublisherResult};
use crate::model::config_spec::ConfigSpec;
use crate::status::Status;
use crate::ui::Reporter;
use crate::version::Version;

pub struct RootFilesAction {
    id_base: String,
    version: Version,
    location: PathBuf,
    config_spec: ConfigSpec,
    exclusions: Vec<String>,
}

impl RootFilesAction {
    pub fn new(
        id_base: impl Into<String>,
        version: Version,
        location: impl Into<PathBuf>,
        config_spec: ConfigSpec,
    ) -> Self {
        RootFilesAction {
            id_base: id_base.into(),
            version,
            location: location.into(),
            config_spec,
            exclusions: Vec::new(),
        }
    }

    /// Glob patterns (relative to the root files directory) to leave out.
    pub fn with_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclusions = exclusions;
        self
    }

    fn unit_id(&self) -> String {
        if self.config_spec == ConfigSpec::any() {
            format!("{}_root", self.id_base)
        } else {
            format!("{}_root.{}", self.id_base, self.config_spec)
        }
    }

    /// Files under the location that survive the exclusion globs, as
    /// paths relative to it.
    fn included_files(&self) -> Result<Vec<PathBuf>, Status> {
        let mut globs = Vec::new();
        for pattern in &self.exclusions {
            match Glob::new(pattern) {
                Ok(glob) => globs.push(glob.into_owned()),
                Err(e) => {
                    return Err(Status::error(format!(
                        "bad exclusion pattern '{pattern}': {e}"
                    )));
                }
            }
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.location)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let relative = entry
                .path()
                .strip_prefix(&self.location)
                .unwrap_or_else(|_| entry.path())
                .to_path_buf();
            let text = relative.to_string_lossy().replace('\\', "/");
            let candidate = CandidatePath::from(text.as_str());
            if globs.iter().any(|g| g.matched(&candidate).is_some()) {
                continue;
            }
            files.push(relative);
        }
        files.sort();
        Ok(files)
    }
}

impl PublisherAction for RootFilesAction {
    fn name(&self) -> &str {
        "root-files"
    }

    fn perform(
        &self,
        info: &mut PublisherInfo,
        result: &mut PublisherResult,
        reporter: &mut dyn Reporter,
    ) -> Status {
        let unit_id = self.unit_id();
        if result.contains(&unit_id, &self.version) {
            return Status::ok();
        }

        if !self.location.is_dir() {
            let message = format!("Root files location not found: {}", self.location.display());
            return match info.artifact_mode() {
                ArtifactMode::IndexOnly => {
                    reporter.warning(&message);
                    Status::warning(message)
                }
                ArtifactMode::Publish => Status::error(message),
            };
        }

        let files = match self.included_files() {
            Ok(files) => files,
            Err(status) => return status,
        };
        if files.is_empty() {
            reporter.info(&format!("no root files under {}", self.location.display()));
            return Status::ok();
        }

        let key = ArtifactKey::binary(&unit_id, self.version.clone());
        let artifact_status = match info.artifact_mode() {
            ArtifactMode::IndexOnly => publish_artifact(info, &key, &self.location, reporter),
            ArtifactMode::Publish => {
                // Stage the surviving files so exclusions never reach the
                // artifact repository.
                match stage_files(&self.location, &files) {
                    Ok(staging) => publish_artifact(info, &key, staging.path(), reporter),
                    Err(e) => return Status::error(e.to_string()),
                }
            }
        };
        if artifact_status.is_error() {
            return artifact_status;
        }

        let mut builder = InstallableUnit::builder(&unit_id, self.version.clone())
            .touchpoint_type(TouchpointType::native())
            .filter(config_spec_filter(&self.config_spec));
        builder.add_artifact(key);
        apply_unit_advice(&mut builder, info);

        result.add_iu(builder.build(), IuKind::Root);
        artifact_status
    }
}

fn stage_files(root: &Path, files: &[PathBuf]) -> std::io::Result<tempfile::TempDir> {
    let staging = tempfile::tempdir()?;
    for relative in files {
        let target = staging.path().join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(root.join(relative), target)?;
    }
    Ok(staging)
}
