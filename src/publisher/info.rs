//! Immutable-per-run configuration shared by publisher actions

use crate::advice::AdviceRegistry;
use crate::model::config_spec::ConfigSpec;
use crate::repository::{ArtifactRepository, MetadataRepository};

/// How artifact payloads are handled during publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtifactMode {
    /// Metadata only: a missing artifact file is a warning, nothing is
    /// copied into the artifact repository.
    #[default]
    IndexOnly,
    /// Copy payloads into the artifact repository; a missing file is an
    /// error.
    Publish,
}

/// Everything a publishing run shares across its actions: the advice
/// registry, the target platform list, artifact handling, and the
/// repositories the run commits into.
pub struct PublisherInfo {
    advice: AdviceRegistry,
    config_specs: Vec<ConfigSpec>,
    artifact_mode: ArtifactMode,
    metadata_repository: Option<MetadataRepository>,
    artifact_repository: Option<ArtifactRepository>,
}

impl PublisherInfo {
    pub fn new() -> Self {
        PublisherInfo {
            advice: AdviceRegistry::new(),
            config_specs: vec![ConfigSpec::any()],
            artifact_mode: ArtifactMode::IndexOnly,
            metadata_repository: None,
            artifact_repository: None,
        }
    }

    pub fn with_config_specs(mut self, config_specs: Vec<ConfigSpec>) -> Self {
        if !config_specs.is_empty() {
            self.config_specs = config_specs;
        }
        self
    }

    pub fn with_artifact_mode(mut self, mode: ArtifactMode) -> Self {
        self.artifact_mode = mode;
        self
    }

    pub fn with_metadata_repository(mut self, repository: MetadataRepository) -> Self {
        self.metadata_repository = Some(repository);
        self
    }

    pub fn with_artifact_repository(mut self, repository: ArtifactRepository) -> Self {
        self.artifact_repository = Some(repository);
        self
    }

    pub fn advice(&self) -> &AdviceRegistry {
        &self.advice
    }

    pub fn advice_mut(&mut self) -> &mut AdviceRegistry {
        &mut self.advice
    }

    pub fn config_specs(&self) -> &[ConfigSpec] {
        &self.config_specs
    }

    pub fn artifact_mode(&self) -> ArtifactMode {
        self.artifact_mode
    }

    pub fn metadata_repository(&self) -> Option<&MetadataRepository> {
        self.metadata_repository.as_ref()
    }

    pub fn metadata_repository_mut(&mut self) -> Option<&mut MetadataRepository> {
        self.metadata_repository.as_mut()
    }

    pub fn artifact_repository(&self) -> Option<&ArtifactRepository> {
        self.artifact_repository.as_ref()
    }

    pub fn artifact_repository_mut(&mut self) -> Option<&mut ArtifactRepository> {
        self.artifact_repository.as_mut()
    }
}

impl Default for PublisherInfo {
    fn default() -> Self {
        PublisherInfo::new()
    }
}
