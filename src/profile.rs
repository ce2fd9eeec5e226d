//! Provisioning profiles
//!
//! A profile names the installation being provisioned and maps artifact
//! keys to their on-disk payloads, which is what `@artifact` parameter
//! resolution consults during touchpoint execution.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::metadata::artifact_key::ArtifactKey;
use crate::repository::ArtifactRepository;

/// Profile property naming the installation root.
pub const PROP_INSTALL_FOLDER: &str = "org.eclipse.equinox.p2.installFolder";

#[derive(Debug, Clone, Default)]
pub struct Profile {
    pub id: String,
    properties: BTreeMap<String, String>,
    artifacts: HashMap<ArtifactKey, PathBuf>,
}

impl Profile {
    pub fn new(id: impl Into<String>) -> Self {
        Profile {
            id: id.into(),
            ..Profile::default()
        }
    }

    /// A profile rooted at an installation folder.
    pub fn for_installation(id: impl Into<String>, install_folder: &Path) -> Self {
        let mut profile = Profile::new(id);
        profile.set_property(PROP_INSTALL_FOLDER, install_folder.display().to_string());
        profile
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn install_folder(&self) -> Option<&Path> {
        self.property(PROP_INSTALL_FOLDER).map(Path::new)
    }

    pub fn register_artifact(&mut self, key: ArtifactKey, location: impl Into<PathBuf>) {
        self.artifacts.insert(key, location.into());
    }

    /// Register every artifact of a repository, keyed for `@artifact`
    /// resolution.
    pub fn register_repository(&mut self, repository: &ArtifactRepository) {
        for key in repository_keys(repository) {
            if let Some(path) = repository.artifact_path(&key) {
                self.artifacts.insert(key, path);
            }
        }
    }

    pub fn artifact_location(&self, key: &ArtifactKey) -> Option<&Path> {
        self.artifacts.get(key).map(PathBuf::as_path)
    }
}

fn repository_keys(repository: &ArtifactRepository) -> Vec<ArtifactKey> {
    repository.entries().iter().map(|e| e.key.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Version;

    #[test]
    fn test_install_folder_property() {
        let profile = Profile::for_installation("default", Path::new("/opt/app"));
        assert_eq!(profile.install_folder(), Some(Path::new("/opt/app")));
    }

    #[test]
    fn test_artifact_lookup() {
        let mut profile = Profile::new("default");
        let key = ArtifactKey::bundle("org.example.core", Version::new(1, 0, 0));
        profile.register_artifact(key.clone(), "/repo/plugins/core.jar");
        assert_eq!(
            profile.artifact_location(&key),
            Some(Path::new("/repo/plugins/core.jar"))
        );
        let other = ArtifactKey::bundle("org.example.ui", Version::new(1, 0, 0));
        assert!(profile.artifact_location(&other).is_none());
    }
}
