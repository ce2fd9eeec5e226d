//! Artifact keys

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::version::Version;

/// Classifier for plugin artifacts.
pub const CLASSIFIER_OSGI_BUNDLE: &str = "osgi.bundle";

/// Classifier for feature artifacts.
pub const CLASSIFIER_FEATURE: &str = "org.eclipse.update.feature";

/// Classifier for binary (root file) artifacts.
pub const CLASSIFIER_BINARY: &str = "binary";

/// Identity of one artifact: classifier + id + version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactKey {
    pub classifier: String,
    pub id: String,
    pub version: Version,
}

impl ArtifactKey {
    pub fn new(classifier: impl Into<String>, id: impl Into<String>, version: Version) -> Self {
        ArtifactKey {
            classifier: classifier.into(),
            id: id.into(),
            version,
        }
    }

    pub fn bundle(id: impl Into<String>, version: Version) -> Self {
        ArtifactKey::new(CLASSIFIER_OSGI_BUNDLE, id, version)
    }

    pub fn feature(id: impl Into<String>, version: Version) -> Self {
        ArtifactKey::new(CLASSIFIER_FEATURE, id, version)
    }

    pub fn binary(id: impl Into<String>, version: Version) -> Self {
        ArtifactKey::new(CLASSIFIER_BINARY, id, version)
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.classifier, self.id, self.version)
    }
}
