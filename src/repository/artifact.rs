//! Artifact repository: published artifact bytes behind a JSON index
//!
//! Artifacts land under `<repo>/<classifier>/<id>_<version>[.jar]` with a
//! BLAKE3 checksum recorded in the index. Exploded bundle directories are
//! copied file by file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{ProvisorError, Result};
use crate::hash;
use crate::metadata::artifact_key::ArtifactKey;

/// Index file name inside an artifact repository directory.
pub const ARTIFACT_INDEX_NAME: &str = "artifacts.json";

/// One published artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub key: ArtifactKey,
    /// Location relative to the repository root.
    pub location: String,
    pub hash: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ArtifactIndex {
    name: String,
    entries: Vec<ArtifactEntry>,
}

/// A directory of artifact payloads plus their checksums.
#[derive(Debug)]
pub struct ArtifactRepository {
    path: PathBuf,
    name: String,
    entries: Vec<ArtifactEntry>,
    dirty: bool,
}

impl ArtifactRepository {
    pub fn create(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        ArtifactRepository {
            path: path.into(),
            name: name.into(),
            entries: Vec::new(),
            dirty: true,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let index_path = path.join(ARTIFACT_INDEX_NAME);
        if !index_path.is_file() {
            return Err(ProvisorError::RepositoryNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(&index_path)
            .map_err(|e| ProvisorError::read_failed(&index_path, &e))?;
        let index: ArtifactIndex =
            serde_json::from_str(&contents).map_err(|e| ProvisorError::RepositoryIndexInvalid {
                path: index_path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(ArtifactRepository {
            path: path.to_path_buf(),
            name: index.name,
            entries: index.entries,
            dirty: false,
        })
    }

    pub fn load_or_create(path: &Path, name: &str) -> Result<Self> {
        if path.join(ARTIFACT_INDEX_NAME).is_file() {
            ArtifactRepository::load(path)
        } else {
            Ok(ArtifactRepository::create(path, name))
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &ArtifactKey) -> bool {
        self.entries.iter().any(|e| e.key == *key)
    }

    pub fn entries(&self) -> &[ArtifactEntry] {
        &self.entries
    }

    pub fn entry(&self, key: &ArtifactKey) -> Option<&ArtifactEntry> {
        self.entries.iter().find(|e| e.key == *key)
    }

    /// Absolute location of a published artifact.
    pub fn artifact_path(&self, key: &ArtifactKey) -> Option<PathBuf> {
        self.entry(key).map(|e| self.path.join(&e.location))
    }

    /// Copy the artifact payload into the repository and record it in the
    /// index. Re-publishing an existing key is a no-op.
    pub fn add_artifact(&mut self, key: &ArtifactKey, source: &Path) -> Result<()> {
        if self.contains(key) {
            return Ok(());
        }
        if !source.exists() {
            return Err(ProvisorError::file_not_found(source));
        }

        let file_name = match source.extension() {
            Some(ext) => format!("{}_{}.{}", key.id, key.version, ext.to_string_lossy()),
            None => format!("{}_{}", key.id, key.version),
        };
        let location = format!("{}/{}", key.classifier, file_name);
        let destination = self.path.join(&location);

        if source.is_dir() {
            copy_dir(source, &destination)?;
        } else {
            if let Some(parent) = destination.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ProvisorError::write_failed(parent, &e))?;
            }
            std::fs::copy(source, &destination)
                .map_err(|e| ProvisorError::write_failed(&destination, &e))?;
        }

        self.entries.push(ArtifactEntry {
            key: key.clone(),
            location,
            hash: hash::hash_artifact(source)?,
        });
        self.dirty = true;
        Ok(())
    }

    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        std::fs::create_dir_all(&self.path)
            .map_err(|e| ProvisorError::write_failed(&self.path, &e))?;
        let index_path = self.path.join(ARTIFACT_INDEX_NAME);
        let index = ArtifactIndex {
            name: self.name.clone(),
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&index)?;
        std::fs::write(&index_path, json)
            .map_err(|e| ProvisorError::write_failed(&index_path, &e))?;
        self.dirty = false;
        Ok(())
    }
}

fn copy_dir(source: &Path, destination: &Path) -> Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| ProvisorError::IoError {
            message: e.to_string(),
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .unwrap_or_else(|_| entry.path());
        let target = destination.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| ProvisorError::write_failed(&target, &e))?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ProvisorError::write_failed(parent, &e))?;
            }
            std::fs::copy(entry.path(), &target)
                .map_err(|e| ProvisorError::write_failed(&target, &e))?;
        }
    }
    Ok(())
}
