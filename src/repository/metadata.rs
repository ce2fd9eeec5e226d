//! Metadata repository: installable units behind a JSON index

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ProvisorError, Result};
use crate::metadata::iu::InstallableUnit;
use crate::version::{Version, VersionRange};

/// Index file name inside a metadata repository directory.
pub const METADATA_INDEX_NAME: &str = "content.json";

#[derive(Debug, Serialize, Deserialize)]
struct MetadataIndex {
    name: String,
    units: Vec<InstallableUnit>,
}

/// A directory of installable-unit metadata.
#[derive(Debug)]
pub struct MetadataRepository {
    path: PathBuf,
    name: String,
    units: Vec<InstallableUnit>,
    dirty: bool,
}

impl MetadataRepository {
    /// Create a new, empty repository. The directory is created on save.
    pub fn create(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        MetadataRepository {
            path: path.into(),
            name: name.into(),
            units: Vec::new(),
            dirty: true,
        }
    }

    /// Load an existing repository from its index file.
    pub fn load(path: &Path) -> Result<Self> {
        let index_path = path.join(METADATA_INDEX_NAME);
        if !index_path.is_file() {
            return Err(ProvisorError::RepositoryNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(&index_path)
            .map_err(|e| ProvisorError::read_failed(&index_path, &e))?;
        let index: MetadataIndex =
            serde_json::from_str(&contents).map_err(|e| ProvisorError::RepositoryIndexInvalid {
                path: index_path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(MetadataRepository {
            path: path.to_path_buf(),
            name: index.name,
            units: index.units,
            dirty: false,
        })
    }

    /// Load when the index exists, otherwise start a fresh repository at
    /// the location (the `--append` behavior).
    pub fn load_or_create(path: &Path, name: &str) -> Result<Self> {
        if path.join(METADATA_INDEX_NAME).is_file() {
            MetadataRepository::load(path)
        } else {
            Ok(MetadataRepository::create(path, name))
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, id: &str, version: &Version) -> bool {
        self.unit(id, version).is_some()
    }

    pub fn unit(&self, id: &str, version: &Version) -> Option<&InstallableUnit> {
        self.units
            .iter()
            .find(|u| u.id == id && u.version == *version)
    }

    /// All units with the given id, any version.
    pub fn query_by_id(&self, id: &str) -> Vec<&InstallableUnit> {
        self.units.iter().filter(|u| u.id == id).collect()
    }

    /// Units with the given id whose version lies in the range.
    pub fn query(&self, id: &str, range: &VersionRange) -> Vec<&InstallableUnit> {
        self.units
            .iter()
            .filter(|u| u.id == id && range.includes(&u.version))
            .collect()
    }

    pub fn units(&self) -> &[InstallableUnit] {
        &self.units
    }

    /// Add a unit unless the same (id, version) is already present.
    pub fn add_unit(&mut self, unit: InstallableUnit) {
        if !self.contains(&unit.id, &unit.version) {
            self.units.push(unit);
            self.dirty = true;
        }
    }

    pub fn add_units(&mut self, units: impl IntoIterator<Item = InstallableUnit>) {
        for unit in units {
            self.add_unit(unit);
        }
    }

    /// Write the index. A clean repository is left untouched.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        std::fs::create_dir_all(&self.path)
            .map_err(|e| ProvisorError::write_failed(&self.path, &e))?;
        let index_path = self.path.join(METADATA_INDEX_NAME);
        let index = MetadataIndex {
            name: self.name.clone(),
            units: self.units.clone(),
        };
        let json = serde_json::to_string_pretty(&index)?;
        std::fs::write(&index_path, json)
            .map_err(|e| ProvisorError::write_failed(&index_path, &e))?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn unit(id: &str, version: Version) -> InstallableUnit {
        InstallableUnit::builder(id, version).build()
    }

    #[test]
    fn test_add_unit_deduplicates() {
        let mut repo = MetadataRepository::create("/tmp/unused", "test");
        repo.add_unit(unit("x", Version::new(1, 0, 0)));
        repo.add_unit(unit("x", Version::new(1, 0, 0)));
        repo.add_unit(unit("x", Version::new(1, 0, 1)));
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_query_by_range() {
        let mut repo = MetadataRepository::create("/tmp/unused", "test");
        repo.add_unit(unit("x", Version::new(1, 0, 0)));
        repo.add_unit(unit("x", Version::new(2, 0, 0)));
        let range = VersionRange::parse("[1.0.0,2.0.0)").unwrap();
        let found = repo.query("x", &range);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].version, Version::new(1, 0, 0));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut repo = MetadataRepository::create(temp.path(), "round-trip");
        repo.add_unit(unit("org.example.core", Version::new(1, 2, 3)));
        repo.save().unwrap();

        let loaded = MetadataRepository::load(temp.path()).unwrap();
        assert_eq!(loaded.name(), "round-trip");
        assert!(loaded.contains("org.example.core", &Version::new(1, 2, 3)));
    }

    #[test]
    fn test_load_missing_repository() {
        let temp = TempDir::new().unwrap();
        let err = MetadataRepository::load(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, ProvisorError::RepositoryNotFound { .. }));
    }

    #[test]
    fn test_load_or_create_appends() {
        let temp = TempDir::new().unwrap();
        let mut repo = MetadataRepository::create(temp.path(), "first");
        repo.add_unit(unit("a", Version::new(1, 0, 0)));
        repo.save().unwrap();

        let mut appended = MetadataRepository::load_or_create(temp.path(), "ignored").unwrap();
        appended.add_unit(unit("b", Version::new(1, 0, 0)));
        appended.save().unwrap();

        let loaded = MetadataRepository::load(temp.path()).unwrap();
        assert_eq!(loaded.name(), "first");
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_corrupt_index_is_reported() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(METADATA_INDEX_NAME), "{broken").unwrap();
        let err = MetadataRepository::load(temp.path()).unwrap_err();
        assert!(matches!(err, ProvisorError::RepositoryIndexInvalid { .. }));
    }
}
