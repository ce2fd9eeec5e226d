//! The shared result publisher actions write into

use std::collections::BTreeMap;

use crate::metadata::iu::InstallableUnit;
use crate::version::Version;

/// Which partition a unit was published into. ROOT units are the
/// top-level installables a user asks for; NON_ROOT units exist to
/// support them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IuKind {
    Root,
    NonRoot,
}

/// How [`PublisherResult::merge`] treats the incoming partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Units keep the partition they were published into.
    Keep,
    /// Everything merged in lands in ROOT.
    AllRoot,
    /// Everything merged in lands in NON_ROOT.
    AllNonRoot,
}

type IuMap = BTreeMap<(String, Version), InstallableUnit>;

/// Accumulates the units produced by one publishing run, partitioned as
/// ROOT / NON_ROOT and keyed by (id, version). Adding an existing key is
/// a no-op, which is what makes re-running actions idempotent.
#[derive(Debug, Clone, Default)]
pub struct PublisherResult {
    roots: IuMap,
    non_roots: IuMap,
}

impl PublisherResult {
    pub fn new() -> Self {
        PublisherResult::default()
    }

    pub fn add_iu(&mut self, unit: InstallableUnit, kind: IuKind) {
        let key = (unit.id.clone(), unit.version.clone());
        if self.contains(&key.0, &key.1) {
            return;
        }
        match kind {
            IuKind::Root => self.roots.insert(key, unit),
            IuKind::NonRoot => self.non_roots.insert(key, unit),
        };
    }

    pub fn add_ius(&mut self, units: impl IntoIterator<Item = InstallableUnit>, kind: IuKind) {
        for unit in units {
            self.add_iu(unit, kind);
        }
    }

    pub fn contains(&self, id: &str, version: &Version) -> bool {
        self.get(id, version).is_some()
    }

    pub fn get(&self, id: &str, version: &Version) -> Option<&InstallableUnit> {
        let key = (id.to_string(), version.clone());
        self.roots.get(&key).or_else(|| self.non_roots.get(&key))
    }

    pub fn kind_of(&self, id: &str, version: &Version) -> Option<IuKind> {
        let key = (id.to_string(), version.clone());
        if self.roots.contains_key(&key) {
            Some(IuKind::Root)
        } else if self.non_roots.contains_key(&key) {
            Some(IuKind::NonRoot)
        } else {
            None
        }
    }

    /// All units with the given id, either partition.
    pub fn query_by_id(&self, id: &str) -> Vec<&InstallableUnit> {
        self.all_ius().filter(|u| u.id == id).collect()
    }

    pub fn root_ius(&self) -> impl Iterator<Item = &InstallableUnit> {
        self.roots.values()
    }

    pub fn non_root_ius(&self) -> impl Iterator<Item = &InstallableUnit> {
        self.non_roots.values()
    }

    pub fn all_ius(&self) -> impl Iterator<Item = &InstallableUnit> {
        self.roots.values().chain(self.non_roots.values())
    }

    pub fn len(&self) -> usize {
        self.roots.len() + self.non_roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.non_roots.is_empty()
    }

    /// Merge another result in. Existing keys win over incoming ones.
    pub fn merge(&mut self, other: PublisherResult, policy: MergePolicy) {
        match policy {
            MergePolicy::Keep => {
                self.add_ius(other.roots.into_values(), IuKind::Root);
                self.add_ius(other.non_roots.into_values(), IuKind::NonRoot);
            }
            MergePolicy::AllRoot => {
                self.add_ius(other.roots.into_values(), IuKind::Root);
                self.add_ius(other.non_roots.into_values(), IuKind::Root);
            }
            MergePolicy::AllNonRoot => {
                self.add_ius(other.roots.into_values(), IuKind::NonRoot);
                self.add_ius(other.non_roots.into_values(), IuKind::NonRoot);
            }
        }
    }
}
