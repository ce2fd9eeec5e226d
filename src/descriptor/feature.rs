//! Feature descriptors
//!
//! A feature groups bundles and other features into one installable whole.
//! Each entry carries platform selectors (comma-separated values per axis)
//! and a match rule describing how strictly the entry's version binds.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::descriptor::load_json;
use crate::error::Result;
use crate::ldap::Filter;
use crate::version::{MatchRule, Version, VersionRange};

/// Conventional descriptor file name inside a feature directory.
pub const FEATURE_DESCRIPTOR_NAME: &str = "feature.json";

/// What an entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Plugin,
    Feature,
}

/// One plugin/feature entry of a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureEntry {
    pub id: String,
    pub version: Version,
    #[serde(default = "default_entry_kind")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nl: Option<String>,
    #[serde(default = "default_match_rule", rename = "match")]
    pub match_rule: MatchRule,
    #[serde(default)]
    pub optional: bool,
    /// Entry comes from the feature's requires block rather than its
    /// contents. In a patch feature these define the applicability scope.
    #[serde(default)]
    pub is_requires: bool,
    /// Marks the target of a patch feature.
    #[serde(default)]
    pub patch: bool,
}

fn default_entry_kind() -> EntryKind {
    EntryKind::Plugin
}

fn default_match_rule() -> MatchRule {
    MatchRule::GreaterOrEqual
}

impl FeatureEntry {
    pub fn plugin(id: impl Into<String>, version: Version) -> Self {
        FeatureEntry {
            id: id.into(),
            version,
            kind: EntryKind::Plugin,
            os: None,
            ws: None,
            arch: None,
            nl: None,
            match_rule: default_match_rule(),
            optional: false,
            is_requires: false,
            patch: false,
        }
    }

    pub fn included_feature(id: impl Into<String>, version: Version) -> Self {
        FeatureEntry {
            kind: EntryKind::Feature,
            ..FeatureEntry::plugin(id, version)
        }
    }

    /// Platform filter compiled from the entry's selectors, if any are set.
    pub fn filter(&self) -> Option<Filter> {
        Filter::from_selectors(
            self.os.as_deref(),
            self.ws.as_deref(),
            self.arch.as_deref(),
            self.nl.as_deref(),
        )
    }

    /// The version range this entry requires, per its match rule.
    pub fn version_range(&self) -> VersionRange {
        VersionRange::from_match_rule(&self.version, self.match_rule)
    }

    /// Target unit id in the metadata graph. Feature entries point at the
    /// feature's group unit.
    pub fn target_iu_id(&self) -> String {
        match self.kind {
            EntryKind::Plugin => self.id.clone(),
            EntryKind::Feature => group_id(&self.id),
        }
    }
}

/// A parsed feature descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub id: String,
    pub version: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<FeatureEntry>,
}

impl Feature {
    pub fn load(path: &Path) -> Result<Feature> {
        load_json(path)
    }

    /// A patch feature has at least one requires entry flagged as the
    /// patch target.
    pub fn is_patch(&self) -> bool {
        self.entries.iter().any(|e| e.is_requires && e.patch)
    }

    /// The id of the group unit published for this feature.
    pub fn group_id(&self) -> String {
        group_id(&self.id)
    }

    pub fn content_entries(&self) -> impl Iterator<Item = &FeatureEntry> {
        self.entries.iter().filter(|e| !e.is_requires)
    }

    pub fn requires_entries(&self) -> impl Iterator<Item = &FeatureEntry> {
        self.entries.iter().filter(|e| e.is_requires)
    }
}

/// Feature group unit id suffix convention.
pub fn group_id(feature_id: &str) -> String {
    format!("{feature_id}.feature.group")
}
