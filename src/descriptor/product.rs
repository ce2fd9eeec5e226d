//! Product descriptors
//!
//! A product pins down one shippable configuration: the launcher, the VM
//! and program arguments, the contained bundles or features, and per-bundle
//! start levels.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::descriptor::load_json;
use crate::error::Result;
use crate::version::Version;

/// Start-level configuration for one bundle of the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStartLevel {
    pub id: String,
    #[serde(default = "no_level")]
    pub start_level: i32,
    #[serde(default)]
    pub auto_start: bool,
}

fn no_level() -> i32 {
    crate::model::bundle_info::NO_LEVEL
}

/// A bundle or feature reference inside a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
}

/// A parsed product descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub version: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launcher_name: Option<String>,
    /// When true the product is assembled from features; otherwise from
    /// the bundle list.
    #[serde(default)]
    pub use_features: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bundles: Vec<ProductEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<ProductEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub program_args: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub jvm_args: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub start_levels: Vec<ProductStartLevel>,
    #[serde(default, skip_serializing_if = "std::collections::BTreeMap::is_empty")]
    pub properties: std::collections::BTreeMap<String, String>,
}

impl Product {
    pub fn load(path: &Path) -> Result<Product> {
        load_json(path)
    }

    /// Entries the product's root unit requires: features when in feature
    /// mode, bundles otherwise.
    pub fn contents(&self) -> &[ProductEntry] {
        if self.use_features {
            &self.features
        } else {
            &self.bundles
        }
    }

    pub fn start_level_for(&self, bundle_id: &str) -> Option<&ProductStartLevel> {
        self.start_levels.iter().find(|s| s.id == bundle_id)
    }
}
