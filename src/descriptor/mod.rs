//! Feature and product descriptor documents
//!
//! Descriptors are JSON files next to the artifacts they describe:
//! `feature.json` inside a feature directory and `<name>.product.json` at
//! the source root. Both deserialize with serde and carry the selectors,
//! match rules and patch flags the publisher actions translate into
//! requirements.

pub mod feature;
pub mod product;

pub use feature::{EntryKind, Feature, FeatureEntry};
pub use product::{Product, ProductStartLevel};

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{ProvisorError, Result};

/// Load a JSON descriptor, wrapping parse failures with the file path.
pub(crate) fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Err(ProvisorError::DescriptorNotFound {
            path: path.display().to_string(),
        });
    }
    let contents =
        std::fs::read_to_string(path).map_err(|e| ProvisorError::read_failed(path, &e))?;
    serde_json::from_str(&contents).map_err(|e| ProvisorError::DescriptorInvalid {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
