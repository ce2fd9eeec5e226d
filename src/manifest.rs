//! Bundle manifest (META-INF/MANIFEST.MF) parsing
//!
//! Reads the headers the publisher needs from exploded bundle directories.
//! The manifest line format wraps long values with continuation lines that
//! begin with a single space; header values may carry `;`-separated
//! directives which are stripped from the symbolic name.

use std::path::Path;

use crate::error::{ProvisorError, Result};
use crate::version::{Version, VersionRange};

const HEADER_SYMBOLIC_NAME: &str = "Bundle-SymbolicName";
const HEADER_VERSION: &str = "Bundle-Version";
const HEADER_FRAGMENT_HOST: &str = "Fragment-Host";

/// The manifest headers relevant to publishing.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleManifest {
    pub symbolic_name: String,
    pub version: Version,
    pub fragment_host: Option<FragmentHost>,
}

/// A `Fragment-Host` header: host bundle name plus optional version range.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentHost {
    pub name: String,
    pub range: VersionRange,
}

impl BundleManifest {
    /// Load the manifest from a bundle location. Exploded directories are
    /// read from `META-INF/MANIFEST.MF`; anything else has no readable
    /// manifest and fails.
    pub fn load(location: &Path) -> Result<BundleManifest> {
        let manifest_path = if location.is_dir() {
            location.join("META-INF").join("MANIFEST.MF")
        } else {
            return Err(ProvisorError::ManifestInvalid {
                path: location.display().to_string(),
                reason: "not an exploded bundle directory".to_string(),
            });
        };
        let contents = std::fs::read_to_string(&manifest_path)
            .map_err(|e| ProvisorError::read_failed(&manifest_path, &e))?;
        Self::parse(&contents, &manifest_path)
    }

    pub fn parse(contents: &str, path: &Path) -> Result<BundleManifest> {
        let invalid = |reason: String| ProvisorError::ManifestInvalid {
            path: path.display().to_string(),
            reason,
        };

        let mut symbolic_name = None;
        let mut version = None;
        let mut fragment_host = None;

        for (header, value) in unwrap_lines(contents) {
            match header.as_str() {
                HEADER_SYMBOLIC_NAME => {
                    // Directives like ;singleton:=true follow the name.
                    let name = value.split(';').next().unwrap_or("").trim();
                    if name.is_empty() {
                        return Err(invalid("empty Bundle-SymbolicName".to_string()));
                    }
                    symbolic_name = Some(name.to_string());
                }
                HEADER_VERSION => {
                    version = Some(Version::parse(value.trim()).map_err(|e| {
                        invalid(format!("bad Bundle-Version: {e}"))
                    })?);
                }
                HEADER_FRAGMENT_HOST => {
                    fragment_host = Some(parse_fragment_host(&value, &invalid)?);
                }
                _ => {}
            }
        }

        Ok(BundleManifest {
            symbolic_name: symbolic_name
                .ok_or_else(|| invalid("missing Bundle-SymbolicName".to_string()))?,
            version: version.unwrap_or_else(Version::zero),
            fragment_host,
        })
    }
}

fn parse_fragment_host(
    value: &str,
    invalid: &impl Fn(String) -> ProvisorError,
) -> Result<FragmentHost> {
    let mut parts = value.split(';').map(str::trim);
    let name = parts
        .next()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| invalid("empty Fragment-Host".to_string()))?
        .to_string();

    let mut range = VersionRange::any();
    for directive in parts {
        if let Some(spec) = directive.strip_prefix("bundle-version=") {
            let spec = spec.trim_matches('"');
            range = VersionRange::parse(spec)
                .map_err(|e| invalid(format!("bad Fragment-Host range: {e}")))?;
        }
    }
    Ok(FragmentHost { name, range })
}

/// Fold continuation lines (leading single space) into (header, value)
/// pairs. Lines without a colon are ignored, as manifest readers do.
fn unwrap_lines(contents: &str) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::new();
    for raw in contents.lines() {
        if raw.is_empty() {
            continue;
        }
        if let Some(continuation) = raw.strip_prefix(' ') {
            if let Some((_, value)) = headers.last_mut() {
                value.push_str(continuation);
            }
            continue;
        }
        if let Some((header, value)) = raw.split_once(':') {
            headers.push((header.trim().to_string(), value.trim().to_string()));
        }
    }
    headers
}
