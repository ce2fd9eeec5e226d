//! Action parameter maps and token resolution
//!
//! Raw invocation parameters may carry the `@artifact` token (replaced by
//! the operand's artifact payload path, resolved through the profile) and
//! the `@ignore` token (the parameter is dropped entirely). Resolution
//! happens once per invocation, before the action sees the map.

use std::collections::BTreeMap;

use crate::metadata::artifact_key::ArtifactKey;
use crate::profile::Profile;
use crate::status::Status;

/// Token resolved to the operand's artifact location.
pub const TOKEN_ARTIFACT: &str = "@artifact";

/// Token that drops the parameter.
pub const TOKEN_IGNORE: &str = "@ignore";

/// An immutable, resolved parameter map handed to one action invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: BTreeMap<String, String>,
}

impl Parameters {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Parameters { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Fetch a required parameter; absence is the standard
    /// "parameter not set" error status naming both sides.
    pub fn required(&self, key: &str, action_id: &str) -> Result<&str, Status> {
        self.get(key)
            .ok_or_else(|| Status::parameter_not_set(key, action_id))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resolve the special tokens in a raw parameter map against the operand's
/// artifact. A missing artifact mapping (or missing payload file) is an
/// error status naming the artifact.
pub fn resolve(
    raw: &BTreeMap<String, String>,
    artifact: Option<&ArtifactKey>,
    profile: &Profile,
) -> Result<Parameters, Status> {
    let mut values = BTreeMap::new();
    for (key, value) in raw {
        if value == TOKEN_IGNORE {
            continue;
        }
        if value == TOKEN_ARTIFACT {
            let Some(artifact) = artifact else {
                return Err(Status::error(
                    "instruction uses @artifact but the operand has no artifact",
                ));
            };
            let Some(location) = profile.artifact_location(artifact) else {
                return Err(Status::error(format!("Artifact file not found: {artifact}")));
            };
            if !location.exists() {
                return Err(Status::error(format!(
                    "Artifact file not found: {}",
                    location.display()
                )));
            }
            values.insert(key.clone(), location.display().to_string());
            continue;
        }
        values.insert(key.clone(), value.clone());
    }
    Ok(Parameters::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::Version;
    use tempfile::TempDir;

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_required_parameter_missing() {
        let params = Parameters::default();
        let err = params.required("bundle", "installBundle").unwrap_err();
        assert!(err.is_error());
        assert!(err.message().contains("bundle"));
        assert!(err.message().contains("installBundle"));
    }

    #[test]
    fn test_ignore_token_drops_parameter() {
        let profile = Profile::new("p");
        let params = resolve(&raw(&[("extra", "@ignore"), ("kept", "v")]), None, &profile).unwrap();
        assert!(params.get("extra").is_none());
        assert_eq!(params.get("kept"), Some("v"));
    }

    #[test]
    fn test_artifact_token_resolves_through_profile() {
        let temp = TempDir::new().unwrap();
        let payload = temp.path().join("core.jar");
        std::fs::write(&payload, "bytes").unwrap();

        let key = ArtifactKey::bundle("org.example.core", Version::new(1, 0, 0));
        let mut profile = Profile::new("p");
        profile.register_artifact(key.clone(), &payload);

        let params = resolve(&raw(&[("bundle", "@artifact")]), Some(&key), &profile).unwrap();
        assert_eq!(params.get("bundle"), Some(payload.display().to_string().as_str()));
    }

    #[test]
    fn test_artifact_token_missing_mapping_is_error() {
        let key = ArtifactKey::bundle("ghost", Version::new(1, 0, 0));
        let profile = Profile::new("p");
        let err = resolve(&raw(&[("bundle", "@artifact")]), Some(&key), &profile).unwrap_err();
        assert!(err.is_error());
        assert!(err.message().contains("not found"));
    }

    #[test]
    fn test_artifact_token_missing_file_is_error() {
        let key = ArtifactKey::bundle("gone", Version::new(1, 0, 0));
        let mut profile = Profile::new("p");
        profile.register_artifact(key.clone(), "/nonexistent/gone.jar");
        let err = resolve(&raw(&[("bundle", "@artifact")]), Some(&key), &profile).unwrap_err();
        assert!(err.message().contains("Artifact file not found"));
    }

    #[test]
    fn test_artifact_token_without_operand_artifact() {
        let profile = Profile::new("p");
        let err = resolve(&raw(&[("bundle", "@artifact")]), None, &profile).unwrap_err();
        assert!(err.is_error());
    }
}
