//! Error types and handling for provisor
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Errors here are for I/O failures and configuration mistakes that abort an
//! operation outright. Recoverable per-action outcomes (a missing artifact in
//! index-only mode, a bundle that was already absent on uninstall) travel as
//! [`crate::status::Status`] values instead, so a failing publisher action
//! never takes down the rest of the pipeline.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for provisor operations
#[derive(Error, Diagnostic, Debug)]
pub enum ProvisorError {
    // Data model errors
    #[error("Launcher configuration locations diverge: config '{config}' vs persistent data '{persistent}'")]
    #[diagnostic(
        code(provisor::model::inconsistent_locations),
        help("The -configuration location and the framework persistent data location must resolve to the same directory")
    )]
    InconsistentLocations { config: String, persistent: String },

    #[error("Invalid version: {input}")]
    #[diagnostic(
        code(provisor::model::invalid_version),
        help("Versions use the major.minor.micro.qualifier form, e.g. 1.2.3 or 1.2.3.v20240101")
    )]
    InvalidVersion { input: String, reason: String },

    #[error("Invalid version range: {input}")]
    #[diagnostic(code(provisor::model::invalid_version_range))]
    InvalidVersionRange { input: String, reason: String },

    #[error("Invalid config spec: {input}")]
    #[diagnostic(
        code(provisor::model::invalid_config_spec),
        help("Config specs are ws.os.arch triples, e.g. gtk.linux.x86_64 or ANY.ANY.ANY")
    )]
    InvalidConfigSpec { input: String },

    #[error("Invalid LDAP filter: {input}")]
    #[diagnostic(code(provisor::model::invalid_filter))]
    InvalidFilter { input: String, reason: String },

    // Parse errors
    #[error("Failed to parse launcher ini: {path}")]
    #[diagnostic(
        code(provisor::parse::launcher_ini_invalid),
        help("A directive that takes a value (-configuration, -vm) must be followed by a value line")
    )]
    LauncherIniInvalid { path: String, reason: String },

    #[error("Failed to parse bundle manifest: {path}")]
    #[diagnostic(code(provisor::parse::manifest_invalid))]
    ManifestInvalid { path: String, reason: String },

    #[error("Failed to parse descriptor file: {path}")]
    #[diagnostic(code(provisor::parse::descriptor_invalid))]
    DescriptorInvalid { path: String, reason: String },

    #[error("Descriptor file not found: {path}")]
    #[diagnostic(code(provisor::parse::descriptor_not_found))]
    DescriptorNotFound { path: String },

    // Publishing errors
    #[error("Publisher action '{action}' failed: {message}")]
    #[diagnostic(code(provisor::publish::action_failed))]
    ActionFailed { action: String, message: String },

    #[error("Duplicate touchpoint action registered: {action_id}")]
    #[diagnostic(code(provisor::touchpoint::duplicate_action))]
    DuplicateAction { action_id: String },

    #[error("Unknown touchpoint action: {action_id}")]
    #[diagnostic(
        code(provisor::touchpoint::unknown_action),
        help("Run 'provisor apply --list-actions' to see the registered action set")
    )]
    UnknownAction { action_id: String },

    // Repository errors
    #[error("Repository not found at: {path}")]
    #[diagnostic(
        code(provisor::repo::not_found),
        help("Pass --append to create the repository if it does not exist yet")
    )]
    RepositoryNotFound { path: String },

    #[error("Failed to load repository index: {path}")]
    #[diagnostic(code(provisor::repo::index_invalid))]
    RepositoryIndexInvalid { path: String, reason: String },

    // Profile / plan errors
    #[error("Failed to parse provisioning plan: {path}")]
    #[diagnostic(code(provisor::plan::parse_failed))]
    PlanParseFailed { path: String, reason: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(provisor::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}")]
    #[diagnostic(code(provisor::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(provisor::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to back up file: {path}")]
    #[diagnostic(code(provisor::fs::backup_failed))]
    BackupFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(provisor::fs::io_error))]
    IoError { message: String },
}

impl ProvisorError {
    pub fn read_failed(path: &std::path::Path, err: &std::io::Error) -> Self {
        ProvisorError::FileReadFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    pub fn write_failed(path: &std::path::Path, err: &std::io::Error) -> Self {
        ProvisorError::FileWriteFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    pub fn file_not_found(path: &std::path::Path) -> Self {
        ProvisorError::FileNotFound {
            path: path.display().to_string(),
        }
    }
}

impl From<std::io::Error> for ProvisorError {
    fn from(err: std::io::Error) -> Self {
        ProvisorError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ProvisorError {
    fn from(err: serde_json::Error) -> Self {
        ProvisorError::DescriptorInvalid {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ProvisorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic as _;

    #[test]
    fn test_error_display() {
        let err = ProvisorError::UnknownAction {
            action_id: "frobnicate".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown touchpoint action: frobnicate");
    }

    #[test]
    fn test_error_code() {
        let err = ProvisorError::RepositoryNotFound {
            path: "/repo".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("provisor::repo::not_found".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ProvisorError = io_err.into();
        assert!(matches!(err, ProvisorError::IoError { .. }));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("not json");
        let err: ProvisorError = parse_result.unwrap_err().into();
        assert!(matches!(err, ProvisorError::DescriptorInvalid { .. }));
    }

    #[test]
    fn test_inconsistent_locations_message() {
        let err = ProvisorError::InconsistentLocations {
            config: "/a".to_string(),
            persistent: "/b".to_string(),
        };
        assert!(err.to_string().contains("/a"));
        assert!(err.to_string().contains("/b"));
    }
}
