//! Bundle state actions: installBundle, uninstallBundle, setStartLevel,
//! markStarted
//!
//! Install and uninstall are a symmetric pair working over the bundle's
//! manifest (loaded from its payload directory). The start-level and
//! started-mark actions identify their target bundle through the
//! engine-injected identity parameters instead of a payload path, since
//! the configuration unit carrying them has no artifact of its own.

use std::path::Path;

use crate::manifest::BundleManifest;
use crate::model::BundleInfo;
use crate::status::Status;
use crate::touchpoint::actions::{ActionContext, TouchpointAction};
use crate::touchpoint::params::Parameters;
use crate::touchpoint::undo::UndoState;
use crate::version::Version;

/// Parameter naming the payload location of the bundle to (un)install.
pub const PARAM_BUNDLE: &str = "bundle";

/// Engine-injected parameter: the operand bundle's symbolic name.
pub const PARAM_BUNDLE_SYMBOLIC_NAME: &str = "bundleSymbolicName";

/// Engine-injected parameter: the operand bundle's version.
pub const PARAM_BUNDLE_VERSION: &str = "bundleVersion";

/// Resolve the target bundle identity from the injected parameters.
fn bundle_identity(
    params: &Parameters,
    action_id: &str,
) -> Result<(String, Version), Status> {
    let name = params.required(PARAM_BUNDLE_SYMBOLIC_NAME, action_id)?;
    let version = params.required(PARAM_BUNDLE_VERSION, action_id)?;
    let version = Version::parse(version)
        .map_err(|e| Status::error(format!("{action_id}: {e}")))?;
    Ok((name.to_string(), version))
}

pub struct InstallBundleAction;

impl TouchpointAction for InstallBundleAction {
    fn id(&self) -> &str {
        "installBundle"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let location = match params.required(PARAM_BUNDLE, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        let manifest = match BundleManifest::load(Path::new(&location)) {
            Ok(m) => m,
            Err(e) => return (Status::error(e.to_string()), UndoState::None),
        };
        let bundle = BundleInfo::new(&manifest.symbolic_name, manifest.version.clone(), location);
        if context.manipulator.config_data_mut().add_bundle(bundle) {
            (
                Status::ok(),
                UndoState::InstalledBundle {
                    name: manifest.symbolic_name,
                    version: manifest.version,
                },
            )
        } else {
            // Already installed: benign, and nothing to undo.
            (Status::ok(), UndoState::None)
        }
    }

    fn undo(&self, context: &mut ActionContext, state: UndoState) {
        if let UndoState::InstalledBundle { name, version } = state {
            context
                .manipulator
                .config_data_mut()
                .remove_bundle_named(&name, &version);
        }
    }
}

pub struct UninstallBundleAction;

impl TouchpointAction for UninstallBundleAction {
    fn id(&self) -> &str {
        "uninstallBundle"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let location = match params.required(PARAM_BUNDLE, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        let manifest = match BundleManifest::load(Path::new(&location)) {
            Ok(m) => m,
            // Unreadable payload means the identity cannot be derived;
            // treat the bundle as already absent.
            Err(e) => return (Status::warning(e.to_string()), UndoState::None),
        };
        match context
            .manipulator
            .config_data_mut()
            .remove_bundle_named(&manifest.symbolic_name, &manifest.version)
        {
            Some(bundle) => (Status::ok(), UndoState::RemovedBundle { bundle }),
            None => (
                Status::warning(format!(
                    "bundle {}/{} is not installed",
                    manifest.symbolic_name, manifest.version
                )),
                UndoState::None,
            ),
        }
    }

    fn undo(&self, context: &mut ActionContext, state: UndoState) {
        if let UndoState::RemovedBundle { bundle } = state {
            context.manipulator.config_data_mut().add_bundle(bundle);
        }
    }
}

pub struct SetStartLevelAction;

impl TouchpointAction for SetStartLevelAction {
    fn id(&self) -> &str {
        "setStartLevel"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let level = match params.required("startLevel", self.id()) {
            Ok(v) => v,
            Err(status) => return (status, UndoState::None),
        };
        let level: i32 = match level.parse() {
            Ok(v) => v,
            Err(_) => {
                return (
                    Status::error(format!("setStartLevel: '{level}' is not a start level")),
                    UndoState::None,
                );
            }
        };
        let (name, version) = match bundle_identity(params, self.id()) {
            Ok(v) => v,
            Err(status) => return (status, UndoState::None),
        };
        let Some(bundle) = context
            .manipulator
            .config_data_mut()
            .find_bundle_mut(&name, &version)
        else {
            return (
                Status::warning(format!("bundle {name}/{version} is not installed")),
                UndoState::None,
            );
        };
        let previous = bundle.start_level;
        bundle.start_level = level;
        (
            Status::ok(),
            UndoState::StartLevel {
                name,
                version,
                previous,
            },
        )
    }

    fn undo(&self, context: &mut ActionContext, state: UndoState) {
        if let UndoState::StartLevel {
            name,
            version,
            previous,
        } = state
            && let Some(bundle) = context
                .manipulator
                .config_data_mut()
                .find_bundle_mut(&name, &version)
        {
            bundle.start_level = previous;
        }
    }
}

pub struct MarkStartedAction;

impl TouchpointAction for MarkStartedAction {
    fn id(&self) -> &str {
        "markStarted"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let started = match params.required("started", self.id()) {
            Ok("true") => true,
            Ok("false") => false,
            Ok(other) => {
                return (
                    Status::error(format!("markStarted: '{other}' is not true or false")),
                    UndoState::None,
                );
            }
            Err(status) => return (status, UndoState::None),
        };
        let (name, version) = match bundle_identity(params, self.id()) {
            Ok(v) => v,
            Err(status) => return (status, UndoState::None),
        };
        let Some(bundle) = context
            .manipulator
            .config_data_mut()
            .find_bundle_mut(&name, &version)
        else {
            return (
                Status::warning(format!("bundle {name}/{version} is not installed")),
                UndoState::None,
            );
        };
        let previous = bundle.marked_as_started;
        bundle.marked_as_started = started;
        (
            Status::ok(),
            UndoState::Started {
                name,
                version,
                previous,
            },
        )
    }

    fn undo(&self, context: &mut ActionContext, state: UndoState) {
        if let UndoState::Started {
            name,
            version,
            previous,
        } = state
            && let Some(bundle) = context
                .manipulator
                .config_data_mut()
                .find_bundle_mut(&name, &version)
        {
            bundle.marked_as_started = previous;
        }
    }
}
