//! Feature reference actions: installFeature, uninstallFeature
//!
//! Features are tracked as (id, version) references on the context, the
//! platform configuration's view of what is installed. Like the bundle
//! pair, uninstalling an absent feature is benign.

use crate::status::Status;
use crate::touchpoint::actions::{ActionContext, FeatureReference, TouchpointAction};
use crate::touchpoint::params::Parameters;
use crate::touchpoint::undo::UndoState;
use crate::version::Version;

const PARAM_FEATURE_ID: &str = "featureId";
const PARAM_VERSION: &str = "version";

fn feature_identity(
    params: &Parameters,
    action_id: &str,
) -> Result<(String, Version), Status> {
    let id = params.required(PARAM_FEATURE_ID, action_id)?;
    let version = params.required(PARAM_VERSION, action_id)?;
    let version =
        Version::parse(version).map_err(|e| Status::error(format!("{action_id}: {e}")))?;
    Ok((id.to_string(), version))
}

pub struct InstallFeatureAction;

impl TouchpointAction for InstallFeatureAction {
    fn id(&self) -> &str {
        "installFeature"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let (id, version) = match feature_identity(params, self.id()) {
            Ok(v) => v,
            Err(status) => return (status, UndoState::None),
        };
        let reference = FeatureReference {
            id: id.clone(),
            version: version.clone(),
        };
        if context.features.contains(&reference) {
            return (Status::ok(), UndoState::None);
        }
        context.features.push(reference);
        (Status::ok(), UndoState::InstalledFeature { id, version })
    }

    fn undo(&self, context: &mut ActionContext, state: UndoState) {
        if let UndoState::InstalledFeature { id, version } = state {
            context
                .features
                .retain(|f| !(f.id == id && f.version == version));
        }
    }
}

pub struct UninstallFeatureAction;

impl TouchpointAction for UninstallFeatureAction {
    fn id(&self) -> &str {
        "uninstallFeature"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let (id, version) = match feature_identity(params, self.id()) {
            Ok(v) => v,
            Err(status) => return (status, UndoState::None),
        };
        let before = context.features.len();
        context
            .features
            .retain(|f| !(f.id == id && f.version == version));
        let removed = context.features.len() != before;
        let status = if removed {
            Status::ok()
        } else {
            Status::warning(format!("feature {id}/{version} is not installed"))
        };
        (status, UndoState::RemovedFeature {
            id,
            version,
            removed,
        })
    }

    fn undo(&self, context: &mut ActionContext, state: UndoState) {
        if let UndoState::RemovedFeature {
            id,
            version,
            removed: true,
        } = state
        {
            context.features.push(FeatureReference { id, version });
        }
    }
}
