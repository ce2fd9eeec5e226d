//! Source bundle actions: addSourceBundle, removeSourceBundle
//!
//! Source bundles ship developer sources next to their binary bundle. They
//! never enter the framework's bundle list; the context tracks them
//! separately so the platform configuration can list them.

use std::path::Path;

use crate::manifest::BundleManifest;
use crate::model::BundleInfo;
use crate::status::Status;
use crate::touchpoint::actions::{ActionContext, TouchpointAction};
use crate::touchpoint::params::Parameters;
use crate::touchpoint::undo::UndoState;

const PARAM_BUNDLE: &str = "bundle";

pub struct AddSourceBundleAction;

impl TouchpointAction for AddSourceBundleAction {
    fn id(&self) -> &str {
        "addSourceBundle"
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
        if context.source_bundles.iter().any(|b| b.same_bundle(&bundle)) {
            return (Status::ok(), UndoState::None);
        }
        context.source_bundles.push(bundle);
        (
            Status::ok(),
            UndoState::AddedSourceBundle {
                name: manifest.symbolic_name,
                version: manifest.version,
            },
        )
    }

    fn undo(&self, context: &mut ActionContext, state: UndoState) {
        if let UndoState::AddedSourceBundle { name, version } = state {
            context
                .source_bundles
                .retain(|b| !(b.symbolic_name == name && b.version == version));
        }
    }
}

pub struct RemoveSourceBundleAction;

impl TouchpointAction for RemoveSourceBundleAction {
    fn id(&self) -> &str {
        "removeSourceBundle"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let location = match params.required(PARAM_BUNDLE, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        let manifest = match BundleManifest::load(Path::new(&location)) {
            Ok(m) => m,
            // No readable identity; treat as already absent.
            Err(e) => {
                return (
                    Status::warning(e.to_string()),
                    UndoState::RemovedSourceBundle { bundle: None },
                );
            }
        };
        let index = context.source_bundles.iter().position(|b| {
            b.symbolic_name == manifest.symbolic_name && b.version == manifest.version
        });
        match index {
            Some(index) => {
                let bundle = context.source_bundles.remove(index);
                (
                    Status::ok(),
                    UndoState::RemovedSourceBundle {
                        bundle: Some(bundle),
                    },
                )
            }
            None => (
                Status::warning(format!(
                    "source bundle {}/{} is not installed",
                    manifest.symbolic_name, manifest.version
                )),
                UndoState::RemovedSourceBundle { bundle: None },
            ),
        }
    }

    fn undo(&self, context: &mut ActionContext, state: UndoState) {
        if let UndoState::RemovedSourceBundle {
            bundle: Some(bundle),
        } = state
        {
            context.source_bundles.push(bundle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manipulator::Manipulator;
    use crate::profile::Profile;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn context() -> ActionContext {
        ActionContext::new(Manipulator::new(), Profile::new("test"))
    }

    fn params(location: &Path) -> Parameters {
        Parameters::new(
            [(
                PARAM_BUNDLE.to_string(),
                location.display().to_string(),
            )]
            .into_iter()
            .collect::<BTreeMap<_, _>>(),
        )
    }

    fn write_bundle(root: &Path, name: &str, version: &str) -> std::path::PathBuf {
        let dir = root.join(format!("{name}_{version}"));
        std::fs::create_dir_all(dir.join("META-INF")).unwrap();
        std::fs::write(
            dir.join("META-INF/MANIFEST.MF"),
            format!("Bundle-SymbolicName: {name}\nBundle-Version: {version}\n"),
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_add_source_bundle_round_trip() {
        let temp = TempDir::new().unwrap();
        let dir = write_bundle(temp.path(), "org.example.core.source", "1.0.0");
        let mut context = context();

        let action = AddSourceBundleAction;
        let (status, state) = action.execute(&mut context, &params(&dir));
        assert!(status.is_ok());
        assert_eq!(context.source_bundles().len(), 1);
        // Source bundles stay out of the framework bundle list.
        assert!(context.manipulator.config_data().bundles().is_empty());

        action.undo(&mut context, state);
        assert!(context.source_bundles().is_empty());
    }

    #[test]
    fn test_add_source_bundle_twice_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = write_bundle(temp.path(), "org.example.core.source", "1.0.0");
        let mut context = context();
        let action = AddSourceBundleAction;
        action.execute(&mut context, &params(&dir));
        let (status, state) = action.execute(&mut context, &params(&dir));
        assert!(status.is_ok());
        assert_eq!(state, UndoState::None);
        assert_eq!(context.source_bundles().len(), 1);
    }

    #[test]
    fn test_remove_source_bundle_round_trip() {
        let temp = TempDir::new().unwrap();
        let dir = write_bundle(temp.path(), "org.example.core.source", "1.0.0");
        let mut context = context();
        AddSourceBundleAction.execute(&mut context, &params(&dir));

        let action = RemoveSourceBundleAction;
        let (status, state) = action.execute(&mut context, &params(&dir));
        assert!(status.is_ok());
        assert!(context.source_bundles().is_empty());

        action.undo(&mut context, state);
        assert_eq!(context.source_bundles().len(), 1);
    }

    #[test]
    fn test_remove_absent_source_bundle_is_warning() {
        let temp = TempDir::new().unwrap();
        let dir = write_bundle(temp.path(), "org.example.ui.source", "1.0.0");
        let mut context = context();

        let action = RemoveSourceBundleAction;
        let (status, state) = action.execute(&mut context, &params(&dir));
        assert_eq!(status.severity(), crate::status::Severity::Warning);

        action.undo(&mut context, state);
        assert!(context.source_bundles().is_empty());
    }
}
