//! The touchpoint action set
//!
//! Every named action is a [`TouchpointAction`]: given a resolved parameter
//! map and the shared [`ActionContext`], `execute` mutates the installation
//! state and returns the typed undo state its `undo` needs to restore it.
//! Actions never touch global state; everything they may change lives in
//! the context.
//!
//! The registry is plain data built at startup and passed by reference.
//! There is no static id table; callers either take
//! [`ActionRegistry::with_defaults`] or register their own set.

pub mod args;
pub mod bundle;
pub mod feature;
pub mod filesystem;
pub mod properties;
pub mod repository;
pub mod source;

use std::collections::BTreeMap;

use crate::error::{ProvisorError, Result};
use crate::manipulator::Manipulator;
use crate::model::BundleInfo;
use crate::profile::Profile;
use crate::status::Status;
use crate::touchpoint::params::Parameters;
use crate::touchpoint::undo::UndoState;
use crate::version::Version;

/// A feature tracked by the installation, by id and version.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureReference {
    pub id: String,
    pub version: Version,
}

/// The mutable installation state actions operate on.
///
/// Owns the manipulator for the run; the caller takes it back (or saves
/// through it) once the engine is done.
pub struct ActionContext {
    pub manipulator: Manipulator,
    pub profile: Profile,
    features: Vec<FeatureReference>,
    repositories: Vec<String>,
    source_bundles: Vec<BundleInfo>,
}

impl ActionContext {
    pub fn new(manipulator: Manipulator, profile: Profile) -> Self {
        ActionContext {
            manipulator,
            profile,
            features: Vec::new(),
            repositories: Vec::new(),
            source_bundles: Vec::new(),
        }
    }

    pub fn features(&self) -> &[FeatureReference] {
        &self.features
    }

    pub fn repositories(&self) -> &[String] {
        &self.repositories
    }

    pub fn source_bundles(&self) -> &[BundleInfo] {
        &self.source_bundles
    }
}

/// One reversible, named configuration mutation.
pub trait TouchpointAction {
    /// The id instructions invoke this action by.
    fn id(&self) -> &str;

    /// Apply the action. An error-severity status aborts the operand and
    /// the engine rolls back what already ran; a warning lets the operand
    /// proceed. The returned [`UndoState`] is whatever [`Self::undo`]
    /// needs, [`UndoState::None`] when there is nothing to restore.
    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState);

    /// Revert a previous `execute`, consuming the state it returned. Undo
    /// is best effort and must tolerate a state variant it did not
    /// produce (by ignoring it).
    fn undo(&self, context: &mut ActionContext, state: UndoState);
}

/// The id -> action map the engine resolves invocations through.
pub struct ActionRegistry {
    actions: BTreeMap<String, Box<dyn TouchpointAction>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        ActionRegistry {
            actions: BTreeMap::new(),
        }
    }

    /// A registry holding the full built-in action set.
    pub fn with_defaults() -> Self {
        let mut registry = ActionRegistry::new();
        for action in default_actions() {
            registry.insert(action);
        }
        registry
    }

    fn insert(&mut self, action: Box<dyn TouchpointAction>) {
        self.actions.insert(action.id().to_string(), action);
    }

    /// Register an action under its id. Registering an id twice is a
    /// configuration error, not a silent override.
    pub fn register(&mut self, action: Box<dyn TouchpointAction>) -> Result<()> {
        if self.actions.contains_key(action.id()) {
            return Err(ProvisorError::DuplicateAction {
                action_id: action.id().to_string(),
            });
        }
        self.insert(action);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&dyn TouchpointAction> {
        self.actions.get(id).map(Box::as_ref)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        ActionRegistry::new()
    }
}

fn default_actions() -> Vec<Box<dyn TouchpointAction>> {
    vec![
        Box::new(bundle::InstallBundleAction),
        Box::new(bundle::UninstallBundleAction),
        Box::new(bundle::SetStartLevelAction),
        Box::new(bundle::MarkStartedAction),
        Box::new(args::AddProgramArgAction),
        Box::new(args::RemoveProgramArgAction),
        Box::new(args::AddJvmArgAction),
        Box::new(args::RemoveJvmArgAction),
        Box::new(properties::SetFwIndependentPropAction),
        Box::new(properties::SetProgramPropertyAction),
        Box::new(filesystem::ChmodAction),
        Box::new(filesystem::LnAction),
        Box::new(filesystem::MkdirAction),
        Box::new(filesystem::RmdirAction),
        Box::new(feature::InstallFeatureAction),
        Box::new(feature::UninstallFeatureAction),
        Box::new(repository::AddRepositoryAction),
        Box::new(repository::RemoveRepositoryAction),
        Box::new(source::AddSourceBundleAction),
        Box::new(source::RemoveSourceBundleAction),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_the_full_action_set() {
        let registry = ActionRegistry::with_defaults();
        assert_eq!(registry.len(), 20);
        for id in [
            "installBundle",
            "uninstallBundle",
            "setStartLevel",
            "markStarted",
            "addProgramArg",
            "removeProgramArg",
            "addJvmArg",
            "removeJvmArg",
            "setFwIndependentProp",
            "setProgramProperty",
            "chmod",
            "ln",
            "mkdir",
            "rmdir",
            "installFeature",
            "uninstallFeature",
            "addRepository",
            "removeRepository",
            "addSourceBundle",
            "removeSourceBundle",
        ] {
            assert!(registry.get(id).is_some(), "missing action {id}");
        }
    }

    #[test]
    fn test_register_rejects_duplicate_id() {
        let mut registry = ActionRegistry::with_defaults();
        let err = registry
            .register(Box::new(bundle::InstallBundleAction))
            .unwrap_err();
        assert!(matches!(
            err,
            ProvisorError::DuplicateAction { ref action_id } if action_id == "installBundle"
        ));
    }

    #[test]
    fn test_unknown_id_is_none() {
        let registry = ActionRegistry::with_defaults();
        assert!(registry.get("frobnicate").is_none());
    }
}
