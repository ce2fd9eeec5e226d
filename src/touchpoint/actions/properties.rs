//! Property actions: setFwIndependentProp, setProgramProperty
//!
//! Both write through [`crate::model::ConfigData`]'s property store, which
//! routes keys to the framework-dependent or -independent partition by
//! their prefix. `setProgramProperty` with an empty `propValue` removes
//! the property; `setFwIndependentProp` always sets.

use crate::status::Status;
use crate::touchpoint::actions::{ActionContext, TouchpointAction};
use crate::touchpoint::params::Parameters;
use crate::touchpoint::undo::UndoState;

const PARAM_PROP_NAME: &str = "propName";
const PARAM_PROP_VALUE: &str = "propValue";

fn restore(context: &mut ActionContext, key: String, previous: Option<String>) {
    match previous {
        Some(value) => {
            context.manipulator.config_data_mut().set_property(&key, value);
        }
        None => {
            context.manipulator.config_data_mut().remove_property(&key);
        }
    }
}

pub struct SetFwIndependentPropAction;

impl TouchpointAction for SetFwIndependentPropAction {
    fn id(&self) -> &str {
        "setFwIndependentProp"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let key = match params.required(PARAM_PROP_NAME, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        let value = match params.required(PARAM_PROP_VALUE, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        let previous = context.manipulator.config_data_mut().set_property(&key, value);
        (Status::ok(), UndoState::Property { key, previous })
    }

    fn undo(&self, context: &mut ActionContext, state: UndoState) {
        if let UndoState::Property { key, previous } = state {
            restore(context, key, previous);
        }
    }
}

pub struct SetProgramPropertyAction;

impl TouchpointAction for SetProgramPropertyAction {
    fn id(&self) -> &str {
        "setProgramProperty"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let key = match params.required(PARAM_PROP_NAME, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        // Empty (or absent) value clears the property.
        let value = params.get(PARAM_PROP_VALUE).unwrap_or("");
        let previous = if value.is_empty() {
            context.manipulator.config_data_mut().remove_property(&key)
        } else {
            context
                .manipulator
                .config_data_mut()
                .set_property(&key, value.to_string())
        };
        (Status::ok(), UndoState::Property { key, previous })
    }

    fn undo(&self, context: &mut ActionContext, state: UndoState) {
        if let UndoState::Property { key, previous } = state {
            restore(context, key, previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manipulator::Manipulator;
    use crate::profile::Profile;
    use std::collections::BTreeMap;

    fn context() -> ActionContext {
        ActionContext::new(Manipulator::new(), Profile::new("test"))
    }

    fn params(pairs: &[(&str, &str)]) -> Parameters {
        Parameters::new(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    #[test]
    fn test_set_fw_independent_prop_round_trip() {
        let mut context = context();
        let action = SetFwIndependentPropAction;
        let (status, state) = action.execute(
            &mut context,
            &params(&[(PARAM_PROP_NAME, "my.app.mode"), (PARAM_PROP_VALUE, "fast")]),
        );
        assert!(status.is_ok());
        assert_eq!(
            context.manipulator.config_data().get_property("my.app.mode"),
            Some("fast")
        );

        // The key was absent before, so undo removes it entirely.
        action.undo(&mut context, state);
        assert!(context.manipulator.config_data().get_property("my.app.mode").is_none());
    }

    #[test]
    fn test_undo_restores_previous_value() {
        let mut context = context();
        context.manipulator.config_data_mut().set_property("my.app.mode", "slow");

        let action = SetFwIndependentPropAction;
        let (_, state) = action.execute(
            &mut context,
            &params(&[(PARAM_PROP_NAME, "my.app.mode"), (PARAM_PROP_VALUE, "fast")]),
        );
        action.undo(&mut context, state);
        assert_eq!(
            context.manipulator.config_data().get_property("my.app.mode"),
            Some("slow")
        );
    }

    #[test]
    fn test_set_program_property_empty_value_removes() {
        let mut context = context();
        context
            .manipulator
            .config_data_mut()
            .set_property("eclipse.ignoreApp", "true");

        let action = SetProgramPropertyAction;
        let (status, state) = action.execute(
            &mut context,
            &params(&[(PARAM_PROP_NAME, "eclipse.ignoreApp"), (PARAM_PROP_VALUE, "")]),
        );
        assert!(status.is_ok());
        assert!(
            context
                .manipulator
                .config_data()
                .get_property("eclipse.ignoreApp")
                .is_none()
        );

        action.undo(&mut context, state);
        assert_eq!(
            context.manipulator.config_data().get_property("eclipse.ignoreApp"),
            Some("true")
        );
    }

    #[test]
    fn test_set_program_property_sets_value() {
        let mut context = context();
        let action = SetProgramPropertyAction;
        let (status, _) = action.execute(
            &mut context,
            &params(&[(PARAM_PROP_NAME, "eclipse.ignoreApp"), (PARAM_PROP_VALUE, "true")]),
        );
        assert!(status.is_ok());
        assert_eq!(
            context.manipulator.config_data().get_property("eclipse.ignoreApp"),
            Some("true")
        );
    }

    #[test]
    fn test_missing_prop_name_is_error() {
        let mut context = context();
        let (status, _) =
            SetProgramPropertyAction.execute(&mut context, &params(&[(PARAM_PROP_VALUE, "x")]));
        assert!(status.is_error());
        assert!(status.message().contains("propName"));
    }
}
