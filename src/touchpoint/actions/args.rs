//! Launcher argument actions: addProgramArg, removeProgramArg, addJvmArg,
//! removeJvmArg
//!
//! Program-argument undo carries a historical asymmetry: undoing an add
//! only removes tokens that look like flags (leading `-`), because a value
//! token that followed a flag is not independently addressable in the
//! argument list. This is a known limitation kept on purpose; the JVM
//! argument pair has no such rule.

use crate::status::Status;
use crate::touchpoint::actions::{ActionContext, TouchpointAction};
use crate::touchpoint::params::Parameters;
use crate::touchpoint::undo::UndoState;

const PARAM_PROGRAM_ARG: &str = "programArg";
const PARAM_JVM_ARG: &str = "jvmArg";

pub struct AddProgramArgAction;

impl TouchpointAction for AddProgramArgAction {
    fn id(&self) -> &str {
        "addProgramArg"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let arg = match params.required(PARAM_PROGRAM_ARG, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        if context.manipulator.launcher_data_mut().add_program_arg(&arg) {
            (Status::ok(), UndoState::AddedProgramArg { arg })
        } else {
            (Status::ok(), UndoState::None)
        }
    }

    fn undo(&self, context: &mut ActionContext, state: UndoState) {
        // Only flag tokens are removable; see the module docs.
        if let UndoState::AddedProgramArg { arg } = state
            && arg.starts_with('-')
        {
            context.manipulator.launcher_data_mut().remove_program_arg(&arg);
        }
    }
}

pub struct RemoveProgramArgAction;

impl TouchpointAction for RemoveProgramArgAction {
    fn id(&self) -> &str {
        "removeProgramArg"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let arg = match params.required(PARAM_PROGRAM_ARG, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        let removed = context.manipulator.launcher_data_mut().remove_program_arg(&arg);
        (Status::ok(), UndoState::RemovedProgramArg { arg, removed })
    }

    fn undo(&self, context: &mut ActionContext, state: UndoState) {
        if let UndoState::RemovedProgramArg { arg, removed: true } = state {
            context.manipulator.launcher_data_mut().add_program_arg(arg);
        }
    }
}

pub struct AddJvmArgAction;

impl TouchpointAction for AddJvmArgAction {
    fn id(&self) -> &str {
        "addJvmArg"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let arg = match params.required(PARAM_JVM_ARG, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        if context.manipulator.launcher_data_mut().add_jvm_arg(&arg) {
            (Status::ok(), UndoState::AddedJvmArg { arg })
        } else {
            (Status::ok(), UndoState::None)
        }
    }

    fn undo(&self, context: &mut ActionContext, state: UndoState) {
        if let UndoState::AddedJvmArg { arg } = state {
            context.manipulator.launcher_data_mut().remove_jvm_arg(&arg);
        }
    }
}

pub struct RemoveJvmArgAction;

impl TouchpointAction for RemoveJvmArgAction {
    fn id(&self) -> &str {
        "removeJvmArg"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let arg = match params.required(PARAM_JVM_ARG, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        let removed = context.manipulator.launcher_data_mut().remove_jvm_arg(&arg);
        (Status::ok(), UndoState::RemovedJvmArg { arg, removed })
    }

    fn undo(&self, context: &mut ActionContext, state: UndoState) {
        if let UndoState::RemovedJvmArg { arg, removed: true } = state {
            context.manipulator.launcher_data_mut().add_jvm_arg(arg);
        }
    }
}
