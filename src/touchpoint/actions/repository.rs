//! Repository reference actions: addRepository, removeRepository
//!
//! The tracked repository list is plain locations (paths or URLs) on the
//! context; ordering is preserved, duplicates are not kept.

use crate::status::Status;
use crate::touchpoint::actions::{ActionContext, TouchpointAction};
use crate::touchpoint::params::Parameters;
use crate::touchpoint::undo::UndoState;

const PARAM_LOCATION: &str = "location";

pub struct AddRepositoryAction;

impl TouchpointAction for AddRepositoryAction {
    fn id(&self) -> &str {
        "addRepository"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let location = match params.required(PARAM_LOCATION, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        let added = !context.repositories.contains(&location);
        if added {
            context.repositories.push(location.clone());
        }
        (Status::ok(), UndoState::AddedRepository { location, added })
    }

    fn undo(&self, context: &mut ActionContext, state: UndoState) {
        if let UndoState::AddedRepository {
            location,
            added: true,
        } = state
        {
            context.repositories.retain(|r| *r != location);
        }
    }
}

pub struct RemoveRepositoryAction;

impl TouchpointAction for RemoveRepositoryAction {
    fn id(&self) -> &str {
        "removeRepository"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let location = match params.required(PARAM_LOCATION, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        let before = context.repositories.len();
        context.repositories.retain(|r| *r != location);
        let removed = context.repositories.len() != before;
        let status = if removed {
            Status::ok()
        } else {
            Status::warning(format!("repository {location} is not tracked"))
        };
        (status, UndoState::RemovedRepository { location, removed })
    }

    fn undo(&self, context: &mut ActionContext, state: UndoState) {
        if let UndoState::RemovedRepository {
            location,
            removed: true,
        } = state
        {
            context.repositories.push(location);
        }
    }
}
