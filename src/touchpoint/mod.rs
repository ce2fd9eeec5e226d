//! The touchpoint action engine
//!
//! Translates generic provisioning operands into concrete mutations of an
//! installation: instructions parse into action invocations, parameters
//! resolve against the profile (`@artifact`, `@ignore`), the registry maps
//! action ids to implementations, and the engine drives each operand
//! through its commit-or-rollback life cycle with typed undo state.

pub mod actions;
pub mod engine;
pub mod instruction;
pub mod params;
pub mod plan;
pub mod undo;

pub use actions::{ActionContext, ActionRegistry, TouchpointAction};
pub use engine::{Engine, Operand, OperandPhase, OperandResult, merged_status};
pub use params::Parameters;
pub use plan::ProvisioningPlan;
pub use undo::UndoState;
