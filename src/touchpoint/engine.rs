//! The provisioning engine
//!
//! Applies operands (unit identity + optional artifact + instructions) to
//! an [`ActionContext`] through the action registry. Each operand moves
//! through PENDING -> EXECUTED -> (COMMITTED | ROLLED_BACK): its
//! instructions run in order stacking typed undo states; when they all
//! succeed the operand commits and the stack is discarded, when one fails
//! the stack unwinds newest-first and the operand lands rolled back.
//! Operands are independent transactions: a failed operand never touches
//! what earlier operands committed, and later operands still run.
//!
//! Cancellation is polled between operands. A canceled run keeps the
//! operands that committed and rolls nothing back; callers must treat it
//! as a partial result.

use serde::{Deserialize, Serialize};

use crate::error::ProvisorError;
use crate::metadata::artifact_key::{ArtifactKey, CLASSIFIER_OSGI_BUNDLE};
use crate::metadata::iu::InstallableUnit;
use crate::status::{MultiStatus, Severity, Status};
use crate::touchpoint::actions::bundle::{PARAM_BUNDLE_SYMBOLIC_NAME, PARAM_BUNDLE_VERSION};
use crate::touchpoint::actions::{ActionContext, ActionRegistry};
use crate::touchpoint::instruction::{self, Invocation};
use crate::touchpoint::params;
use crate::touchpoint::undo::UndoState;
use crate::ui::Reporter;
use crate::version::Version;

/// Where an operand ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandPhase {
    /// Never started (the run was canceled first).
    Pending,
    /// All instructions ran and the undo stack was discarded.
    Committed,
    /// An instruction failed and everything that ran was undone.
    RolledBack,
}

/// One unit of provisioning work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operand {
    pub id: String,
    pub version: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactKey>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl Operand {
    pub fn new(id: impl Into<String>, version: Version) -> Self {
        Operand {
            id: id.into(),
            version,
            artifact: None,
            instructions: Vec::new(),
        }
    }

    /// An operand for a published unit, taking the instructions of the
    /// given phases (in that order) from its touchpoint data.
    pub fn from_unit(unit: &InstallableUnit, phases: &[&str]) -> Self {
        let instructions = phases
            .iter()
            .filter_map(|phase| unit.touchpoint_data.instruction(phase))
            .map(str::to_string)
            .collect();
        Operand {
            id: unit.id.clone(),
            version: unit.version.clone(),
            artifact: unit.artifacts.first().cloned(),
            instructions,
        }
    }

    pub fn with_artifact(mut self, artifact: ArtifactKey) -> Self {
        self.artifact = Some(artifact);
        self
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instructions.push(instruction.into());
        self
    }

    fn label(&self) -> String {
        format!("{}/{}", self.id, self.version)
    }
}

/// The outcome of one operand.
#[derive(Debug)]
pub struct OperandResult {
    pub operand: String,
    pub phase: OperandPhase,
    pub status: Status,
}

/// Merge the operand statuses of a run into one.
pub fn merged_status(results: &[OperandResult]) -> Status {
    let mut multi = MultiStatus::new("provisioning");
    for result in results {
        multi.add(result.status.clone());
    }
    multi.into_status()
}

pub struct Engine<'a> {
    registry: &'a ActionRegistry,
}

impl<'a> Engine<'a> {
    pub fn new(registry: &'a ActionRegistry) -> Self {
        Engine { registry }
    }

    /// Apply the operands in order. Never returns early: every operand
    /// gets its chance unless the run is canceled.
    pub fn run(
        &self,
        operands: &[Operand],
        context: &mut ActionContext,
        reporter: &mut dyn Reporter,
    ) -> Vec<OperandResult> {
        let mut results = Vec::with_capacity(operands.len());
        for operand in operands {
            if reporter.is_canceled() {
                results.push(OperandResult {
                    operand: operand.label(),
                    phase: OperandPhase::Pending,
                    status: Status::cancel(format!("canceled before operand {}", operand.label())),
                });
                break;
            }
            reporter.begin_task(&operand.label());
            results.push(self.run_operand(operand, context, reporter));
        }
        results
    }

    fn run_operand(
        &self,
        operand: &Operand,
        context: &mut ActionContext,
        reporter: &mut dyn Reporter,
    ) -> OperandResult {
        let label = operand.label();
        let mut multi = MultiStatus::new(label.clone());
        let mut undo_stack: Vec<(String, UndoState)> = Vec::new();
        let mut failed = false;

        'instructions: for raw in &operand.instructions {
            let invocations = match instruction::parse(raw) {
                Ok(invocations) => invocations,
                Err(e) => {
                    multi.add(Status::error(e.to_string()));
                    failed = true;
                    break;
                }
            };
            for invocation in invocations {
                let Some(action) = self.registry.get(&invocation.action_id) else {
                    let err = ProvisorError::UnknownAction {
                        action_id: invocation.action_id.clone(),
                    };
                    multi.add(Status::error(err.to_string()));
                    failed = true;
                    break 'instructions;
                };
                let raw_params = operand_params(operand, &invocation);
                let parameters =
                    match params::resolve(&raw_params, operand.artifact.as_ref(), &context.profile)
                    {
                        Ok(parameters) => parameters,
                        Err(status) => {
                            multi.add(status);
                            failed = true;
                            break 'instructions;
                        }
                    };
                let (status, state) = action.execute(context, &parameters);
                if status.is_error() {
                    multi.add(status);
                    failed = true;
                    break 'instructions;
                }
                if status.severity() == Severity::Warning {
                    reporter.warning(&format!("{label}: {}", status.message()));
                }
                multi.add(status);
                undo_stack.push((invocation.action_id, state));
            }
        }

        if failed {
            for (action_id, state) in undo_stack.into_iter().rev() {
                if let Some(action) = self.registry.get(&action_id) {
                    action.undo(context, state);
                }
            }
            return OperandResult {
                operand: label,
                phase: OperandPhase::RolledBack,
                status: multi.into_status(),
            };
        }

        // The operand was fully executed; committing discards the stack.
        OperandResult {
            operand: label,
            phase: OperandPhase::Committed,
            status: multi.into_status(),
        }
    }
}

/// The raw parameter map for one invocation: the instruction's own
/// parameters plus the engine-injected operand identity (for bundle
/// artifacts), which explicit parameters always override.
fn operand_params(
    operand: &Operand,
    invocation: &Invocation,
) -> std::collections::BTreeMap<String, String> {
    let mut raw = invocation.params.clone();
    if let Some(artifact) = &operand.artifact
        && artifact.classifier == CLASSIFIER_OSGI_BUNDLE
    {
        raw.entry(PARAM_BUNDLE_SYMBOLIC_NAME.to_string())
            .or_insert_with(|| artifact.id.clone());
        raw.entry(PARAM_BUNDLE_VERSION.to_string())
            .or_insert_with(|| artifact.version.to_string());
    }
    raw
}
