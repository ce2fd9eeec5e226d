//! Apply command implementation
//!
//! Loads the installation through a manipulator, resolves the plan's
//! operands through the default action registry, and persists whatever
//! committed. Rolled-back operands leave no trace in the saved state.

use crate::cli::ApplyArgs;
use crate::error::{ProvisorError, Result};
use crate::manipulator::Manipulator;
use crate::profile::Profile;
use crate::repository::ArtifactRepository;
use crate::status::Severity;
use crate::touchpoint::{
    ActionContext, ActionRegistry, Engine, OperandPhase, ProvisioningPlan, merged_status,
};
use crate::ui::ConsoleReporter;

pub fn run(args: ApplyArgs, verbose: bool) -> Result<()> {
    if args.list_actions {
        let registry = ActionRegistry::with_defaults();
        for id in registry.ids() {
            println!("{id}");
        }
        return Ok(());
    }

    let Some(plan_path) = &args.plan else {
        return Err(ProvisorError::PlanParseFailed {
            path: "<none>".to_string(),
            reason: "a plan file is required unless --list-actions is given".to_string(),
        });
    };
    let Some(install_dir) = &args.install_dir else {
        return Err(ProvisorError::IoError {
            message: "--install-dir is required to apply a plan".to_string(),
        });
    };

    let plan = ProvisioningPlan::load(plan_path)?;
    let mut profile = Profile::for_installation(plan.profile_id(), install_dir);
    if let Some(repo) = &args.artifact_repo {
        let repository = ArtifactRepository::load(repo)?;
        profile.register_repository(&repository);
    }

    let mut reporter =
        ConsoleReporter::new(verbose).with_steps(plan.operands.len() as u64);
    let mut manipulator = Manipulator::for_installation(install_dir);
    manipulator.load(&mut reporter)?;

    let registry = ActionRegistry::with_defaults();
    let mut context = ActionContext::new(manipulator, profile);
    let results = Engine::new(&registry).run(&plan.operands, &mut context, &mut reporter);

    // Committed operands persist even when a later one rolled back.
    context.manipulator.save(args.backup)?;
    reporter.finish();

    let mut failed = 0;
    for result in &results {
        let phase = match result.phase {
            OperandPhase::Committed => "committed",
            OperandPhase::RolledBack => {
                failed += 1;
                "rolled back"
            }
            OperandPhase::Pending => "not run",
        };
        if verbose || result.phase != OperandPhase::Committed {
            println!("{:<12} {}", phase, result.operand);
        }
    }
    let status = merged_status(&results);
    for child in status.children() {
        if child.severity() >= Severity::Warning {
            eprintln!("{child}");
        }
    }
    if status.is_error() {
        return Err(ProvisorError::ActionFailed {
            action: "apply".to_string(),
            message: format!("{failed} of {} operands failed", results.len()),
        });
    }
    println!("Applied {} operands to {}", results.len(), install_dir.display());
    Ok(())
}
