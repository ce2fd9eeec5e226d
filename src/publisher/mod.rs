//! The publishing pipeline
//!
//! A [`Publisher`] runs an ordered list of actions against shared
//! [`PublisherInfo`] and [`PublisherResult`] state. Every action runs even
//! when an earlier one failed; statuses are merged and the combined units
//! reach the metadata repository only when no action errored. Cancellation
//! is polled between actions: a canceled run keeps what finished and rolls
//! nothing back.

pub mod actions;
pub mod info;
pub mod result;

pub use actions::PublisherAction;
pub use info::{ArtifactMode, PublisherInfo};
pub use result::{IuKind, MergePolicy, PublisherResult};

use crate::error::Result;
use crate::status::{MultiStatus, Status};
use crate::ui::Reporter;

pub struct Publisher {
    info: PublisherInfo,
    actions: Vec<Box<dyn PublisherAction>>,
}

impl Publisher {
    pub fn new(info: PublisherInfo) -> Self {
        Publisher {
            info,
            actions: Vec::new(),
        }
    }

    pub fn add_action(&mut self, action: Box<dyn PublisherAction>) {
        self.actions.push(action);
    }

    pub fn with_action(mut self, action: Box<dyn PublisherAction>) -> Self {
        self.add_action(action);
        self
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    pub fn info(&self) -> &PublisherInfo {
        &self.info
    }

    /// Run the pipeline. Returns the merged status and the result; the
    /// caller inspects the status for warnings and errors.
    pub fn run(&mut self, reporter: &mut dyn Reporter) -> Result<(Status, PublisherResult)> {
        let mut result = PublisherResult::new();
        let mut multi = MultiStatus::new("publishing");

        for action in &self.actions {
            if reporter.is_canceled() {
                multi.add(Status::cancel(format!(
                    "canceled before action '{}'",
                    action.name()
                )));
                break;
            }
            reporter.begin_task(action.name());
            let status = action.perform(&mut self.info, &mut result, reporter);
            if !status.is_ok() {
                reporter.info(&format!("action '{}': {status}", action.name()));
            }
            multi.add(status);
        }

        if !multi.is_error() {
            self.commit(&result)?;
        }

        Ok((multi.into_status(), result))
    }

    /// Write the run's units and artifacts into the configured
    /// repositories.
    fn commit(&mut self, result: &PublisherResult) -> Result<()> {
        if let Some(repository) = self.info.metadata_repository_mut() {
            repository.add_units(result.all_ius().cloned());
            repository.save()?;
        }
        if let Some(repository) = self.info.artifact_repository_mut() {
            repository.save()?;
        }
        Ok(())
    }
}
