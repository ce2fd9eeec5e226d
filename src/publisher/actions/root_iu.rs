//! Publishing action for the aggregate root unit
//!
//! Runs last: gathers every ROOT unit already in the result and publishes
//! one group unit that requires each of them pinned to its exact version.
//! Installing the root unit therefore installs the whole published set.

use crate::metadata::iu::InstallableUnit;
use crate::metadata::props;
use crate::metadata::requirement::Requirement;
use crate::publisher::actions::{PublisherAction, apply_unit_advice};
use crate::publisher::info::PublisherInfo;
use crate::publisher::result::{IuKind, PublisherResult};
use crate::status::Status;
use crate::ui::Reporter;
use crate::version::Version;

pub struct RootIuAction {
    id: String,
    version: Version,
    name: Option<String>,
}

impl RootIuAction {
    pub fn new(id: impl Into<String>, version: Version) -> Self {
        RootIuAction {
            id: id.into(),
            version,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl PublisherAction for RootIuAction {
    fn name(&self) -> &str {
        "root-iu"
    }

    fn perform(
        &self,
        info: &mut PublisherInfo,
        result: &mut PublisherResult,
        reporter: &mut dyn Reporter,
    ) -> Status {
        if result.contains(&self.id, &self.version) {
            reporter.info(&format!("root unit {} already published", self.id));
            return Status::ok();
        }

        let mut builder = InstallableUnit::builder(&self.id, self.version.clone())
            .singleton(true)
            .property(props::TYPE_GROUP, "true");
        if let Some(name) = &self.name {
            builder.set_property(props::NAME, name.clone());
        }
        // Pin each root to the exact published version.
        for unit in result.root_ius() {
            builder.add_requirement(Requirement::exact(&unit.id, unit.version.clone()));
        }
        apply_unit_advice(&mut builder, info);

        result.add_iu(builder.build(), IuKind::Root);
        Status::ok()
    }
}
