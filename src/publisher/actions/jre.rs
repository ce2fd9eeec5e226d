//! Publishing action for the JRE unit
//!
//! Publishes the `a.jre` unit that stands in for the Java runtime: it
//! provides the `java.package` capabilities bundles import from the boot
//! classpath, so their requirements resolve without a real JRE in the
//! repository.

use crate::metadata::capability::{ProvidedCapability, namespaces};
use crate::metadata::iu::InstallableUnit;
use crate::metadata::touchpoint_data::TouchpointType;
use crate::publisher::actions::{PublisherAction, apply_unit_advice};
use crate::publisher::info::PublisherInfo;
use crate::publisher::result::{IuKind, PublisherResult};
use crate::status::Status;
use crate::ui::Reporter;
use crate::version::Version;

/// Unit id of the synthetic JRE unit.
pub const JRE_IU_ID: &str = "a.jre";

/// Boot classpath packages the synthetic JRE provides.
const SYSTEM_PACKAGES: &[&str] = &[
    "java.lang",
    "java.lang.reflect",
    "java.io",
    "java.net",
    "java.nio",
    "java.nio.file",
    "java.text",
    "java.time",
    "java.util",
    "java.util.concurrent",
    "java.util.function",
    "java.util.regex",
    "javax.crypto",
    "javax.net",
    "javax.net.ssl",
];

pub struct JreAction {
    version: Version,
}

impl JreAction {
    /// `version` is the Java platform version, e.g. `17.0.0`.
    pub fn new(version: Version) -> Self {
        JreAction { version }
    }
}

impl PublisherAction for JreAction {
    fn name(&self) -> &str {
        "jre"
    }

    fn perform(
        &self,
        info: &mut PublisherInfo,
        result: &mut PublisherResult,
        reporter: &mut dyn Reporter,
    ) -> Status {
        if result.contains(JRE_IU_ID, &self.version) {
            reporter.info("jre unit already published");
            return Status::ok();
        }

        let mut builder = InstallableUnit::builder(JRE_IU_ID, self.version.clone())
            .singleton(true)
            .touchpoint_type(TouchpointType::native());
        for package in SYSTEM_PACKAGES {
            builder.add_capability(ProvidedCapability::new(
                namespaces::JAVA_PACKAGE,
                *package,
                self.version.clone(),
            ));
        }
        apply_unit_advice(&mut builder, info);

        result.add_iu(builder.build(), IuKind::NonRoot);
        Status::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::SilentReporter;

    #[test]
    fn test_publishes_java_package_capabilities() {
        let action = JreAction::new(Version::new(17, 0, 0));
        let mut info = PublisherInfo::new();
        let mut result = PublisherResult::new();
        let status = action.perform(&mut info, &mut result, &mut SilentReporter::new());

        assert!(status.is_ok());
        let unit = result.get(JRE_IU_ID, &Version::new(17, 0, 0)).unwrap();
        assert!(
            unit.provided
                .iter()
                .any(|c| c.namespace == namespaces::JAVA_PACKAGE && c.name == "java.util")
        );
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let action = JreAction::new(Version::new(17, 0, 0));
        let mut info = PublisherInfo::new();
        let mut result = PublisherResult::new();
        let mut reporter = SilentReporter::new();
        action.perform(&mut info, &mut result, &mut reporter);
        action.perform(&mut info, &mut result, &mut reporter);
        assert_eq!(result.len(), 1);
    }
}
