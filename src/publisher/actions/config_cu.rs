//! Publishing action for configuration units
//!
//! Consumes the config advice accumulated by earlier actions (product
//! descriptors, harvested config.ini files) for one platform and emits the
//! configuration units: per-bundle fragments carrying start-level
//! instructions, plus one unit carrying launcher arguments and framework
//! properties.

use std::collections::BTreeMap;

use crate::metadata::capability::namespaces;
use crate::metadata::iu::InstallableUnit;
use crate::metadata::props;
use crate::metadata::requirement::Requirement;
use crate::metadata::touchpoint_data::TouchpointType;
use crate::model::bundle_info::{BundleInfo, NO_LEVEL};
use crate::model::config_spec::ConfigSpec;
use crate::publisher::actions::{PublisherAction, config_spec_filter};
use crate::publisher::info::PublisherInfo;
use crate::publisher::result::{IuKind, PublisherResult};
use crate::status::Status;
use crate::ui::Reporter;
use crate::version::{Version, VersionRange};

pub struct ConfigCuAction {
    config_spec: ConfigSpec,
}

impl ConfigCuAction {
    pub fn new(config_spec: ConfigSpec) -> Self {
        ConfigCuAction { config_spec }
    }

    fn cu_prefix(&self) -> String {
        format!("tooling.{}", self.config_spec)
    }
}

impl PublisherAction for ConfigCuAction {
    fn name(&self) -> &str {
        "config-units"
    }

    fn perform(
        &self,
        info: &mut PublisherInfo,
        result: &mut PublisherResult,
        reporter: &mut dyn Reporter,
    ) -> Status {
        let advice = info.advice().config_advice(&self.config_spec);
        if advice.is_empty() {
            reporter.info(&format!("no config advice for {}", self.config_spec));
            return Status::ok();
        }

        // Merge every applicable advice: arguments append in registration
        // order, properties and bundle entries later-wins.
        let mut bundles: Vec<BundleInfo> = Vec::new();
        let mut properties: BTreeMap<String, String> = BTreeMap::new();
        let mut jvm_args: Vec<String> = Vec::new();
        let mut program_args: Vec<String> = Vec::new();
        for piece in advice {
            for bundle in &piece.bundles {
                bundles.retain(|b| !b.same_bundle(bundle));
                bundles.push(bundle.clone());
            }
            properties.extend(piece.properties.clone());
            jvm_args.extend(piece.jvm_args.iter().cloned());
            program_args.extend(piece.program_args.iter().cloned());
        }

        let version = Version::new(1, 0, 0);
        for bundle in &bundles {
            if bundle.start_level == NO_LEVEL && !bundle.marked_as_started {
                continue;
            }
            let unit = bundle_cu(&self.cu_prefix(), bundle, &self.config_spec, &version);
            result.add_iu(unit, IuKind::NonRoot);
        }

        if !jvm_args.is_empty() || !program_args.is_empty() || !properties.is_empty() {
            let unit = config_unit(
                &self.cu_prefix(),
                &self.config_spec,
                &version,
                &jvm_args,
                &program_args,
                &properties,
            );
            result.add_iu(unit, IuKind::Root);
        }

        Status::ok()
    }
}

/// A fragment over one bundle that configures its start level.
fn bundle_cu(
    prefix: &str,
    bundle: &BundleInfo,
    config_spec: &ConfigSpec,
    version: &Version,
) -> InstallableUnit {
    let mut configure = String::new();
    let mut unconfigure = String::new();
    if bundle.start_level != NO_LEVEL {
        configure.push_str(&format!("setStartLevel(startLevel:{});", bundle.start_level));
        unconfigure.push_str(&format!("setStartLevel(startLevel:{NO_LEVEL});"));
    }
    if bundle.marked_as_started {
        configure.push_str("markStarted(started:true);");
        unconfigure.push_str("markStarted(started:false);");
    }

    let mut builder = InstallableUnit::builder(
        format!("{prefix}.{}", bundle.symbolic_name),
        version.clone(),
    )
    .touchpoint_type(TouchpointType::osgi())
    .filter(config_spec_filter(config_spec))
    .property(props::TYPE_FRAGMENT, "true");
    builder.add_host_requirement(Requirement::new(
        namespaces::OSGI_BUNDLE,
        &bundle.symbolic_name,
        VersionRange::any(),
    ));
    builder.add_requirement(Requirement::new(
        namespaces::OSGI_BUNDLE,
        &bundle.symbolic_name,
        VersionRange::any(),
    ));
    builder.add_touchpoint_instruction("configure", &configure);
    builder.add_touchpoint_instruction("unconfigure", &unconfigure);
    builder.build()
}

/// The platform configuration unit carrying launcher arguments and
/// framework properties.
fn config_unit(
    prefix: &str,
    config_spec: &ConfigSpec,
    version: &Version,
    jvm_args: &[String],
    program_args: &[String],
    properties: &BTreeMap<String, String>,
) -> InstallableUnit {
    let mut configure = String::new();
    let mut unconfigure = String::new();
    for arg in jvm_args {
        configure.push_str(&format!("addJvmArg(jvmArg:{arg});"));
        unconfigure.push_str(&format!("removeJvmArg(jvmArg:{arg});"));
    }
    for arg in program_args {
        configure.push_str(&format!("addProgramArg(programArg:{arg});"));
        unconfigure.push_str(&format!("removeProgramArg(programArg:{arg});"));
    }
    for (name, value) in properties {
        configure.push_str(&format!("setProgramProperty(propName:{name},propValue:{value});"));
        unconfigure.push_str(&format!("setProgramProperty(propName:{name},propValue:);"));
    }

    let mut builder = InstallableUnit::builder(format!("{prefix}.config"), version.clone())
        .touchpoint_type(TouchpointType::osgi())
        .filter(config_spec_filter(config_spec));
    builder.add_touchpoint_instruction("configure", &configure);
    builder.add_touchpoint_instruction("unconfigure", &unconfigure);
    builder.build()
}
