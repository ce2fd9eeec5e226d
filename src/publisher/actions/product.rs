//! Publishing action for products
//!
//! Translates a product descriptor into the product's root unit and seeds
//! the advice registry with the product's launcher arguments and bundle
//! start levels, which the configuration action later turns into
//! configuration units.

use std::path::PathBuf;

use crate::advice::{Advice, AdviceScope, ConfigAdvice};
use crate::descriptor::feature::group_id;
use crate::descriptor::product::Product;
use crate::metadata::iu::InstallableUnit;
use crate::metadata::props;
use crate::metadata::requirement::Requirement;
use crate::model::bundle_info::BundleInfo;
use crate::model::config_spec::ConfigSpec;
use crate::publisher::actions::{PublisherAction, apply_unit_advice};
use crate::publisher::info::PublisherInfo;
use crate::publisher::result::{IuKind, PublisherResult};
use crate::status::Status;
use crate::ui::Reporter;
use crate::version::{Version, VersionRange};

pub struct ProductAction {
    descriptor_path: PathBuf,
}

impl ProductAction {
    pub fn new(descriptor_path: impl Into<PathBuf>) -> Self {
        ProductAction {
            descriptor_path: descriptor_path.into(),
        }
    }
}

impl PublisherAction for ProductAction {
    fn name(&self) -> &str {
        "product"
    }

    fn perform(
        &self,
        info: &mut PublisherInfo,
        result: &mut PublisherResult,
        reporter: &mut dyn Reporter,
    ) -> Status {
        let product = match Product::load(&self.descriptor_path) {
            Ok(product) => product,
            // A missing or malformed product file stops this action only.
            Err(e) => return Status::error(e.to_string()),
        };

        if result.contains(&product.id, &product.version) {
            reporter.info(&format!(
                "product {} {} already published",
                product.id, product.version
            ));
            return Status::ok();
        }

        register_config_advice(info, &product);

        let mut builder = InstallableUnit::builder(&product.id, product.version.clone())
            .singleton(true)
            .property(props::TYPE_GROUP, "true");
        if let Some(name) = &product.name {
            builder.set_property(props::NAME, name.clone());
        }
        for entry in product.contents() {
            let target = if product.use_features {
                group_id(&entry.id)
            } else {
                entry.id.clone()
            };
            let range = match &entry.version {
                Some(version) => VersionRange::exact(version.clone()),
                None => VersionRange::any(),
            };
            builder.add_requirement(Requirement::on_iu(target, range));
        }
        apply_unit_advice(&mut builder, info);

        result.add_iu(builder.build(), IuKind::Root);
        Status::ok()
    }
}

/// Seed launcher arguments, configuration properties and bundle start
/// levels as config advice for every targeted platform.
fn register_config_advice(info: &mut PublisherInfo, product: &Product) {
    let bundles: Vec<BundleInfo> = product
        .start_levels
        .iter()
        .map(|sl| {
            BundleInfo::new(&sl.id, Version::zero(), String::new())
                .with_start_level(sl.start_level)
                .with_started(sl.auto_start)
        })
        .collect();

    if bundles.is_empty()
        && product.program_args.is_empty()
        && product.jvm_args.is_empty()
        && product.properties.is_empty()
    {
        return;
    }

    let advice = ConfigAdvice {
        config_spec: ConfigSpec::any(),
        bundles,
        properties: product.properties.clone(),
        jvm_args: product.jvm_args.clone(),
        program_args: product.program_args.clone(),
    };
    info.advice_mut()
        .add(AdviceScope::default_scope(), Advice::Config(advice));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::product::{ProductEntry, ProductStartLevel};
    use crate::ui::SilentReporter;
    use tempfile::TempDir;

    fn sample_product() -> Product {
        Product {
            id: "org.example.product".to_string(),
            version: Version::new(4, 0, 0),
            name: Some("Example".to_string()),
            launcher_name: Some("example".to_string()),
            use_features: false,
            bundles: vec![
                ProductEntry {
                    id: "org.example.core".to_string(),
                    version: Some(Version::new(1, 0, 0)),
                },
                ProductEntry {
                    id: "org.example.ui".to_string(),
                    version: None,
                },
            ],
            features: vec![],
            program_args: vec!["-consoleLog".to_string()],
            jvm_args: vec!["-Xmx512m".to_string()],
            start_levels: vec![ProductStartLevel {
                id: "org.example.core".to_string(),
                start_level: 2,
                auto_start: true,
            }],
            properties: Default::default(),
        }
    }

    fn write_product(dir: &std::path::Path, product: &Product) -> PathBuf {
        let path = dir.join("example.product.json");
        std::fs::write(&path, serde_json::to_string_pretty(product).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_product_becomes_root_unit_with_requirements() {
        let temp = TempDir::new().unwrap();
        let path = write_product(temp.path(), &sample_product());

        let action = ProductAction::new(path);
        let mut info = PublisherInfo::new();
        let mut result = PublisherResult::new();
        let status = action.perform(&mut info, &mut result, &mut SilentReporter::new());

        assert!(status.is_ok());
        let unit = result
            .get("org.example.product", &Version::new(4, 0, 0))
            .unwrap();
        assert_eq!(result.kind_of("org.example.product", &Version::new(4, 0, 0)), Some(IuKind::Root));
        let core = unit
            .requirements
            .iter()
            .find(|r| r.name == "org.example.core")
            .unwrap();
        assert_eq!(core.range.to_string(), "[1.0.0,1.0.0]");
        let ui = unit
            .requirements
            .iter()
            .find(|r| r.name == "org.example.ui")
            .unwrap();
        assert!(ui.range.includes(&Version::new(9, 9, 9)));
    }

    #[test]
    fn test_feature_mode_targets_group_units() {
        let temp = TempDir::new().unwrap();
        let mut product = sample_product();
        product.use_features = true;
        product.features = vec![ProductEntry {
            id: "org.example.feature".to_string(),
            version: None,
        }];
        let path = write_product(temp.path(), &product);

        let action = ProductAction::new(path);
        let mut info = PublisherInfo::new();
        let mut result = PublisherResult::new();
        action.perform(&mut info, &mut result, &mut SilentReporter::new());

        let unit = result
            .get("org.example.product", &Version::new(4, 0, 0))
            .unwrap();
        assert!(
            unit.requirements
                .iter()
                .any(|r| r.name == "org.example.feature.feature.group")
        );
    }

    #[test]
    fn test_config_advice_registered() {
        let temp = TempDir::new().unwrap();
        let path = write_product(temp.path(), &sample_product());

        let action = ProductAction::new(path);
        let mut info = PublisherInfo::new();
        let mut result = PublisherResult::new();
        action.perform(&mut info, &mut result, &mut SilentReporter::new());

        let advice = info
            .advice()
            .config_advice(&ConfigSpec::parse("gtk.linux.x86_64").unwrap());
        assert_eq!(advice.len(), 1);
        assert_eq!(advice[0].program_args, vec!["-consoleLog"]);
        assert_eq!(advice[0].bundles[0].start_level, 2);
    }

    #[test]
    fn test_missing_descriptor_is_error_status() {
        let action = ProductAction::new("/nonexistent/x.product.json");
        let mut info = PublisherInfo::new();
        let mut result = PublisherResult::new();
        let status = action.perform(&mut info, &mut result, &mut SilentReporter::new());
        assert!(status.is_error());
        assert!(result.is_empty());
    }
}
