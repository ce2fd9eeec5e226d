//! Publish command implementation
//!
//! Assembles the action pipeline from what the source directory actually
//! contains: a plugins/ directory feeds the bundles action, features/ the
//! features action, every *.product.json a product action. Configuration
//! units run after the products so the config advice they register is
//! visible.

use std::path::{Path, PathBuf};

use crate::cli::PublishArgs;
use crate::error::{ProvisorError, Result};
use crate::model::config_spec::ConfigSpec;
use crate::publisher::actions::{
    BundlesAction, ConfigCuAction, FeaturesAction, JreAction, ProductAction, RootFilesAction,
    RootIuAction,
};
use crate::publisher::{ArtifactMode, Publisher, PublisherInfo};
use crate::repository::{ArtifactRepository, MetadataRepository};
use crate::status::Severity;
use crate::ui::ConsoleReporter;
use crate::version::Version;

pub fn run(args: PublishArgs, verbose: bool) -> Result<()> {
    let repo_name = repository_name(&args.metadata_repo);
    let metadata = if args.append {
        MetadataRepository::load_or_create(&args.metadata_repo, &repo_name)?
    } else {
        MetadataRepository::create(&args.metadata_repo, &repo_name)
    };
    let artifact_path = args
        .artifact_repo
        .clone()
        .unwrap_or_else(|| args.metadata_repo.clone());
    let artifacts = if args.append {
        ArtifactRepository::load_or_create(&artifact_path, &repo_name)?
    } else {
        ArtifactRepository::create(&artifact_path, &repo_name)
    };

    let mut config_specs = Vec::new();
    for config in &args.configs {
        config_specs.push(ConfigSpec::parse(config)?);
    }
    let mode = if args.publish_artifacts {
        ArtifactMode::Publish
    } else {
        ArtifactMode::IndexOnly
    };
    let info = PublisherInfo::new()
        .with_config_specs(config_specs.clone())
        .with_artifact_mode(mode)
        .with_metadata_repository(metadata)
        .with_artifact_repository(artifacts);

    let mut publisher = Publisher::new(info);
    let plugins = args.source.join("plugins");
    if plugins.is_dir() {
        publisher.add_action(Box::new(BundlesAction::new(vec![plugins])));
    }
    let features = args.source.join("features");
    if features.is_dir() {
        publisher.add_action(Box::new(FeaturesAction::new(vec![features])));
    }
    for descriptor in product_descriptors(&args.source)? {
        publisher.add_action(Box::new(ProductAction::new(descriptor)));
    }
    if let Some(jre) = &args.jre {
        publisher.add_action(Box::new(JreAction::new(Version::parse(jre)?)));
    }
    let cu_specs = if config_specs.is_empty() {
        vec![ConfigSpec::any()]
    } else {
        config_specs
    };
    if let Some(root_files) = &args.root_files {
        let version = Version::parse(&args.root_version)?;
        for spec in &cu_specs {
            publisher.add_action(Box::new(RootFilesAction::new(
                &repo_name,
                version.clone(),
                root_files,
                spec.clone(),
            )));
        }
    }
    // One configuration unit pass per target platform, after the products
    // have registered their config advice.
    for spec in cu_specs {
        publisher.add_action(Box::new(ConfigCuAction::new(spec)));
    }
    if let Some(root_id) = &args.root_id {
        publisher.add_action(Box::new(RootIuAction::new(
            root_id,
            Version::parse(&args.root_version)?,
        )));
    }

    let mut reporter =
        ConsoleReporter::new(verbose).with_steps(publisher.action_count() as u64);
    let (status, result) = publisher.run(&mut reporter)?;
    reporter.finish();

    for child in status.children() {
        if child.severity() >= Severity::Warning {
            eprintln!("{child}");
        }
    }
    let roots = result.root_ius().count();
    let total = result.all_ius().count();
    if status.is_error() {
        return Err(ProvisorError::ActionFailed {
            action: "publish".to_string(),
            message: format!("{status}"),
        });
    }
    println!(
        "Published {total} units ({roots} roots) to {}",
        args.metadata_repo.display()
    );
    Ok(())
}

fn repository_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "repository".to_string())
}

/// Product descriptors directly under the source directory, sorted for a
/// deterministic action order.
fn product_descriptors(source: &Path) -> Result<Vec<PathBuf>> {
    let mut descriptors = Vec::new();
    let entries = match std::fs::read_dir(source) {
        Ok(entries) => entries,
        Err(_) => return Err(ProvisorError::file_not_found(source)),
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(".product.json"))
        {
            descriptors.push(path);
        }
    }
    descriptors.sort();
    Ok(descriptors)
}
