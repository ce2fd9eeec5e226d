use clap::Parser;
use std::path::PathBuf;

/// Arguments for the publish command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Index a build directory:\n    provisor publish --source ./build --metadata-repo ./repo\n\n\
                  Publish with artifact payloads:\n    provisor publish --source ./build --metadata-repo ./repo --publish-artifacts\n\n\
                  Target specific platforms:\n    provisor publish --source ./build --metadata-repo ./repo \\\n        --config gtk.linux.x86_64 --config cocoa.macosx.aarch64\n\n\
                  Append to an existing repository:\n    provisor publish --source ./build --metadata-repo ./repo --append\n\n\
                  Publish an aggregate root unit:\n    provisor publish --source ./build --metadata-repo ./repo \\\n        --root-id org.example.everything --root-version 1.0.0")]
pub struct PublishArgs {
    /// Source directory holding plugins/, features/ and *.product.json
    /// descriptors
    #[arg(long, short = 's', value_name = "DIR")]
    pub source: PathBuf,

    /// Metadata repository directory to publish units into
    #[arg(long = "metadata-repo", short = 'm', value_name = "DIR")]
    pub metadata_repo: PathBuf,

    /// Artifact repository directory (defaults to the metadata repository)
    #[arg(long = "artifact-repo", short = 'a', value_name = "DIR")]
    pub artifact_repo: Option<PathBuf>,

    /// Target configuration as a ws.os.arch triple (repeatable)
    #[arg(long = "config", short = 'c', value_name = "WS.OS.ARCH")]
    pub configs: Vec<String>,

    /// Copy artifact payloads into the artifact repository instead of
    /// only indexing them
    #[arg(long = "publish-artifacts")]
    pub publish_artifacts: bool,

    /// Add to an existing repository instead of starting a fresh one
    #[arg(long)]
    pub append: bool,

    /// Publish an aggregate root unit with this id, requiring every root
    /// unit of the run
    #[arg(long = "root-id", value_name = "ID")]
    pub root_id: Option<String>,

    /// Version for the aggregate root unit
    #[arg(long = "root-version", value_name = "VERSION", default_value = "1.0.0")]
    pub root_version: String,

    /// Publish an execution environment unit for this Java version
    #[arg(long = "jre", value_name = "VERSION")]
    pub jre: Option<String>,

    /// Directory of root files (launchers, license text) to publish as
    /// binary artifacts, scoped per --config
    #[arg(long = "root-files", value_name = "DIR")]
    pub root_files: Option<PathBuf>,
}
