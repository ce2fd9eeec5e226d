use clap::Parser;
use std::path::PathBuf;

/// Arguments for the apply command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Apply a plan:\n    provisor apply ./plan.json --install-dir ./app\n\n\
                  Resolve @artifact parameters from a repository:\n    provisor apply ./plan.json --install-dir ./app --artifact-repo ./repo\n\n\
                  Keep timestamped backups of the config files:\n    provisor apply ./plan.json --install-dir ./app --backup\n\n\
                  List the registered touchpoint actions:\n    provisor apply --list-actions")]
pub struct ApplyArgs {
    /// Provisioning plan (JSON) to execute
    #[arg(value_name = "PLAN")]
    pub plan: Option<PathBuf>,

    /// Installation directory to provision
    #[arg(long = "install-dir", short = 'd', value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Artifact repository supplying @artifact payloads
    #[arg(long = "artifact-repo", short = 'a', value_name = "DIR")]
    pub artifact_repo: Option<PathBuf>,

    /// Back up config files before overwriting them
    #[arg(long)]
    pub backup: bool,

    /// List the registered touchpoint actions and exit
    #[arg(long = "list-actions")]
    pub list_actions: bool,
}
