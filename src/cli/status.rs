use clap::Parser;
use std::path::PathBuf;

/// Arguments for the status command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show an installation's configuration:\n    provisor status ./app")]
pub struct StatusArgs {
    /// Installation directory to inspect
    #[arg(value_name = "DIR")]
    pub install_dir: PathBuf,
}
