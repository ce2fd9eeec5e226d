//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument
//! types:
//! - publish: Publish command arguments
//! - apply: Apply command arguments
//! - status: Status command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod apply;
pub mod completions;
pub mod publish;
pub mod status;

pub use apply::ApplyArgs;
pub use completions::CompletionsArgs;
pub use publish::PublishArgs;
pub use status::StatusArgs;

/// Provisor - provisioning engine for OSGi-style installations
#[derive(Parser, Debug)]
#[command(
    name = "provisor",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Provisioning engine for OSGi-style installations",
    long_about = "Provisor publishes filesystem artifacts (bundles, features, products) into \
                  metadata and artifact repositories, and applies reversible provisioning \
                  plans (bundle installs, start levels, launcher configuration) to an \
                  installation on disk.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  provisor publish --source ./build --metadata-repo ./repo\n    \
                  provisor apply ./plan.json --install-dir ./app --artifact-repo ./repo\n    \
                  provisor status ./app\n    \
                  provisor apply --list-actions"
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish artifacts into a metadata/artifact repository pair
    Publish(PublishArgs),

    /// Apply a provisioning plan to an installation
    Apply(ApplyArgs),

    /// Show an installation's configuration
    Status(StatusArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
