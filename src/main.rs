//! Provisor - provisioning engine for OSGi-style installations
//!
//! Publishes filesystem artifacts (bundles, features, products) into
//! metadata and artifact repositories, and applies reversible provisioning
//! plans to installations on disk.

use clap::Parser;

mod advice;
mod cli;
mod commands;
mod common;
mod descriptor;
mod error;
mod hash;
mod ldap;
mod manifest;
mod manipulator;
mod metadata;
mod model;
mod parsers;
mod profile;
mod publisher;
mod repository;
mod status;
mod touchpoint;
mod ui;
mod version;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Publish(args) => commands::publish::run(args, cli.verbose),
        Commands::Apply(args) => commands::apply::run(args, cli.verbose),
        Commands::Status(args) => commands::status::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
