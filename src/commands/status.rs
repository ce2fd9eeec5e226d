//! Status command implementation
//!
//! Read-only view over an installation's config.ini and launcher ini.

use console::style;

use crate::cli::StatusArgs;
use crate::error::Result;
use crate::manipulator::Manipulator;
use crate::model::bundle_info::NO_LEVEL;
use crate::ui::ConsoleReporter;

pub fn run(args: StatusArgs) -> Result<()> {
    let mut reporter = ConsoleReporter::new(false);
    let mut manipulator = Manipulator::for_installation(&args.install_dir);
    manipulator.load(&mut reporter)?;

    let config = manipulator.config_data();
    let launcher = manipulator.launcher_data();

    println!("{} {}", style("Installation:").bold(), args.install_dir.display());
    println!();

    println!("{} ({})", style("Bundles").green().bold(), config.bundles().len());
    for bundle in config.bundles() {
        let level = if bundle.start_level == NO_LEVEL {
            "-".to_string()
        } else {
            bundle.start_level.to_string()
        };
        let started = if bundle.marked_as_started { "started" } else { "" };
        println!(
            "  {} {} @{level} {started}",
            bundle.symbolic_name, bundle.version
        );
    }
    println!();

    println!("{}", style("Properties").green().bold());
    for (key, value) in config.fw_dependent_properties() {
        println!("  {key}={value}");
    }
    for (key, value) in config.fw_independent_properties() {
        println!("  {key}={value}");
    }
    println!();

    println!("{}", style("Launcher").green().bold());
    if let Some(jvm) = &launcher.jvm {
        println!("  vm: {}", jvm.display());
    }
    if !launcher.program_args.is_empty() {
        println!("  program args: {}", launcher.program_args.join(" "));
    }
    if !launcher.jvm_args.is_empty() {
        println!("  vm args: {}", launcher.jvm_args.join(" "));
    }

    Ok(())
}
