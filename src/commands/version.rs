//! Version command implementation

use crate::error::Result;
use crate::touchpoint::ActionRegistry;

/// Run version command
pub fn run() -> Result<()> {
    println!("provisor {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!("  Profile: {}", build_profile());
    println!(
        "  Touchpoint actions: {}",
        ActionRegistry::with_defaults().len()
    );

    Ok(())
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
