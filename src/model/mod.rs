//! In-memory model of a runtime installation's configuration
//!
//! Leaf data structures with no dependencies on the rest of the crate:
//! the bundle list and properties ([`ConfigData`]), the launcher settings
//! ([`LauncherData`]), and the platform triple ([`ConfigSpec`]).

pub mod bundle_info;
pub mod config_data;
pub mod config_spec;
pub mod launcher_data;

pub use bundle_info::BundleInfo;
pub use config_data::ConfigData;
pub use config_spec::ConfigSpec;
pub use launcher_data::LauncherData;
