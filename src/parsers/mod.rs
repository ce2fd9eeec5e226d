//! On-disk configuration formats
//!
//! Readers and writers for the two file formats a runtime installation
//! carries: the `config.ini` properties file (bundle list, start levels,
//! framework properties) and the launcher `.ini` (one argument token per
//! line). Malformed single lines are reported as warnings and skipped;
//! structural violations are hard errors.

pub mod config_ini;
pub mod launcher_ini;
