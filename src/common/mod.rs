//! Shared utilities

pub mod fs;
pub mod path_normalizer;
