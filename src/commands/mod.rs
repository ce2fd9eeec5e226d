//! Command implementations for the provisor CLI

pub mod apply;
pub mod completions;
pub mod publish;
pub mod status;
pub mod version;
