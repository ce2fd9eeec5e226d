//! Publishing advice
//!
//! Advice is supplementary, applicability-scoped metadata supplied to
//! publisher actions out-of-band from the artifact being processed: extra
//! properties, capabilities, requirements, touchpoint instructions, version
//! overrides, and per-platform configuration. Actions pull the applicable
//! subsequence from the [`registry::AdviceRegistry`] in registration order.

pub mod file;
pub mod kinds;
pub mod registry;

pub use kinds::{Advice, AdviceScope, ConfigAdvice, VersionConstraint};
pub use registry::AdviceRegistry;
