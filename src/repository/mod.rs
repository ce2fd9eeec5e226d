//! File-backed metadata and artifact repositories
//!
//! Both repositories are a directory with a JSON index at a well-known
//! name. The contract is deliberately narrow: membership test, add, query
//! by id/version, save. Nothing here resolves dependencies.

pub mod artifact;
pub mod metadata;

pub use artifact::ArtifactRepository;
pub use metadata::MetadataRepository;
