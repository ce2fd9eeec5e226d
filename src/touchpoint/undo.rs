//! Typed undo state
//!
//! Every action's `execute` returns the state its `undo` needs to restore
//! the world, as one variant of a closed union. The engine stacks these
//! per operand and either discards them on commit or replays them in
//! reverse on rollback. Nothing here is stringly keyed; an action can only
//! consume the variant it produced.

use std::path::PathBuf;

use crate::model::bundle_info::BundleInfo;
use crate::version::Version;

#[derive(Debug, Clone, PartialEq)]
pub enum UndoState {
    /// Nothing to restore.
    None,
    /// A bundle was added; undo removes it.
    InstalledBundle { name: String, version: Version },
    /// A bundle was removed; undo reinserts it.
    RemovedBundle { bundle: BundleInfo },
    /// A start level was changed; undo restores the previous one.
    StartLevel {
        name: String,
        version: Version,
        previous: i32,
    },
    /// The started mark was changed; undo restores the previous flag.
    Started {
        name: String,
        version: Version,
        previous: bool,
    },
    /// A program argument was appended; undo removes it (subject to the
    /// historical `-`-prefix rule).
    AddedProgramArg { arg: String },
    /// A program argument was removed (or was already absent).
    RemovedProgramArg { arg: String, removed: bool },
    /// A JVM argument was appended.
    AddedJvmArg { arg: String },
    /// A JVM argument was removed (or was already absent).
    RemovedJvmArg { arg: String, removed: bool },
    /// A property was set or cleared; undo restores the previous value
    /// (`None` meaning the key was absent).
    Property {
        key: String,
        previous: Option<String>,
    },
    /// File permission bits before a chmod, per affected file.
    FileModes { modes: Vec<(PathBuf, u32)> },
    /// A symlink was created; undo removes it.
    CreatedLink { path: PathBuf },
    /// Directories created by mkdir, deepest last; undo removes them.
    CreatedDirs { paths: Vec<PathBuf> },
    /// A directory was removed (or was already absent); undo recreates it.
    RemovedDir { path: PathBuf, removed: bool },
    /// A feature reference was added; undo removes it.
    InstalledFeature { id: String, version: Version },
    /// A feature reference was removed (or was already absent).
    RemovedFeature {
        id: String,
        version: Version,
        removed: bool,
    },
    /// A repository reference was added (or was already tracked).
    AddedRepository { location: String, added: bool },
    /// A repository reference was removed (or was not tracked).
    RemovedRepository { location: String, removed: bool },
    /// A source bundle was added; undo removes it.
    AddedSourceBundle { name: String, version: Version },
    /// A source bundle was removed (or was already absent).
    RemovedSourceBundle {
        bundle: Option<BundleInfo>,
    },
}
