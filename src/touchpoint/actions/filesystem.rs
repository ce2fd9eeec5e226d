//! Filesystem actions: chmod, ln, mkdir, rmdir
//!
//! Relative paths resolve against the profile's install folder. chmod and
//! ln need Unix permission and symlink semantics; on other platforms they
//! report a warning and change nothing, so a cross-platform plan still
//! applies.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use crate::status::Status;
use crate::touchpoint::actions::{ActionContext, TouchpointAction};
use crate::touchpoint::params::Parameters;
use crate::touchpoint::undo::UndoState;

const PARAM_TARGET_DIR: &str = "targetDir";
const PARAM_TARGET_FILE: &str = "targetFile";
const PARAM_PERMISSIONS: &str = "permissions";
const PARAM_LINK_TARGET: &str = "linkTarget";
const PARAM_LINK_NAME: &str = "linkName";
const PARAM_PATH: &str = "path";

/// Resolve a possibly relative path against the install folder.
fn resolve_path(context: &ActionContext, raw: &str) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return path;
    }
    match context.profile.install_folder() {
        Some(root) => root.join(path),
        None => path,
    }
}

/// The directory a targetDir-taking action works in: the parameter when
/// given, the install folder otherwise.
fn target_dir(
    context: &ActionContext,
    params: &Parameters,
    action_id: &str,
) -> Result<PathBuf, Status> {
    if let Some(dir) = params.get(PARAM_TARGET_DIR) {
        return Ok(resolve_path(context, dir));
    }
    context
        .profile
        .install_folder()
        .map(Path::to_path_buf)
        .ok_or_else(|| Status::parameter_not_set(PARAM_TARGET_DIR, action_id))
}

pub struct ChmodAction;

impl ChmodAction {
    /// Files under `dir` matching the target spec. A spec with glob
    /// metacharacters is matched against paths relative to `dir`;
    /// anything else is taken as a literal file name.
    fn matching_files(dir: &Path, target: &str) -> Result<Vec<PathBuf>, Status> {
        if !target.contains(['*', '?', '[']) {
            let path = dir.join(target);
            return if path.exists() {
                Ok(vec![path])
            } else {
                Ok(Vec::new())
            };
        }
        let glob = Glob::new(target)
            .map_err(|e| Status::error(format!("bad chmod pattern '{target}': {e}")))?
            .into_owned();
        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            let text = relative.to_string_lossy().replace('\\', "/");
            if glob.matched(&CandidatePath::from(text.as_str())).is_some() {
                files.push(entry.path().to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }
}

impl TouchpointAction for ChmodAction {
    fn id(&self) -> &str {
        "chmod"
    }

    #[cfg(unix)]
    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        use std::os::unix::fs::PermissionsExt;

        let target = match params.required(PARAM_TARGET_FILE, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        let permissions = match params.required(PARAM_PERMISSIONS, self.id()) {
            Ok(v) => v,
            Err(status) => return (status, UndoState::None),
        };
        let mode = match u32::from_str_radix(permissions, 8) {
            Ok(mode) => mode,
            Err(_) => {
                return (
                    Status::error(format!("chmod: '{permissions}' is not an octal mode")),
                    UndoState::None,
                );
            }
        };
        let dir = match target_dir(context, params, self.id()) {
            Ok(dir) => dir,
            Err(status) => return (status, UndoState::None),
        };
        let files = match Self::matching_files(&dir, &target) {
            Ok(files) => files,
            Err(status) => return (status, UndoState::None),
        };
        if files.is_empty() {
            return (
                Status::warning(format!("chmod: nothing matches '{target}' under {}", dir.display())),
                UndoState::None,
            );
        }

        // Record every prior mode before touching anything, so a failure
        // partway through can be unwound completely.
        let mut previous = Vec::with_capacity(files.len());
        for file in &files {
            match std::fs::metadata(file) {
                Ok(meta) => previous.push((file.clone(), meta.permissions().mode())),
                Err(e) => {
                    return (
                        Status::error(format!("chmod: cannot stat {}: {e}", file.display())),
                        UndoState::None,
                    );
                }
            }
        }
        for (index, file) in files.iter().enumerate() {
            if let Err(e) = std::fs::set_permissions(file, std::fs::Permissions::from_mode(mode)) {
                // Unwind the files already changed.
                for (path, prior) in &previous[..index] {
                    let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(*prior));
                }
                return (
                    Status::error(format!("chmod: cannot set mode on {}: {e}", file.display())),
                    UndoState::None,
                );
            }
        }
        (Status::ok(), UndoState::FileModes { modes: previous })
    }

    #[cfg(not(unix))]
    fn execute(&self, _context: &mut ActionContext, _params: &Parameters) -> (Status, UndoState) {
        (
            Status::warning("chmod is not supported on this platform"),
            UndoState::None,
        )
    }

    #[cfg(unix)]
    fn undo(&self, _context: &mut ActionContext, state: UndoState) {
        use std::os::unix::fs::PermissionsExt;

        if let UndoState::FileModes { modes } = state {
            for (path, mode) in modes {
                let _ = std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode));
            }
        }
    }

    #[cfg(not(unix))]
    fn undo(&self, _context: &mut ActionContext, _state: UndoState) {}
}

pub struct LnAction;

impl TouchpointAction for LnAction {
    fn id(&self) -> &str {
        "ln"
    }

    #[cfg(unix)]
    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let link_target = match params.required(PARAM_LINK_TARGET, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        let link_name = match params.required(PARAM_LINK_NAME, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        let dir = match target_dir(context, params, self.id()) {
            Ok(dir) => dir,
            Err(status) => return (status, UndoState::None),
        };
        let path = dir.join(&link_name);
        if path.symlink_metadata().is_ok() {
            return (
                Status::error(format!("ln: {} already exists", path.display())),
                UndoState::None,
            );
        }
        match std::os::unix::fs::symlink(&link_target, &path) {
            Ok(()) => (Status::ok(), UndoState::CreatedLink { path }),
            Err(e) => (
                Status::error(format!("ln: cannot link {}: {e}", path.display())),
                UndoState::None,
            ),
        }
    }

    #[cfg(not(unix))]
    fn execute(&self, _context: &mut ActionContext, _params: &Parameters) -> (Status, UndoState) {
        (
            Status::warning("ln is not supported on this platform"),
            UndoState::None,
        )
    }

    fn undo(&self, _context: &mut ActionContext, state: UndoState) {
        if let UndoState::CreatedLink { path } = state {
            let _ = std::fs::remove_file(path);
        }
    }
}

pub struct MkdirAction;

impl TouchpointAction for MkdirAction {
    fn id(&self) -> &str {
        "mkdir"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let raw = match params.required(PARAM_PATH, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        let path = resolve_path(context, &raw);

        // Only the components this invocation actually creates are undone.
        let mut created: Vec<PathBuf> = Vec::new();
        let mut cursor = path.as_path();
        while !cursor.exists() {
            created.push(cursor.to_path_buf());
            match cursor.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => cursor = parent,
                _ => break,
            }
        }
        created.reverse();

        if created.is_empty() {
            return (
                Status::warning(format!("mkdir: {} already exists", path.display())),
                UndoState::None,
            );
        }
        match std::fs::create_dir_all(&path) {
            Ok(()) => (Status::ok(), UndoState::CreatedDirs { paths: created }),
            Err(e) => (
                Status::error(format!("mkdir: cannot create {}: {e}", path.display())),
                UndoState::None,
            ),
        }
    }

    fn undo(&self, _context: &mut ActionContext, state: UndoState) {
        if let UndoState::CreatedDirs { paths } = state {
            for path in paths.iter().rev() {
                let _ = std::fs::remove_dir(path);
            }
        }
    }
}

pub struct RmdirAction;

impl TouchpointAction for RmdirAction {
    fn id(&self) -> &str {
        "rmdir"
    }

    fn execute(&self, context: &mut ActionContext, params: &Parameters) -> (Status, UndoState) {
        let raw = match params.required(PARAM_PATH, self.id()) {
            Ok(v) => v.to_string(),
            Err(status) => return (status, UndoState::None),
        };
        let path = resolve_path(context, &raw);
        if !path.exists() {
            return (
                Status::warning(format!("rmdir: {} does not exist", path.display())),
                UndoState::RemovedDir {
                    path,
                    removed: false,
                },
            );
        }
        // Only empty directories are removable; anything else is an error.
        match std::fs::remove_dir(&path) {
            Ok(()) => (
                Status::ok(),
                UndoState::RemovedDir {
                    path,
                    removed: true,
                },
            ),
            Err(e) => (
                Status::error(format!("rmdir: cannot remove {}: {e}", path.display())),
                UndoState::None,
            ),
        }
    }

    fn undo(&self, _context: &mut ActionContext, state: UndoState) {
        if let UndoState::RemovedDir {
            path,
            removed: true,
        } = state
        {
            let _ = std::fs::create_dir_all(path);
        }
    }
}
