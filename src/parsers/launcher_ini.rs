//! Launcher .ini reader/writer
//!
//! One argument token per line. `-clean`, `-configuration <path>` and
//! `-vm <path>` are recognized directives; `-vmargs` switches all following
//! lines into JVM-argument accumulation. Everything else ahead of `-vmargs`
//! is kept as a program argument.

use std::path::{Path, PathBuf};

use crate::common::fs::{backup_file, write_with_parents};
use crate::error::{ProvisorError, Result};
use crate::model::launcher_data::LauncherData;

const ARG_CLEAN: &str = "-clean";
const ARG_CONFIGURATION: &str = "-configuration";
const ARG_VM: &str = "-vm";
const ARG_VMARGS: &str = "-vmargs";

/// Read a launcher ini into a [`LauncherData`].
///
/// A value-taking directive on the last line with no value following is a
/// structural violation and fails with [`ProvisorError::LauncherIniInvalid`].
pub fn read(path: &Path) -> Result<LauncherData> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ProvisorError::read_failed(path, &e))?;

    let mut data = LauncherData::new();
    let mut lines = contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .peekable();
    let mut in_vmargs = false;

    while let Some(token) = lines.next() {
        if in_vmargs {
            data.jvm_args.push(token.to_string());
            continue;
        }
        match token {
            ARG_CLEAN => data.clean = true,
            ARG_CONFIGURATION => {
                let value = expect_value(&mut lines, path, ARG_CONFIGURATION)?;
                data.fw_config_location = Some(PathBuf::from(value));
            }
            ARG_VM => {
                let value = expect_value(&mut lines, path, ARG_VM)?;
                data.jvm = Some(PathBuf::from(value));
            }
            ARG_VMARGS => in_vmargs = true,
            other => {
                data.program_args.push(other.to_string());
            }
        }
    }
    Ok(data)
}

fn expect_value<'a>(
    lines: &mut std::iter::Peekable<impl Iterator<Item = &'a str>>,
    path: &Path,
    directive: &str,
) -> Result<&'a str> {
    lines.next().ok_or_else(|| ProvisorError::LauncherIniInvalid {
        path: path.display().to_string(),
        reason: format!("'{directive}' must be followed by a value line"),
    })
}

/// Write a [`LauncherData`] back out, one token per line. With `backup`
/// set, an existing destination is renamed to a timestamped sibling first.
pub fn save(data: &LauncherData, path: &Path, backup: bool) -> Result<()> {
    if backup {
        backup_file(path)?;
    }

    let mut lines: Vec<String> = Vec::new();
    if data.clean {
        lines.push(ARG_CLEAN.to_string());
    }
    if let Some(config) = &data.fw_config_location {
        lines.push(ARG_CONFIGURATION.to_string());
        lines.push(config.to_string_lossy().into_owned());
    }
    for arg in &data.program_args {
        lines.push(arg.clone());
    }
    if let Some(jvm) = &data.jvm {
        lines.push(ARG_VM.to_string());
        lines.push(jvm.to_string_lossy().into_owned());
    }
    if !data.jvm_args.is_empty() {
        lines.push(ARG_VMARGS.to_string());
        lines.extend(data.jvm_args.iter().cloned());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    write_with_parents(path, &out)
}
