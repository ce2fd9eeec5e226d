//! config.ini reader/writer
//!
//! Properties-style `key=value` lines. The bundle list lives under
//! `osgi.bundles` as comma-separated `location[@[startLevel]][:start]`
//! entries; start level keys and the property partitions map onto
//! [`ConfigData`] fields.

use std::path::{Path, PathBuf};

use crate::common::fs::{backup_file, write_with_parents};
use crate::error::{ProvisorError, Result};
use crate::model::bundle_info::{BundleInfo, NO_LEVEL};
use crate::model::config_data::ConfigData;
use crate::ui::Reporter;
use crate::version::Version;

const KEY_BUNDLES: &str = "osgi.bundles";
const KEY_DEFAULT_START_LEVEL: &str = "osgi.bundles.defaultStartLevel";
const KEY_BEGINNING_START_LEVEL: &str = "osgi.startLevel";

/// Read a config.ini into a [`ConfigData`].
///
/// Unknown keys become properties; malformed lines and bundle entries are
/// reported as warnings and skipped.
pub fn read(path: &Path, reporter: &mut dyn Reporter) -> Result<ConfigData> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| ProvisorError::read_failed(path, &e))?;

    let mut data = ConfigData::new();
    for (number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            reporter.warning(&format!(
                "{}:{}: not a key=value line, skipped",
                path.display(),
                number + 1
            ));
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        match key {
            KEY_BUNDLES => read_bundle_list(value, &mut data, path, reporter),
            KEY_DEFAULT_START_LEVEL => match value.parse() {
                Ok(level) => data.initial_bundle_start_level = level,
                Err(_) => reporter.warning(&format!(
                    "{}: invalid default start level '{value}', skipped",
                    path.display()
                )),
            },
            KEY_BEGINNING_START_LEVEL => match value.parse() {
                Ok(level) => data.beginning_fw_start_level = level,
                Err(_) => reporter.warning(&format!(
                    "{}: invalid framework start level '{value}', skipped",
                    path.display()
                )),
            },
            _ => {
                data.set_property(key, value);
            }
        }
    }
    Ok(data)
}

fn read_bundle_list(value: &str, data: &mut ConfigData, path: &Path, reporter: &mut dyn Reporter) {
    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match parse_bundle_entry(entry) {
            Some(bundle) => {
                data.add_bundle(bundle);
            }
            None => reporter.warning(&format!(
                "{}: malformed bundle entry '{entry}', skipped",
                path.display()
            )),
        }
    }
}

/// Parse one `location[@[startLevel]][:start]` entry.
fn parse_bundle_entry(entry: &str) -> Option<BundleInfo> {
    let (location, suffix) = match entry.rsplit_once('@') {
        Some((loc, suffix)) if !loc.is_empty() => (loc, Some(suffix)),
        _ => (entry, None),
    };

    let mut start_level = NO_LEVEL;
    let mut started = false;
    if let Some(suffix) = suffix {
        let level_part = match suffix.strip_suffix(":start") {
            Some(rest) => {
                started = true;
                rest
            }
            None => suffix,
        };
        let level_part = level_part.trim();
        if level_part == "start" && !started {
            // Bare "@start" with no level.
            started = true;
        } else if !level_part.is_empty() {
            start_level = level_part.parse().ok()?;
        }
    }

    let (name, version) = identity_from_location(location);
    Some(
        BundleInfo::new(name, version, PathBuf::from(location))
            .with_start_level(start_level)
            .with_started(started),
    )
}

/// Derive (symbolic name, version) from a `name_version.jar` style file
/// name. Locations without the underscore convention get the stem as name
/// and version 0.0.0.
fn identity_from_location(location: &str) -> (String, Version) {
    let stem = Path::new(location)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| location.to_string());
    if let Some((name, version)) = stem.rsplit_once('_')
        && let Ok(version) = Version::parse(version)
    {
        return (name.to_string(), version);
    }
    (stem, Version::zero())
}

/// Write a [`ConfigData`] back out. With `backup` set, an existing
/// destination is renamed to a timestamped sibling first.
pub fn save(data: &ConfigData, path: &Path, backup: bool) -> Result<()> {
    if backup {
        backup_file(path)?;
    }

    let mut out = String::new();
    out.push_str("#This configuration file was written by provisor\n");
    if !data.bundles().is_empty() {
        let entries: Vec<String> = data.bundles().iter().map(format_bundle_entry).collect();
        out.push_str(&format!("{KEY_BUNDLES}={}\n", entries.join(",")));
    }
    out.push_str(&format!(
        "{KEY_DEFAULT_START_LEVEL}={}\n",
        data.initial_bundle_start_level
    ));
    out.push_str(&format!(
        "{KEY_BEGINNING_START_LEVEL}={}\n",
        data.beginning_fw_start_level
    ));
    for (key, value) in data.fw_dependent_properties() {
        out.push_str(&format!("{key}={value}\n"));
    }
    for (key, value) in data.fw_independent_properties() {
        out.push_str(&format!("{key}={value}\n"));
    }
    write_with_parents(path, &out)
}

fn format_bundle_entry(bundle: &BundleInfo) -> String {
    let location = bundle.location.to_string_lossy();
    match (bundle.start_level, bundle.marked_as_started) {
        (NO_LEVEL, false) => location.into_owned(),
        (NO_LEVEL, true) => format!("{location}@start"),
        (level, false) => format!("{location}@{level}"),
        (level, true) => format!("{location}@{level}:start"),
    }
}
