//! Launcher settings of a runtime installation

use std::path::{Path, PathBuf};

use crate::common::path_normalizer;
use crate::error::{ProvisorError, Result};

/// Launcher executable, framework, JVM and argument settings.
///
/// The framework config location and the persistent data location must
/// resolve to the same directory; [`LauncherData::check_locations`] enforces
/// that before anything is persisted.
#[derive(Debug, Clone, Default)]
pub struct LauncherData {
    pub launcher: Option<PathBuf>,
    pub fw_jar: Option<PathBuf>,
    pub fw_config_location: Option<PathBuf>,
    pub fw_persistent_data_location: Option<PathBuf>,
    pub jvm: Option<PathBuf>,
    pub jvm_args: Vec<String>,
    pub program_args: Vec<String>,
    pub clean: bool,
}

impl LauncherData {
    pub fn new() -> Self {
        LauncherData::default()
    }

    /// Verify that the config location and the persistent data location
    /// agree once normalized. Divergence is a configuration error that
    /// aborts the whole run.
    pub fn check_locations(&self) -> Result<()> {
        let (Some(config), Some(persistent)) = (
            self.fw_config_location.as_deref(),
            self.fw_persistent_data_location.as_deref(),
        ) else {
            return Ok(());
        };
        if path_normalizer::same_location(config, persistent) {
            Ok(())
        } else {
            Err(ProvisorError::InconsistentLocations {
                config: config.display().to_string(),
                persistent: persistent.display().to_string(),
            })
        }
    }

    /// Append a program argument unless the identical token is present.
    pub fn add_program_arg(&mut self, arg: impl Into<String>) -> bool {
        let arg = arg.into();
        if self.program_args.contains(&arg) {
            return false;
        }
        self.program_args.push(arg);
        true
    }

    /// Remove the first occurrence of the given program argument token.
    pub fn remove_program_arg(&mut self, arg: &str) -> bool {
        match self.program_args.iter().position(|a| a == arg) {
            Some(index) => {
                self.program_args.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn has_program_arg(&self, arg: &str) -> bool {
        self.program_args.iter().any(|a| a == arg)
    }

    pub fn add_jvm_arg(&mut self, arg: impl Into<String>) -> bool {
        let arg = arg.into();
        if self.jvm_args.contains(&arg) {
            return false;
        }
        self.jvm_args.push(arg);
        true
    }

    pub fn remove_jvm_arg(&mut self, arg: &str) -> bool {
        match self.jvm_args.iter().position(|a| a == arg) {
            Some(index) => {
                self.jvm_args.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn set_fw_config_location(&mut self, location: impl Into<PathBuf>) {
        self.fw_config_location = Some(location.into());
    }

    pub fn set_fw_persistent_data_location(&mut self, location: impl Into<PathBuf>, clean: bool) {
        self.fw_persistent_data_location = Some(location.into());
        self.clean = clean;
    }

    /// The directory the launcher ini lives next to, derived from the
    /// launcher executable path.
    pub fn launcher_ini_path(&self) -> Option<PathBuf> {
        let launcher = self.launcher.as_deref()?;
        let stem = launcher.file_stem()?;
        let mut ini = PathBuf::from(stem);
        ini.set_extension("ini");
        Some(launcher.parent().unwrap_or(Path::new("")).join(ini))
    }
}
