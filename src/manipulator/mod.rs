//! The mutable handle over one runtime installation
//!
//! A [`Manipulator`] owns exactly one [`ConfigData`] and one
//! [`LauncherData`], loads them from and persists them to disk through the
//! parsers, and resolves the composed bundle state (monotonic bundle id
//! assignment). It is a single-writer structure: share it by taking an
//! explicit [`Manipulator::copy`], never by aliasing.

use std::path::PathBuf;

use crate::error::Result;
use crate::model::bundle_info::NO_BUNDLE_ID;
use crate::model::{ConfigData, LauncherData};
use crate::parsers::{config_ini, launcher_ini};
use crate::ui::Reporter;

const CONFIG_INI: &str = "config.ini";
const CONFIG_DIR: &str = "configuration";

#[derive(Debug, Clone)]
pub struct Manipulator {
    config_data: ConfigData,
    launcher_data: LauncherData,
    next_bundle_id: i64,
}

impl Manipulator {
    pub fn new() -> Self {
        Manipulator {
            config_data: ConfigData::new(),
            launcher_data: LauncherData::new(),
            next_bundle_id: 0,
        }
    }

    /// A manipulator pointed at an installation directory using the
    /// conventional layout: `<home>/configuration/config.ini` and the
    /// launcher ini next to the launcher executable.
    pub fn for_installation(home: &std::path::Path) -> Self {
        let mut manipulator = Manipulator::new();
        let config_dir = home.join(CONFIG_DIR);
        manipulator.launcher_data.set_fw_config_location(&config_dir);
        manipulator
            .launcher_data
            .set_fw_persistent_data_location(config_dir, false);
        manipulator
    }

    pub fn config_data(&self) -> &ConfigData {
        &self.config_data
    }

    pub fn config_data_mut(&mut self) -> &mut ConfigData {
        &mut self.config_data
    }

    pub fn launcher_data(&self) -> &LauncherData {
        &self.launcher_data
    }

    pub fn launcher_data_mut(&mut self) -> &mut LauncherData {
        &mut self.launcher_data
    }

    /// An independent copy. The only supported way to hand the state to
    /// another owner.
    pub fn copy(&self) -> Manipulator {
        self.clone()
    }

    fn config_ini_path(&self) -> Option<PathBuf> {
        self.launcher_data
            .fw_config_location
            .as_ref()
            .map(|dir| dir.join(CONFIG_INI))
    }

    /// Load config.ini (and the launcher ini when a launcher is set) into
    /// this manipulator, replacing its current state.
    pub fn load(&mut self, reporter: &mut dyn Reporter) -> Result<()> {
        self.launcher_data.check_locations()?;
        if let Some(ini) = self.launcher_data.launcher_ini_path()
            && ini.exists()
        {
            let loaded = launcher_ini::read(&ini)?;
            // Keep the launcher path and locations already configured.
            self.launcher_data.jvm = loaded.jvm.or(self.launcher_data.jvm.take());
            self.launcher_data.jvm_args = loaded.jvm_args;
            self.launcher_data.program_args = loaded.program_args;
            self.launcher_data.clean = loaded.clean;
            if let Some(config) = loaded.fw_config_location {
                self.launcher_data.set_fw_config_location(config);
            }
        }
        if let Some(path) = self.config_ini_path()
            && path.exists()
        {
            self.config_data = config_ini::read(&path, reporter)?;
        }
        self.resolve();
        Ok(())
    }

    /// Persist both halves. The location consistency check runs first, so
    /// a divergent configuration never reaches disk.
    pub fn save(&mut self, backup: bool) -> Result<()> {
        self.launcher_data.check_locations()?;
        self.resolve();
        if let Some(path) = self.config_ini_path() {
            config_ini::save(&self.config_data, &path, backup)?;
        }
        if let Some(ini) = self.launcher_data.launcher_ini_path() {
            launcher_ini::save(&self.launcher_data, &ini, backup)?;
        }
        Ok(())
    }

    /// Assign monotonically increasing, unique bundle ids to bundles that
    /// do not have one yet.
    pub fn resolve(&mut self) {
        let taken: i64 = self
            .config_data
            .bundles()
            .iter()
            .map(|b| b.bundle_id)
            .max()
            .unwrap_or(NO_BUNDLE_ID);
        self.next_bundle_id = self.next_bundle_id.max(taken + 1);

        // Borrow juggling: collect indexes first, then assign.
        let unassigned: Vec<usize> = self
            .config_data
            .bundles()
            .iter()
            .enumerate()
            .filter(|(_, b)| b.bundle_id == NO_BUNDLE_ID)
            .map(|(i, _)| i)
            .collect();
        for index in unassigned {
            let id = self.next_bundle_id;
            self.next_bundle_id += 1;
            if let Some(bundle) = self.config_data.bundles().get(index).cloned() {
                let version = bundle.version.clone();
                let name = bundle.symbolic_name.clone();
                if let Some(entry) = self.config_data.find_bundle_mut(&name, &version) {
                    entry.bundle_id = id;
                }
            }
        }
    }
}

impl Default for Manipulator {
    fn default() -> Self {
        Manipulator::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BundleInfo;
    use crate::ui::SilentReporter;
    use crate::version::Version;
    use tempfile::TempDir;

    fn bundle(name: &str) -> BundleInfo {
        BundleInfo::new(
            name,
            Version::new(1, 0, 0),
            format!("plugins/{name}_1.0.0.jar"),
        )
    }

    #[test]
    fn test_resolve_assigns_unique_monotonic_ids() {
        let mut manipulator = Manipulator::new();
        manipulator.config_data_mut().add_bundle(bundle("a"));
        manipulator.config_data_mut().add_bundle(bundle("b"));
        manipulator.resolve();

        let ids: Vec<i64> = manipulator
            .config_data()
            .bundles()
            .iter()
            .map(|b| b.bundle_id)
            .collect();
        assert_eq!(ids, vec![0, 1]);

        manipulator.config_data_mut().add_bundle(bundle("c"));
        manipulator.resolve();
        let c = manipulator
            .config_data()
            .find_bundle("c", &Version::new(1, 0, 0))
            .unwrap();
        assert_eq!(c.bundle_id, 2);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let mut manipulator = Manipulator::for_installation(temp.path());
        manipulator.config_data_mut().add_bundle(bundle("core"));
        manipulator
            .config_data_mut()
            .set_property("my.key", "value");
        manipulator.save(false).unwrap();

        let mut fresh = Manipulator::for_installation(temp.path());
        fresh.load(&mut SilentReporter::new()).unwrap();
        assert_eq!(fresh.config_data().bundles().len(), 1);
        assert_eq!(fresh.config_data().get_property("my.key"), Some("value"));
    }

    #[test]
    fn test_save_refuses_divergent_locations() {
        let temp = TempDir::new().unwrap();
        let mut manipulator = Manipulator::for_installation(temp.path());
        manipulator
            .launcher_data_mut()
            .set_fw_persistent_data_location(temp.path().join("elsewhere"), false);
        assert!(manipulator.save(false).is_err());
    }

    #[test]
    fn test_copy_is_independent() {
        let mut original = Manipulator::new();
        original.config_data_mut().add_bundle(bundle("a"));
        let mut copy = original.copy();
        copy.config_data_mut().add_bundle(bundle("b"));
        assert_eq!(original.config_data().bundles().len(), 1);
        assert_eq!(copy.config_data().bundles().len(), 2);
    }
}
