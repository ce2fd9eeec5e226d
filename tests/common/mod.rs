//! Common test utilities for provisor integration tests

use std::path::PathBuf;
use tempfile::TempDir;

/// A scratch directory holding a publishable source tree, repositories
/// and an installation for one integration test.
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in the workspace, creating parent directories
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the workspace
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in the workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// The publishable source tree root
    pub fn source_dir(&self) -> PathBuf {
        let dir = self.path.join("build");
        std::fs::create_dir_all(&dir).expect("Failed to create source directory");
        dir
    }

    /// The repository directory (not created up front; publish does that)
    pub fn repo_dir(&self) -> PathBuf {
        self.path.join("repo")
    }

    /// The installation directory
    pub fn install_dir(&self) -> PathBuf {
        let dir = self.path.join("app");
        std::fs::create_dir_all(&dir).expect("Failed to create install directory");
        dir
    }

    /// Write an exploded bundle under build/plugins/
    pub fn write_bundle(&self, name: &str, version: &str) -> PathBuf {
        let bundle = self.source_dir().join("plugins").join(format!("{name}_{version}"));
        std::fs::create_dir_all(bundle.join("META-INF")).expect("Failed to create bundle");
        std::fs::write(
            bundle.join("META-INF").join("MANIFEST.MF"),
            format!("Bundle-SymbolicName: {name}\nBundle-Version: {version}\n"),
        )
        .expect("Failed to write manifest");
        bundle
    }

    /// Write a feature descriptor under build/features/
    pub fn write_feature(&self, id: &str, version: &str, entries: &str) {
        let feature = self.source_dir().join("features").join(id);
        std::fs::create_dir_all(&feature).expect("Failed to create feature");
        std::fs::write(
            feature.join("feature.json"),
            format!(r#"{{"id":"{id}","version":"{version}","entries":[{entries}]}}"#),
        )
        .expect("Failed to write feature descriptor");
    }

    /// Write a provisioning plan and return its path
    pub fn write_plan(&self, content: &str) -> PathBuf {
        let plan = self.path.join("plan.json");
        std::fs::write(&plan, content).expect("Failed to write plan");
        plan
    }

    /// The installation's config.ini contents
    pub fn read_config_ini(&self) -> String {
        self.read_file("app/configuration/config.ini")
    }
}
