//! End-to-end publish tests: source trees in, repository indexes out

mod common;

use assert_cmd::Command;
use common::TestWorkspace;
use predicates::prelude::*;

#[allow(deprecated)]
fn provisor_cmd() -> Command {
    Command::cargo_bin("provisor").unwrap()
}

#[test]
fn test_publish_bundle_writes_content_index() {
    let workspace = TestWorkspace::new();
    workspace.write_bundle("org.example.core", "1.0.0");

    provisor_cmd()
        .args(["publish", "--source"])
        .arg(workspace.source_dir())
        .arg("--metadata-repo")
        .arg(workspace.repo_dir())
        .assert()
        .success()
        .stdout(predicate::str::contains("Published"));

    assert!(workspace.file_exists("repo/content.json"));
    let content = workspace.read_file("repo/content.json");
    assert!(content.contains("org.example.core"));
    assert!(content.contains("osgi.bundle"));
}

#[test]
fn test_publish_index_only_copies_no_payload() {
    let workspace = TestWorkspace::new();
    workspace.write_bundle("org.example.core", "1.0.0");

    provisor_cmd()
        .args(["publish", "--source"])
        .arg(workspace.source_dir())
        .arg("--metadata-repo")
        .arg(workspace.repo_dir())
        .assert()
        .success();

    assert!(!workspace.file_exists("repo/osgi.bundle/org.example.core_1.0.0"));
}

#[test]
fn test_publish_artifacts_copies_payload() {
    let workspace = TestWorkspace::new();
    workspace.write_bundle("org.example.core", "1.0.0");

    provisor_cmd()
        .args(["publish", "--publish-artifacts", "--source"])
        .arg(workspace.source_dir())
        .arg("--metadata-repo")
        .arg(workspace.repo_dir())
        .assert()
        .success();

    assert!(workspace.file_exists("repo/artifacts.json"));
    assert!(workspace.file_exists("repo/osgi.bundle/org.example.core_1.0.0/META-INF/MANIFEST.MF"));
    let index = workspace.read_file("repo/artifacts.json");
    assert!(index.contains("blake3:"));
}

#[test]
fn test_publish_feature_publishes_group_unit() {
    let workspace = TestWorkspace::new();
    workspace.write_bundle("org.example.core", "1.0.0");
    workspace.write_feature(
        "org.example.sdk",
        "1.0.0",
        r#"{"id":"org.example.core","version":"1.0.0"}"#,
    );

    provisor_cmd()
        .args(["publish", "--source"])
        .arg(workspace.source_dir())
        .arg("--metadata-repo")
        .arg(workspace.repo_dir())
        .assert()
        .success();

    let content = workspace.read_file("repo/content.json");
    assert!(content.contains("org.example.sdk.feature.group"));
}

#[test]
fn test_publish_product_descriptor() {
    let workspace = TestWorkspace::new();
    workspace.write_bundle("org.example.core", "1.0.0");
    workspace.write_file(
        "build/app.product.json",
        r#"{
            "id": "com.example.app",
            "version": "1.0.0",
            "bundles": [{"id": "org.example.core"}],
            "startLevels": [{"id": "org.example.core", "startLevel": 2, "autoStart": true}]
        }"#,
    );

    provisor_cmd()
        .args(["publish", "--source"])
        .arg(workspace.source_dir())
        .arg("--metadata-repo")
        .arg(workspace.repo_dir())
        .assert()
        .success();

    let content = workspace.read_file("repo/content.json");
    assert!(content.contains("com.example.app"));
}

#[test]
fn test_publish_root_unit_requires_roots() {
    let workspace = TestWorkspace::new();
    workspace.write_bundle("org.example.core", "1.0.0");

    provisor_cmd()
        .args([
            "publish",
            "--root-id",
            "org.example.everything",
            "--root-version",
            "2.0.0",
            "--source",
        ])
        .arg(workspace.source_dir())
        .arg("--metadata-repo")
        .arg(workspace.repo_dir())
        .assert()
        .success();

    let content = workspace.read_file("repo/content.json");
    assert!(content.contains("org.example.everything"));
    assert!(content.contains("2.0.0"));
}

#[test]
fn test_publish_root_files() {
    let workspace = TestWorkspace::new();
    workspace.write_bundle("org.example.core", "1.0.0");
    workspace.write_file("rootfiles/about.txt", "about text\n");
    workspace.write_file("rootfiles/launcher.sh", "#!/bin/sh\n");

    provisor_cmd()
        .args(["publish", "--source"])
        .arg(workspace.source_dir())
        .arg("--metadata-repo")
        .arg(workspace.repo_dir())
        .arg("--root-files")
        .arg(workspace.path.join("rootfiles"))
        .assert()
        .success();

    let content = workspace.read_file("repo/content.json");
    assert!(content.contains("_root"));
    assert!(content.contains("binary"));
}

#[test]
fn test_publish_append_keeps_existing_units() {
    let workspace = TestWorkspace::new();
    workspace.write_bundle("org.example.core", "1.0.0");

    provisor_cmd()
        .args(["publish", "--source"])
        .arg(workspace.source_dir())
        .arg("--metadata-repo")
        .arg(workspace.repo_dir())
        .assert()
        .success();

    let other = TestWorkspace::new();
    other.write_bundle("org.example.extra", "0.5.0");

    provisor_cmd()
        .args(["publish", "--append", "--source"])
        .arg(other.source_dir())
        .arg("--metadata-repo")
        .arg(workspace.repo_dir())
        .assert()
        .success();

    let content = workspace.read_file("repo/content.json");
    assert!(content.contains("org.example.core"));
    assert!(content.contains("org.example.extra"));
}

#[test]
fn test_publish_without_append_starts_fresh() {
    let workspace = TestWorkspace::new();
    workspace.write_bundle("org.example.core", "1.0.0");

    provisor_cmd()
        .args(["publish", "--source"])
        .arg(workspace.source_dir())
        .arg("--metadata-repo")
        .arg(workspace.repo_dir())
        .assert()
        .success();

    let other = TestWorkspace::new();
    other.write_bundle("org.example.extra", "0.5.0");

    provisor_cmd()
        .args(["publish", "--source"])
        .arg(other.source_dir())
        .arg("--metadata-repo")
        .arg(workspace.repo_dir())
        .assert()
        .success();

    let content = workspace.read_file("repo/content.json");
    assert!(!content.contains("org.example.core"));
    assert!(content.contains("org.example.extra"));
}

#[test]
fn test_publish_missing_source_fails() {
    let workspace = TestWorkspace::new();

    provisor_cmd()
        .args(["publish", "--source"])
        .arg(workspace.path.join("nonexistent"))
        .arg("--metadata-repo")
        .arg(workspace.repo_dir())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_publish_malformed_product_fails() {
    let workspace = TestWorkspace::new();
    workspace.write_bundle("org.example.core", "1.0.0");
    workspace.write_file("build/broken.product.json", "{not json");

    provisor_cmd()
        .args(["publish", "--source"])
        .arg(workspace.source_dir())
        .arg("--metadata-repo")
        .arg(workspace.repo_dir())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_publish_separate_artifact_repo() {
    let workspace = TestWorkspace::new();
    workspace.write_bundle("org.example.core", "1.0.0");

    provisor_cmd()
        .args(["publish", "--publish-artifacts", "--source"])
        .arg(workspace.source_dir())
        .arg("--metadata-repo")
        .arg(workspace.repo_dir())
        .arg("--artifact-repo")
        .arg(workspace.path.join("artifacts"))
        .assert()
        .success();

    assert!(workspace.file_exists("repo/content.json"));
    assert!(!workspace.file_exists("repo/artifacts.json"));
    assert!(workspace.file_exists("artifacts/artifacts.json"));
}
