//! Shared testing harness for `launchd-plist` integration tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::FakePlutil;

/// Testing harness providing an isolated environment for CLI exercises.
pub(crate) struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
    plutil: FakePlutil,
    rejecting_plutil: FakePlutil,
}

impl TestContext {
    /// Create a new isolated environment.
    pub(crate) fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");

        let bin_dir = root.path().join("bin");
        let plutil = FakePlutil::passing(&bin_dir);
        let rejecting_plutil = FakePlutil::failing(&bin_dir);

        Self { root, work_dir, plutil, rejecting_plutil }
    }

    pub(crate) fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Directory used as the manifest prefix.
    pub(crate) fn agents_dir(&self) -> PathBuf {
        self.work_dir.join("LaunchAgents")
    }

    pub(crate) fn plutil(&self) -> &FakePlutil {
        &self.plutil
    }

    pub(crate) fn rejecting_plutil(&self) -> &FakePlutil {
        &self.rejecting_plutil
    }

    /// Build a command for invoking the compiled binary within the work directory.
    pub(crate) fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("launchd-plist").expect("Failed to locate binary");
        cmd.current_dir(&self.work_dir).env_remove("RUST_LOG");
        cmd
    }

    /// Write a manifest whose prefix points at [`Self::agents_dir`].
    pub(crate) fn write_manifest(&self, name: &str, jobs: &str) -> PathBuf {
        let path = self.work_dir.join(name);
        let content = format!("prefix = {:?}\n\n{}", self.agents_dir().display().to_string(), jobs);
        fs::write(&path, content).expect("Failed to write manifest");
        path
    }

    /// Run `apply` against the passing fake validator.
    pub(crate) fn apply(&self, manifest: &Path) -> assert_cmd::assert::Assert {
        self.cli()
            .arg("apply")
            .arg(manifest)
            .arg("--validator")
            .arg(&self.plutil.program)
            .assert()
    }

    pub(crate) fn read_plist(&self, name: &str) -> String {
        fs::read_to_string(self.agents_dir().join(name)).expect("Failed to read plist")
    }
}
