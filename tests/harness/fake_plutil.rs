use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Stand-in for `plutil -lint` that logs every call.
pub(crate) struct FakePlutil {
    pub program: PathBuf,
    pub log_file: PathBuf,
}

impl FakePlutil {
    /// Fake that accepts every file.
    pub(crate) fn passing(bin_dir: &Path) -> Self {
        Self::install(bin_dir, "plutil-ok", "echo \"$2: OK\"\nexit 0")
    }

    /// Fake that rejects every file with plutil-style diagnostics.
    pub(crate) fn failing(bin_dir: &Path) -> Self {
        Self::install(
            bin_dir,
            "plutil-reject",
            "echo \"$2: Encountered unknown tag frobnicate on line 7\"\nexit 1",
        )
    }

    fn install(bin_dir: &Path, name: &str, body: &str) -> Self {
        fs::create_dir_all(bin_dir).expect("Failed to create bin dir");
        let program = bin_dir.join(name);
        let log_file = bin_dir.join(format!("{}.log", name));

        let script = format!("#!/bin/sh\necho \"$@\" >> \"{}\"\n{}\n", log_file.display(), body);
        fs::write(&program, script).expect("Failed to write fake plutil");

        let mut perms = fs::metadata(&program).expect("Failed to get metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&program, perms).expect("Failed to set permissions");

        Self { program, log_file }
    }

    pub(crate) fn get_log(&self) -> String {
        fs::read_to_string(&self.log_file).unwrap_or_default()
    }
}
