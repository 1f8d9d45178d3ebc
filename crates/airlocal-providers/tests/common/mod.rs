//! Common test helpers for airlocal-providers integration tests
//!
//! Fake executables stand in for docker: each invocation is appended to a
//! log file next to the script and the exit code is chosen by matching the
//! argument string.

#![allow(dead_code)]

use airlocal_providers::Docker;
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Creates a mock executable that exits with the code of the first matching
/// `(arg_pattern, stderr, exit_code)` condition, or 0.
pub fn create_conditional_mock(dir: &Utf8Path, name: &str, conditions: &[(&str, &str, i32)]) {
    let script_path = dir.join(name);
    let log_path = dir.join(format!("{}.log", name));

    let mut script = format!(
        r#"#!/bin/sh
echo "$*" >> "{log}"
ALL_ARGS="$*"
"#,
        log = log_path,
    );

    for (pattern, stderr, exit_code) in conditions {
        script.push_str(&format!(
            r#"if echo "$ALL_ARGS" | grep -qF -- '{pattern}'; then
  echo '{stderr}' >&2
  exit {exit_code}
fi
"#,
        ));
    }
    script.push_str("exit 0\n");

    std::fs::write(&script_path, script).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
}

/// Read the invocation log for a mock executable.
pub fn read_mock_log(dir: &Utf8Path, name: &str) -> Vec<String> {
    std::fs::read_to_string(dir.join(format!("{}.log", name)))
        .unwrap_or_default()
        .lines()
        .map(|s| s.to_string())
        .collect()
}

/// Temp dir holding a fake docker; keep the `TempDir` alive for the test
pub struct FakeDocker {
    _tmp: TempDir,
    pub dir: Utf8PathBuf,
}

impl FakeDocker {
    pub fn new(conditions: &[(&str, &str, i32)]) -> Self {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        create_conditional_mock(&dir, "docker", conditions);
        Self { _tmp: tmp, dir }
    }

    pub fn docker(&self) -> Docker {
        Docker::with_program(self.dir.join("docker").to_string())
    }

    pub fn calls(&self) -> Vec<String> {
        read_mock_log(&self.dir, "docker")
    }

    /// A directory standing in for an environment or config dir
    pub fn subdir(&self, name: &str) -> Utf8PathBuf {
        let path = self.dir.join(name);
        std::fs::create_dir_all(&path).unwrap();
        path
    }
}
