//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Isolated test environment.
///
/// Each test gets its own temporary directory holding a build workspace and
/// a cache root, with the fixture config placed at `workspace/packhorse.toml`.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create from a fixture config file.
  pub fn from_fixture(name: &str) -> Self {
    let env = Self::empty();
    let content = std::fs::read_to_string(fixture_path(name))
      .unwrap_or_else(|e| panic!("failed to load fixture {name}: {e}"));
    std::fs::write(env.workspace().join("packhorse.toml"), content).unwrap();
    env
  }

  /// Create an empty environment (workspace without a config).
  pub fn empty() -> Self {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("workspace")).unwrap();
    Self { temp }
  }

  pub fn workspace(&self) -> PathBuf {
    self.temp.path().join("workspace")
  }

  pub fn cache_dir(&self) -> PathBuf {
    self.temp.path().join("cache")
  }

  /// A `packhorse` command pointed at this environment's workspace and cache.
  pub fn compile_cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("packhorse");
    cmd
      .arg("compile")
      .arg(self.workspace())
      .arg("--cache-dir")
      .arg(self.cache_dir());
    cmd
  }

  pub fn plan_cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("packhorse");
    cmd
      .arg("plan")
      .arg(self.workspace())
      .arg("--cache-dir")
      .arg(self.cache_dir());
    cmd
  }
}
