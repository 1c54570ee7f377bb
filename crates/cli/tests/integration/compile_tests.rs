//! Compile command integration tests.

#![cfg(unix)]

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn compile_provisions_the_workspace() {
  let env = TestEnv::from_fixture("provision.toml");

  env
    .compile_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Installing DNVM"))
    .stdout(predicate::str::contains("Restoring dependencies with DNU"))
    .stdout(predicate::str::contains("Provisioned"));

  assert!(env.workspace().join(".dnx").join("installed").exists());
  assert!(env.workspace().join("release.yml").exists());
  assert!(env.cache_dir().join(".dnx").join("installed").exists());
}

#[test]
fn second_compile_skips_installed_steps() {
  let env = TestEnv::from_fixture("provision.toml");

  env.compile_cmd().assert().success();

  env
    .compile_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Steps skipped: 2"));
}

#[test]
fn cache_is_reused_across_workspaces() {
  let env = TestEnv::from_fixture("provision.toml");
  env.compile_cmd().assert().success();

  // Fresh workspace, same cache root: the toolchain installer must not run
  // again because the cache restore satisfies its marker.
  let second = TestEnv::from_fixture("provision.toml");
  compile_cmd_for(second.workspace().as_path(), env.cache_dir().as_path())
    .assert()
    .success()
    .stdout(predicate::str::contains("Steps skipped: 1"));

  assert!(second.workspace().join(".dnx").join("installed").exists());
}

#[test]
fn failing_step_exits_nonzero_and_names_the_step() {
  let env = TestEnv::from_fixture("failing.toml");

  env
    .compile_cmd()
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("Installing DNVM failed,"));

  assert!(
    !env.workspace().join("release.yml").exists(),
    "steps after the failure must not run"
  );
}

#[test]
fn advisory_banner_shown_before_run_and_after_failure() {
  let env = TestEnv::from_fixture("failing.toml");

  let output = env.compile_cmd().assert().failure().get_output().clone();
  let stderr = String::from_utf8_lossy(&output.stderr);

  assert_eq!(
    stderr.matches("This is an experimental pipeline").count(),
    2,
    "advisory must appear before the run and after the failure"
  );
}

#[test]
fn missing_config_is_reported() {
  let env = TestEnv::empty();

  env
    .compile_cmd()
    .assert()
    .failure()
    .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn missing_workspace_is_reported() {
  let env = TestEnv::empty();
  let missing = env.temp.path().join("nope");

  compile_cmd_for(&missing, env.cache_dir().as_path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("build workspace not found"));
}

fn compile_cmd_for(workspace: &std::path::Path, cache_dir: &std::path::Path) -> assert_cmd::Command {
  use assert_cmd::cargo::cargo_bin_cmd;
  let mut cmd = cargo_bin_cmd!("packhorse");
  cmd
    .arg("compile")
    .arg(workspace)
    .arg("--cache-dir")
    .arg(cache_dir);
  cmd
}
