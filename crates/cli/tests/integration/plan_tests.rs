//! Plan command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn plan_lists_steps_in_order() {
  let env = TestEnv::from_fixture("provision.toml");

  env
    .plan_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Would run 5 steps:"))
    .stdout(predicate::str::contains("1. Restoring files from build cache"))
    .stdout(predicate::str::contains("2. Installing DNVM"))
    .stdout(predicate::str::contains("5. Writing release manifest"));
}

#[test]
fn plan_does_not_execute_anything() {
  let env = TestEnv::from_fixture("provision.toml");

  env.plan_cmd().assert().success();

  assert!(!env.workspace().join(".dnx").exists());
  assert!(!env.workspace().join("release.yml").exists());
  assert!(!env.cache_dir().exists());
}

#[test]
fn plan_with_empty_config_says_so() {
  let env = TestEnv::from_fixture("empty.toml");

  env
    .plan_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Nothing to do"));
}

#[test]
fn plan_json_emits_step_names() {
  let env = TestEnv::from_fixture("provision.toml");

  let output = env.plan_cmd().arg("--json").assert().success().get_output().clone();
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

  let steps: Vec<_> = json["steps"]
    .as_array()
    .unwrap()
    .iter()
    .map(|s| s.as_str().unwrap().to_string())
    .collect();
  assert_eq!(
    steps,
    vec![
      "Restoring files from build cache",
      "Installing DNVM",
      "Restoring dependencies with DNU",
      "Saving to build cache",
      "Writing release manifest",
    ]
  );
}
