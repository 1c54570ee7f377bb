//! Implementation of the `packhorse plan` command.
//!
//! Prints the ordered step names a compile would run, without executing
//! anything. Cheap dry view: idempotency checks are not consulted, so the
//! listing shows the declared pipeline, not what would actually be skipped.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};

use packhorse_lib::cache::ArtifactCache;
use packhorse_lib::compile::plan;
use packhorse_lib::config::CompileConfig;
use packhorse_lib::paths;
use packhorse_lib::pipeline::Pipeline;

use crate::output::{print_info, print_json};

pub fn cmd_plan(build_dir: &Path, cache_dir: Option<&Path>, config_path: Option<&Path>, json: bool) -> Result<ExitCode> {
  let build_dir = dunce::canonicalize(build_dir)
    .with_context(|| format!("build workspace not found: {}", build_dir.display()))?;
  let config_path = config_path
    .map(Path::to_path_buf)
    .unwrap_or_else(|| build_dir.join("packhorse.toml"));
  let config = CompileConfig::load(&config_path)?;
  let cache_root: PathBuf = cache_dir
    .map(Path::to_path_buf)
    .unwrap_or_else(paths::default_cache_dir);

  let cache = ArtifactCache::new(&cache_root);
  let pipeline = Pipeline::new(plan(&config, &cache));

  if json {
    let steps: Vec<_> = pipeline.step_names().collect();
    print_json(&serde_json::json!({
      "workspace": build_dir,
      "cache_root": cache_root,
      "steps": steps,
    }))?;
  } else if pipeline.is_empty() {
    print_info("Nothing to do: the config defines no steps.");
  } else {
    println!("Would run {} steps:", pipeline.len());
    for (index, name) in pipeline.step_names().enumerate() {
      print_info(&format!("{}. {}", index + 1, name));
    }
  }

  Ok(ExitCode::SUCCESS)
}
