//! Implementation of the `packhorse compile` command.
//!
//! Loads the pipeline config, assembles the plan, and runs it against the
//! build workspace with console reporting. Success maps to exit 0; a failed
//! step maps to exit 1 with a final message naming the step.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use packhorse_lib::compile::compile;
use packhorse_lib::config::CompileConfig;
use packhorse_lib::paths;
use packhorse_lib::pipeline::StepState;
use packhorse_lib::report::ReportSink;
use packhorse_lib::util::tree_size;

use crate::output::{ConsoleSink, format_bytes, format_duration, print_stat, print_success};

pub fn cmd_compile(build_dir: &Path, cache_dir: Option<&Path>, config_path: Option<&Path>) -> Result<ExitCode> {
  let start = Instant::now();

  let build_dir = dunce::canonicalize(build_dir)
    .with_context(|| format!("build workspace not found: {}", build_dir.display()))?;
  let config_path = config_path
    .map(Path::to_path_buf)
    .unwrap_or_else(|| build_dir.join("packhorse.toml"));
  let config = CompileConfig::load(&config_path)?;
  let cache_root: PathBuf = cache_dir
    .map(Path::to_path_buf)
    .unwrap_or_else(paths::default_cache_dir);

  info!(workspace = %build_dir.display(), cache = %cache_root.display(), "starting compile");

  let mut sink = ConsoleSink;
  if let Some(advisory) = &config.advisory {
    sink.warn(advisory);
  }

  let result = compile(&config, &build_dir, &cache_root, &mut sink);

  println!();
  if result.is_success() {
    print_success(&format!(
      "Provisioned {} in {}",
      build_dir.display(),
      format_duration(start.elapsed())
    ));
    print_stat("Steps run", &result.count(StepState::Succeeded).to_string());
    print_stat("Steps skipped", &result.count(StepState::Skipped).to_string());
    print_stat("Workspace size", &format_bytes(tree_size(&build_dir)));
    Ok(ExitCode::SUCCESS)
  } else {
    // The sink already printed the step failure; repeat the advisory so it
    // is not lost above the error output.
    if let Some(advisory) = &config.advisory {
      sink.warn(advisory);
    }
    Ok(ExitCode::FAILURE)
  }
}
