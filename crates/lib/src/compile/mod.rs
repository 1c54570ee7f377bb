//! Compile plan assembly and concrete provisioning collaborators.
//!
//! One parameterized pipeline covers the staged provisioning flow:
//!
//! 1. Restore artifacts from the build cache
//! 2. Extract runtime component archives
//! 3. Import root certificates
//! 4. Install the toolchain
//! 5. Install the runtime
//! 6. Restore application dependencies
//! 7. Save artifacts to the build cache
//! 8. Write the release manifest
//!
//! Which steps appear is driven entirely by [`CompileConfig`]; unset sections
//! contribute no step. Cache restore/save are ordinary steps, not special
//! cases.

mod archive;
mod certs;
mod release;
mod script;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use archive::ArchiveExtractor;
pub use certs::CertImporter;
pub use release::ReleaseWriter;
pub use script::ScriptRunner;

use crate::cache::{ArtifactCache, CacheError};
use crate::config::CompileConfig;
use crate::pipeline::{Pipeline, PipelineResult, PipelineStep, StepAction, StepResult};
use crate::report::{ReportSink, StepReporter};
use crate::shell::{Shell, ShellError};

/// Errors raised by the built-in collaborators.
#[derive(Debug, Error)]
pub enum StepError {
  #[error(transparent)]
  Cache(#[from] CacheError),

  #[error(transparent)]
  Shell(#[from] ShellError),

  /// Failed to open a runtime component archive.
  #[error("failed to open archive '{path}': {source}")]
  OpenArchive {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to unpack an archive into the workspace.
  #[error("failed to unpack '{path}' into '{dest}': {source}")]
  Unpack {
    path: PathBuf,
    dest: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to copy the imported certificate store.
  #[error("failed to copy certificate store '{from}' to '{to}': {source}")]
  CopyCerts {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to render the release manifest.
  #[error("failed to render release manifest: {0}")]
  Render(#[from] serde_yaml::Error),

  /// Failed to write a file into the workspace.
  #[error("failed to write '{path}': {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Restores the configured artifact keys from the cache into the workspace.
struct CacheRestore {
  cache: ArtifactCache,
  keys: Vec<String>,
}

impl StepAction for CacheRestore {
  fn perform(&self, workspace: &Path, reporter: &mut dyn StepReporter) -> StepResult {
    for key in &self.keys {
      if self.cache.has(key) {
        reporter.output(&format!("restoring {key}"));
      }
      self.cache.restore(key, workspace).map_err(StepError::from)?;
    }
    Ok(())
  }
}

/// Saves the configured artifact keys from the workspace into the cache.
///
/// Keys absent from the workspace are skipped; keys the cache already holds
/// are left untouched (first-writer-wins).
struct CacheSave {
  cache: ArtifactCache,
  keys: Vec<String>,
}

impl StepAction for CacheSave {
  fn perform(&self, workspace: &Path, reporter: &mut dyn StepReporter) -> StepResult {
    for key in &self.keys {
      if !workspace.join(key).exists() {
        continue;
      }
      if !self.cache.has(key) {
        reporter.output(&format!("saving {key}"));
      }
      self.cache.save(key, workspace).map_err(StepError::from)?;
    }
    Ok(())
  }
}

/// Assemble the ordered step list for `config`.
pub fn plan(config: &CompileConfig, cache: &ArtifactCache) -> Vec<PipelineStep> {
  let mut steps = Vec::new();
  let shell = Shell::with_env(config.env.clone());

  if !config.cache.keys.is_empty() {
    steps.push(PipelineStep::new(
      "Restoring files from build cache",
      CacheRestore {
        cache: cache.clone(),
        keys: config.cache.keys.clone(),
      },
    ));
  }

  for archive in &config.archives {
    steps.push(
      PipelineStep::new(
        format!("Extracting {}", archive.name),
        ArchiveExtractor::new(&archive.source, archive.dest()),
      )
      .skip_if_present(archive.dest()),
    );
  }

  if let Some(certs_config) = &config.certs {
    steps.push(
      PipelineStep::new(
        "Importing root certificates",
        CertImporter::new(certs_config, shell.clone()),
      )
      .skip_if_present(certs::store_path(certs_config)),
    );
  }

  if let Some(toolchain) = &config.toolchain {
    let mut step = PipelineStep::new(
      format!("Installing {}", toolchain.name),
      ScriptRunner::new(&toolchain.install, shell.clone()),
    );
    if let Some(marker) = &toolchain.marker {
      step = step.skip_if_present(marker);
    }
    steps.push(step);
  }

  if let Some(runtime) = &config.runtime {
    let mut step = PipelineStep::new(
      format!("Installing {}", runtime.name),
      ScriptRunner::new(&runtime.install, shell.clone()),
    );
    if let Some(marker) = &runtime.marker {
      step = step.skip_if_present(marker);
    }
    steps.push(step);
  }

  if let Some(deps) = &config.dependencies {
    let name = match &deps.name {
      Some(tool) => format!("Restoring dependencies with {tool}"),
      None => "Restoring dependencies".to_string(),
    };
    let mut step = PipelineStep::new(name, ScriptRunner::new(&deps.command, shell.clone()));
    if let Some(marker) = &deps.marker {
      step = step.skip_if_present(marker);
    }
    steps.push(step);
  }

  if !config.cache.keys.is_empty() {
    steps.push(PipelineStep::new(
      "Saving to build cache",
      CacheSave {
        cache: cache.clone(),
        keys: config.cache.keys.clone(),
      },
    ));
  }

  if let Some(release) = &config.release {
    steps.push(PipelineStep::new(
      "Writing release manifest",
      ReleaseWriter::new(release),
    ));
  }

  steps
}

/// Run the full compile pipeline for `config` against `workspace`.
pub fn compile(
  config: &CompileConfig,
  workspace: &Path,
  cache_root: &Path,
  sink: &mut dyn ReportSink,
) -> PipelineResult {
  let cache = ArtifactCache::new(cache_root);
  Pipeline::new(plan(config, &cache)).run(workspace, sink)
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;
  use crate::pipeline::StepState;
  use crate::report::NullSink;

  fn full_config() -> CompileConfig {
    toml::from_str(
      r#"
[cache]
keys = [".dnx"]

[[archives]]
name = "libuv"
source = "/var/binaries/libuv.tar.gz"

[certs]
import = "true"
source = "/tmp/certs"
dest = ".config/.mono"

[toolchain]
name = "DNVM"
install = "echo install dnvm"
marker = ".dnx/dnvm"

[runtime]
name = "DNX with DNVM"
install = "echo install dnx"
marker = "approot/runtimes"

[dependencies]
name = "DNU"
command = "echo restore"
marker = "approot/packages"

[release]
web = "dnx kestrel"
"#,
    )
    .unwrap()
  }

  #[test]
  fn plan_orders_steps_like_the_compile_flow() {
    let cache = ArtifactCache::new("/tmp/packhorse-cache");
    let steps = plan(&full_config(), &cache);

    let names: Vec<_> = steps.iter().map(|s| s.name().to_string()).collect();
    assert_eq!(
      names,
      vec![
        "Restoring files from build cache",
        "Extracting libuv",
        "Importing root certificates",
        "Installing DNVM",
        "Installing DNX with DNVM",
        "Restoring dependencies with DNU",
        "Saving to build cache",
        "Writing release manifest",
      ]
    );
  }

  #[test]
  fn empty_config_yields_empty_plan() {
    let cache = ArtifactCache::new("/tmp/packhorse-cache");
    let steps = plan(&CompileConfig::default(), &cache);

    assert!(steps.is_empty());
  }

  #[test]
  #[cfg(unix)]
  fn compile_provisions_and_caches_the_workspace() {
    let temp = tempfile::tempdir().unwrap();
    let workspace = temp.path().join("workspace");
    let cache_root = temp.path().join("cache");
    fs::create_dir_all(&workspace).unwrap();

    let config: CompileConfig = toml::from_str(
      r#"
[cache]
keys = [".dnx"]

[toolchain]
name = "DNVM"
install = "mkdir -p .dnx && touch .dnx/installed"
marker = ".dnx"

[release]
web = "run-the-app"
"#,
    )
    .unwrap();

    let result = compile(&config, &workspace, &cache_root, &mut NullSink);

    assert!(result.is_success(), "failure: {:?}", result.failure());
    assert!(workspace.join(".dnx").join("installed").exists());
    assert!(cache_root.join(".dnx").join("installed").exists());
    assert!(workspace.join("release.yml").exists());
  }

  #[test]
  #[cfg(unix)]
  fn second_compile_skips_installed_toolchain() {
    let temp = tempfile::tempdir().unwrap();
    let workspace = temp.path().join("workspace");
    let cache_root = temp.path().join("cache");
    fs::create_dir_all(&workspace).unwrap();

    let config: CompileConfig = toml::from_str(
      r#"
[toolchain]
name = "DNVM"
install = "mkdir -p .dnx && touch .dnx/installed"
marker = ".dnx"
"#,
    )
    .unwrap();

    let first = compile(&config, &workspace, &cache_root, &mut NullSink);
    assert_eq!(first.count(StepState::Succeeded), 1);

    let second = compile(&config, &workspace, &cache_root, &mut NullSink);
    assert_eq!(second.count(StepState::Skipped), 1);
  }

  #[test]
  #[cfg(unix)]
  fn restored_cache_satisfies_the_idempotency_check() {
    let temp = tempfile::tempdir().unwrap();
    let first_ws = temp.path().join("first");
    let second_ws = temp.path().join("second");
    let cache_root = temp.path().join("cache");
    fs::create_dir_all(&first_ws).unwrap();
    fs::create_dir_all(&second_ws).unwrap();

    let config: CompileConfig = toml::from_str(
      r#"
[cache]
keys = [".dnx"]

[toolchain]
name = "DNVM"
install = "mkdir -p .dnx && touch .dnx/installed"
marker = ".dnx"
"#,
    )
    .unwrap();

    let first = compile(&config, &first_ws, &cache_root, &mut NullSink);
    assert!(first.is_success());

    // Second workspace never runs the installer: restore brings .dnx back.
    let second = compile(&config, &second_ws, &cache_root, &mut NullSink);
    assert!(second.is_success());
    assert_eq!(second.count(StepState::Skipped), 1);
    assert!(second_ws.join(".dnx").join("installed").exists());
  }

  #[test]
  #[cfg(unix)]
  fn failing_installer_halts_and_names_the_step() {
    let temp = tempfile::tempdir().unwrap();
    let workspace = temp.path().join("workspace");
    let cache_root = temp.path().join("cache");
    fs::create_dir_all(&workspace).unwrap();

    let config: CompileConfig = toml::from_str(
      r#"
[toolchain]
name = "DNVM"
install = "exit 1"

[release]
web = "never-reached"
"#,
    )
    .unwrap();

    let result = compile(&config, &workspace, &cache_root, &mut NullSink);

    let failure = result.failure().unwrap();
    assert_eq!(failure.step, "Installing DNVM");
    assert!(failure.to_string().starts_with("Installing DNVM failed, "));
    assert!(!workspace.join("release.yml").exists(), "later steps must not run");
  }
}
