//! Compile pipeline configuration.
//!
//! A `packhorse.toml` describes which provisioning steps the pipeline should
//! assemble: runtime archives to extract, install scripts to run, artifact
//! keys to cache, the certificate import, the release manifest, and an
//! optional advisory banner. Every section is optional; an empty config
//! yields an empty pipeline.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors from loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// Config file not found.
  #[error("config file not found: {0}")]
  NotFound(PathBuf),

  /// Failed to read the config file.
  #[error("failed to read '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Failed to parse the config file.
  #[error("failed to parse '{path}': {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

/// Top-level pipeline description.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompileConfig {
  /// Advisory banner printed before the run and again after a failed run.
  pub advisory: Option<String>,

  /// Environment overlay applied to every script collaborator.
  #[serde(default)]
  pub env: BTreeMap<String, String>,

  #[serde(default)]
  pub cache: CacheConfig,

  /// Runtime component archives to extract into the workspace.
  #[serde(default)]
  pub archives: Vec<ArchiveConfig>,

  pub certs: Option<CertsConfig>,

  /// Version-manager / toolchain installer.
  pub toolchain: Option<ScriptConfig>,

  /// Runtime installer (typically driven by the toolchain).
  pub runtime: Option<ScriptConfig>,

  pub dependencies: Option<RestoreConfig>,

  pub release: Option<ReleaseConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
  /// Artifact keys (workspace-relative subpaths) moved between the cache
  /// root and the workspace at the start and end of the run.
  #[serde(default)]
  pub keys: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveConfig {
  /// Display name, e.g. "libuv".
  pub name: String,

  /// Path to a local `.tar.gz`.
  pub source: PathBuf,

  /// Workspace-relative extraction directory. Defaults to `name`.
  pub dest: Option<String>,
}

impl ArchiveConfig {
  pub fn dest(&self) -> &str {
    self.dest.as_deref().unwrap_or(&self.name)
  }
}

/// A script-based installer.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptConfig {
  /// Display name, e.g. "DNVM" or "DNX with DNVM".
  pub name: String,

  /// Command line handed to the shell, cwd = workspace, HOME = workspace.
  pub install: String,

  /// Workspace-relative path whose presence means the installer already ran.
  pub marker: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestoreConfig {
  /// Display name of the restore tool, e.g. "DNU".
  pub name: Option<String>,

  /// Command line handed to the shell.
  pub command: String,

  /// Workspace-relative path whose presence means dependencies are restored.
  pub marker: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CertsConfig {
  /// Import command, e.g. `mozroots --import --sync`.
  pub import: String,

  /// Directory the import command populates.
  pub source: PathBuf,

  /// Workspace-relative directory the cert store is copied under.
  pub dest: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfig {
  /// Workspace-relative manifest path.
  #[serde(default = "default_release_path")]
  pub path: String,

  /// Command line for the `web` process type.
  pub web: String,
}

fn default_release_path() -> String {
  "release.yml".to_string()
}

impl CompileConfig {
  /// Load a config from a TOML file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    if !path.exists() {
      return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
      path: path.to_path_buf(),
      source: e,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
      path: path.to_path_buf(),
      source: e,
    })
  }
}
