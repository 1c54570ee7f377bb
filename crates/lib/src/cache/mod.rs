//! Artifact cache.
//!
//! Copies named artifact directories between a persistent cache root and the
//! build workspace. Both directions are first-writer-wins for the lifetime of
//! the cache: a restore never overwrites an existing workspace entry, a save
//! never overwrites an existing cache entry. Entry content is opaque; an
//! existence probe is the only liveness check.
//!
//! The cache root is assumed single-writer. One pipeline run per
//! (workspace, cache root) pair; no locking is implemented.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::util::copy_tree;

/// Errors from cache copy operations.
#[derive(Debug, Error)]
pub enum CacheError {
  /// Failed to copy an artifact directory.
  #[error("failed to copy '{from}' to '{to}': {source}")]
  CopyDir {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// A persistent directory of named artifacts, keyed by relative subpath.
#[derive(Debug, Clone)]
pub struct ArtifactCache {
  cache_root: PathBuf,
}

impl ArtifactCache {
  pub fn new(cache_root: impl Into<PathBuf>) -> Self {
    Self {
      cache_root: cache_root.into(),
    }
  }

  pub fn root(&self) -> &Path {
    &self.cache_root
  }

  /// Whether the cache currently holds `key`.
  pub fn has(&self, key: &str) -> bool {
    self.cache_root.join(key).exists()
  }

  /// Copy the cached artifact `key` to `dest_dir/key`.
  ///
  /// No-op if the cache does not hold `key`, or if the destination already
  /// exists (the workspace entry wins).
  pub fn restore(&self, key: &str, dest_dir: &Path) -> Result<(), CacheError> {
    let src = self.cache_root.join(key);
    if !src.exists() {
      debug!(key, "cache entry absent, nothing to restore");
      return Ok(());
    }

    let dest = dest_dir.join(key);
    if dest.exists() {
      debug!(key, "workspace entry already present, not overwriting");
      return Ok(());
    }

    info!(key, from = %src.display(), to = %dest.display(), "restoring from cache");
    copy_tree(&src, &dest).map_err(|e| CacheError::CopyDir {
      from: src,
      to: dest,
      source: e,
    })
  }

  /// Copy `source_dir/key` into the cache as `key`.
  ///
  /// No-op if the cache already holds `key`. A missing source is a copy
  /// failure: existence was mis-detected by the caller, and that should
  /// surface rather than be masked.
  pub fn save(&self, key: &str, source_dir: &Path) -> Result<(), CacheError> {
    let dest = self.cache_root.join(key);
    if dest.exists() {
      debug!(key, "cache already holds entry, not overwriting");
      return Ok(());
    }

    let src = source_dir.join(key);
    info!(key, from = %src.display(), to = %dest.display(), "saving to cache");
    copy_tree(&src, &dest).map_err(|e| CacheError::CopyDir {
      from: src,
      to: dest,
      source: e,
    })
  }
}
