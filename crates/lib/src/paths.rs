//! Default filesystem locations.

use std::path::PathBuf;

/// Environment variable overriding the default cache root.
pub const CACHE_DIR_ENV: &str = "PACKHORSE_CACHE_DIR";

/// Default cache root for pipeline runs.
///
/// `PACKHORSE_CACHE_DIR` wins if set; otherwise the platform cache directory
/// (`~/.cache/packhorse` on Linux). Falls back to a relative directory when
/// the platform reports no cache dir at all.
pub fn default_cache_dir() -> PathBuf {
  if let Ok(path) = std::env::var(CACHE_DIR_ENV) {
    return PathBuf::from(path);
  }

  dirs::cache_dir()
    .map(|dir| dir.join("packhorse"))
    .unwrap_or_else(|| PathBuf::from(".packhorse-cache"))
}
