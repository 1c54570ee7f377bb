//! Small filesystem helpers shared across modules.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Recursively copy `src` into `dst`, preserving the directory structure.
///
/// Creates `dst` (and missing parents) if needed. Symlinks are followed;
/// artifact directories are expected to be plain trees.
pub fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
  fs::create_dir_all(dst)?;
  for entry in fs::read_dir(src)? {
    let entry = entry?;
    let ty = entry.file_type()?;
    let dst_path = dst.join(entry.file_name());
    if ty.is_dir() {
      copy_tree(&entry.path(), &dst_path)?;
    } else {
      fs::copy(entry.path(), dst_path)?;
    }
  }
  Ok(())
}

/// Total size in bytes of all files under `path`.
///
/// Unreadable entries are counted as zero rather than failing; this feeds
/// summary output only.
pub fn tree_size(path: &Path) -> u64 {
  WalkDir::new(path)
    .into_iter()
    .filter_map(|entry| entry.ok())
    .filter(|entry| entry.file_type().is_file())
    .filter_map(|entry| entry.metadata().ok())
    .map(|meta| meta.len())
    .sum()
}
