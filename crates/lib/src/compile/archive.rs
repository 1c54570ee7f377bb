//! Runtime component archive extraction.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::info;

use super::StepError;
use crate::pipeline::{StepAction, StepResult};
use crate::report::StepReporter;

/// Extracts a local `.tar.gz` into a workspace-relative directory.
///
/// Fetching the archive (transport, checksums) is someone else's job; by the
/// time this runs, `source` is a file on disk.
pub struct ArchiveExtractor {
  source: PathBuf,
  dest: String,
}

impl ArchiveExtractor {
  pub fn new(source: &Path, dest: &str) -> Self {
    Self {
      source: source.to_path_buf(),
      dest: dest.to_string(),
    }
  }

  fn extract(&self, workspace: &Path, reporter: &mut dyn StepReporter) -> Result<(), StepError> {
    let target = workspace.join(&self.dest);
    fs::create_dir_all(&target).map_err(|e| StepError::Write {
      path: target.clone(),
      source: e,
    })?;

    let file = File::open(&self.source).map_err(|e| StepError::OpenArchive {
      path: self.source.clone(),
      source: e,
    })?;

    info!(source = %self.source.display(), target = %target.display(), "unpacking archive");
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    archive.unpack(&target).map_err(|e| StepError::Unpack {
      path: self.source.clone(),
      dest: target.clone(),
      source: e,
    })?;

    reporter.output(&format!("unpacked into {}", self.dest));
    Ok(())
  }
}

impl StepAction for ArchiveExtractor {
  fn perform(&self, workspace: &Path, reporter: &mut dyn StepReporter) -> StepResult {
    self.extract(workspace, reporter)?;
    Ok(())
  }
}
