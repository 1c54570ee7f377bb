//! Root-certificate import.

use std::path::{Path, PathBuf};

use super::StepError;
use crate::config::CertsConfig;
use crate::pipeline::{StepAction, StepResult};
use crate::report::StepReporter;
use crate::shell::Shell;
use crate::util::copy_tree;

/// Workspace-relative path the imported cert store ends up at.
///
/// The import command populates `source`; the last component of that
/// directory is copied under `dest`. Its presence is the idempotency probe.
pub(super) fn store_path(config: &CertsConfig) -> PathBuf {
  let name = config.source.file_name().unwrap_or(config.source.as_os_str());
  Path::new(&config.dest).join(name)
}

/// Runs the certificate import command, then copies the produced store into
/// the workspace.
pub struct CertImporter {
  import: String,
  source: PathBuf,
  dest: String,
  shell: Shell,
}

impl CertImporter {
  pub fn new(config: &CertsConfig, shell: Shell) -> Self {
    Self {
      import: config.import.clone(),
      source: config.source.clone(),
      dest: config.dest.clone(),
      shell,
    }
  }

  fn import(&self, workspace: &Path, reporter: &mut dyn StepReporter) -> Result<(), StepError> {
    let mut shell = self.shell.clone();
    shell.env("HOME", workspace.to_string_lossy());
    shell.exec(&self.import, workspace, reporter)?;

    let name = self.source.file_name().unwrap_or(self.source.as_os_str());
    let dest = workspace.join(&self.dest).join(name);
    copy_tree(&self.source, &dest).map_err(|e| StepError::CopyCerts {
      from: self.source.clone(),
      to: dest.clone(),
      source: e,
    })?;

    reporter.output(&format!("certificate store at {}", dest.display()));
    Ok(())
  }
}

impl StepAction for CertImporter {
  fn perform(&self, workspace: &Path, reporter: &mut dyn StepReporter) -> StepResult {
    self.import(workspace, reporter)?;
    Ok(())
  }
}
