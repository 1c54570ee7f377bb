//! Release manifest writer.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::StepError;
use crate::config::ReleaseConfig;
use crate::pipeline::{StepAction, StepResult};
use crate::report::StepReporter;

#[derive(Debug, Serialize)]
struct ReleaseManifest {
  default_process_types: ProcessTypes,
}

#[derive(Debug, Serialize)]
struct ProcessTypes {
  web: String,
}

/// Writes the release manifest describing how to launch the provisioned app.
///
/// Written on every run, even when nothing else changed: the manifest is
/// derived from config, not from workspace state.
pub struct ReleaseWriter {
  path: String,
  web: String,
}

impl ReleaseWriter {
  pub fn new(config: &ReleaseConfig) -> Self {
    Self {
      path: config.path.clone(),
      web: config.web.clone(),
    }
  }

  fn write(&self, workspace: &Path, reporter: &mut dyn StepReporter) -> Result<(), StepError> {
    let manifest = ReleaseManifest {
      default_process_types: ProcessTypes { web: self.web.clone() },
    };
    let yaml = serde_yaml::to_string(&manifest)?;

    let path = workspace.join(&self.path);
    fs::write(&path, yaml).map_err(|e| StepError::Write {
      path: path.clone(),
      source: e,
    })?;

    info!(path = %path.display(), "release manifest written");
    reporter.output(&format!("wrote {}", self.path));
    Ok(())
  }
}

impl StepAction for ReleaseWriter {
  fn perform(&self, workspace: &Path, reporter: &mut dyn StepReporter) -> StepResult {
    self.write(workspace, reporter)?;
    Ok(())
  }
}
