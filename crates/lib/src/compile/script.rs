//! Script-based collaborators.

use std::path::Path;

use crate::pipeline::{StepAction, StepResult};
use crate::report::StepReporter;
use crate::shell::Shell;

/// Runs a configured command line through the shell.
///
/// The workspace is both the working directory and `HOME`: install scripts
/// write under `$HOME`, and pinning it to the workspace keeps everything they
/// produce inside the build output instead of the invoking user's home.
pub struct ScriptRunner {
  command: String,
  shell: Shell,
}

impl ScriptRunner {
  pub fn new(command: &str, shell: Shell) -> Self {
    Self {
      command: command.to_string(),
      shell,
    }
  }
}

impl StepAction for ScriptRunner {
  fn perform(&self, workspace: &Path, reporter: &mut dyn StepReporter) -> StepResult {
    let mut shell = self.shell.clone();
    shell.env("HOME", workspace.to_string_lossy());
    shell.exec(&self.command, workspace, reporter)?;
    Ok(())
  }
}
