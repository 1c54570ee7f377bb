//! Shell command execution for script-based collaborators.
//!
//! Commands run through the platform shell with an explicit environment
//! overlay instead of mutating process-global state. Output is captured and
//! forwarded line by line to the step reporter. Execution blocks until the
//! command exits; bounding a hanging command is the collaborator's problem,
//! not the pipeline's.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

use crate::report::StepReporter;

/// Errors from shell execution.
#[derive(Debug, Error)]
pub enum ShellError {
  /// The shell itself could not be spawned.
  #[error("failed to spawn shell for command '{cmd}': {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: io::Error,
  },

  /// The command exited with a non-zero status.
  #[error("command failed with exit code {code:?}: {cmd}")]
  CmdFailed { cmd: String, code: Option<i32> },
}

#[cfg(unix)]
fn shell_bin() -> (&'static str, &'static str) {
  ("/bin/sh", "-c")
}

#[cfg(windows)]
fn shell_bin() -> (&'static str, &'static str) {
  ("cmd.exe", "/C")
}

/// A shell with a fixed environment overlay.
///
/// Overlay entries are applied on top of the inherited environment; install
/// scripts rely on `PATH` but must see an explicit `HOME` and friends rather
/// than whatever the enclosing process happens to carry.
#[derive(Debug, Clone, Default)]
pub struct Shell {
  env: BTreeMap<String, String>,
}

impl Shell {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_env(env: BTreeMap<String, String>) -> Self {
    Self { env }
  }

  /// Set one overlay variable.
  pub fn env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
    self.env.insert(key.into(), value.into());
    self
  }

  /// Run `cmd` with `cwd` as working directory.
  ///
  /// Stdout and stderr lines are forwarded to `reporter`. A non-zero exit
  /// status is an error carrying the command line and exit code.
  pub fn exec(&self, cmd: &str, cwd: &Path, reporter: &mut dyn StepReporter) -> Result<(), ShellError> {
    info!(cmd = %cmd, cwd = %cwd.display(), "executing command");
    let (bin, flag) = shell_bin();

    let output = Command::new(bin)
      .arg(flag)
      .arg(cmd)
      .current_dir(cwd)
      .envs(&self.env)
      .output()
      .map_err(|e| ShellError::Spawn {
        cmd: cmd.to_string(),
        source: e,
      })?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
      reporter.output(line);
    }
    for line in String::from_utf8_lossy(&output.stderr).lines() {
      reporter.output(line);
    }

    if !output.status.success() {
      return Err(ShellError::CmdFailed {
        cmd: cmd.to_string(),
        code: output.status.code(),
      });
    }

    debug!(cmd = %cmd, "command succeeded");
    Ok(())
  }
}
