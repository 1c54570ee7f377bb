//! Pipeline orchestration.
//!
//! A [`Pipeline`] executes a fixed, ordered list of [`PipelineStep`]s exactly
//! once each:
//!
//! 1. If the step's idempotency check reports its effect as already present,
//!    the step is recorded as skipped and its action never runs.
//! 2. Otherwise the action runs against the workspace with a reporter scoped
//!    to the step.
//! 3. Any error from the action is wrapped with the step name and halts the
//!    pipeline; no later step runs.
//!
//! Execution is strictly sequential. There is no reordering, no parallelism,
//! no retry and no rollback of already-applied steps.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info};

use crate::report::{ReportSink, StepReporter};

/// Result type returned by step actions.
///
/// Collaborators keep their own error types; the orchestrator only needs the
/// message, so the boundary is a boxed error.
pub type StepResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// A unit of provisioning work invoked by a pipeline step.
///
/// Implemented by the concrete collaborators in [`crate::compile`]; closures
/// with the same shape work via the blanket impl.
pub trait StepAction {
  fn perform(&self, workspace: &Path, reporter: &mut dyn StepReporter) -> StepResult;
}

impl<F> StepAction for F
where
  F: Fn(&Path, &mut dyn StepReporter) -> StepResult,
{
  fn perform(&self, workspace: &Path, reporter: &mut dyn StepReporter) -> StepResult {
    self(workspace, reporter)
  }
}

/// One ordered unit of work in a pipeline.
///
/// Constructed once per run, in declared order, and never mutated.
pub struct PipelineStep {
  name: String,
  check: Option<Box<dyn Fn(&Path) -> bool>>,
  action: Box<dyn StepAction>,
}

impl PipelineStep {
  /// Create a step that always runs its action.
  pub fn new(name: impl Into<String>, action: impl StepAction + 'static) -> Self {
    Self {
      name: name.into(),
      check: None,
      action: Box::new(action),
    }
  }

  /// Skip the step when `target` (relative to the workspace) exists.
  ///
  /// The probe is a plain existence check. If the filesystem cannot answer,
  /// the target counts as absent and the step re-runs rather than silently
  /// skipping over a missing artifact.
  pub fn skip_if_present(self, target: impl Into<PathBuf>) -> Self {
    let target = target.into();
    self.skip_when(move |workspace: &Path| workspace.join(&target).exists())
  }

  /// Skip the step when `check` returns true.
  ///
  /// Checks must be cheap and side-effect free; they cannot fail the
  /// pipeline.
  pub fn skip_when(mut self, check: impl Fn(&Path) -> bool + 'static) -> Self {
    self.check = Some(Box::new(check));
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  fn already_applied(&self, workspace: &Path) -> bool {
    match &self.check {
      Some(check) => check(workspace),
      None => false,
    }
  }
}

impl std::fmt::Debug for PipelineStep {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PipelineStep")
      .field("name", &self.name)
      .field("check", &self.check.is_some())
      .finish_non_exhaustive()
  }
}

/// Terminal state of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
  Skipped,
  Succeeded,
  Failed,
}

/// Outcome of running one step. `message` is set only on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
  pub name: String,
  pub state: StepState,
  pub message: Option<String>,
}

impl StepOutcome {
  fn skipped(name: &str) -> Self {
    Self {
      name: name.to_string(),
      state: StepState::Skipped,
      message: None,
    }
  }

  fn succeeded(name: &str) -> Self {
    Self {
      name: name.to_string(),
      state: StepState::Succeeded,
      message: None,
    }
  }

  fn failed(name: &str, message: &str) -> Self {
    Self {
      name: name.to_string(),
      state: StepState::Failed,
      message: Some(message.to_string()),
    }
  }
}

/// A step's action raised an error. Tags the collaborator's message with the
/// step name; this is the pipeline's terminal error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{step} failed, {message}")]
pub struct StepFailure {
  pub step: String,
  pub message: String,
}

/// Aggregate result of one pipeline run.
#[derive(Debug)]
pub struct PipelineResult {
  outcomes: Vec<StepOutcome>,
  failure: Option<StepFailure>,
}

impl PipelineResult {
  pub fn is_success(&self) -> bool {
    self.failure.is_none()
  }

  /// Outcomes of the steps that were reached, in execution order.
  pub fn outcomes(&self) -> &[StepOutcome] {
    &self.outcomes
  }

  pub fn failure(&self) -> Option<&StepFailure> {
    self.failure.as_ref()
  }

  pub fn count(&self, state: StepState) -> usize {
    self.outcomes.iter().filter(|o| o.state == state).count()
  }
}

/// An ordered, fixed sequence of steps.
pub struct Pipeline {
  steps: Vec<PipelineStep>,
}

impl Pipeline {
  pub fn new(steps: Vec<PipelineStep>) -> Self {
    Self { steps }
  }

  pub fn step_names(&self) -> impl Iterator<Item = &str> {
    self.steps.iter().map(|s| s.name())
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  /// Run every step in declared order against `workspace`.
  ///
  /// Halts on the first failing step; steps after it are never invoked and do
  /// not appear in the result's outcomes.
  pub fn run(&self, workspace: &Path, sink: &mut dyn ReportSink) -> PipelineResult {
    let mut outcomes = Vec::with_capacity(self.steps.len());

    for step in &self.steps {
      let mut reporter = sink.begin_step(step.name());

      if step.already_applied(workspace) {
        debug!(step = %step.name(), "target present, skipping");
        reporter.succeed();
        outcomes.push(StepOutcome::skipped(step.name()));
        continue;
      }

      info!(step = %step.name(), "running step");
      match step.action.perform(workspace, reporter.as_mut()) {
        Ok(()) => {
          reporter.succeed();
          outcomes.push(StepOutcome::succeeded(step.name()));
        }
        Err(e) => {
          let message = e.to_string();
          error!(step = %step.name(), error = %message, "step failed, halting pipeline");
          reporter.fail(&message);
          outcomes.push(StepOutcome::failed(step.name(), &message));

          let failure = StepFailure {
            step: step.name().to_string(),
            message,
          };
          sink.fail(&failure.to_string());
          return PipelineResult {
            outcomes,
            failure: Some(failure),
          };
        }
      }
    }

    info!(steps = outcomes.len(), "pipeline complete");
    PipelineResult {
      outcomes,
      failure: None,
    }
  }
}
