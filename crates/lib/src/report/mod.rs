//! Step progress reporting.
//!
//! The pipeline reports progress through a [`ReportSink`], which hands out one
//! [`StepReporter`] per step. The sink is a pure side-effect channel (console,
//! log aggregator, test recorder): it never influences control flow, and a
//! no-op implementation is valid.

/// Per-step reporting handle.
///
/// For every step the pipeline begins, exactly one of [`succeed`] or [`fail`]
/// is invoked, never both, after the step concludes. A skipped step counts as
/// succeeded.
///
/// [`succeed`]: StepReporter::succeed
/// [`fail`]: StepReporter::fail
pub trait StepReporter {
  /// Forward one line of collaborator output (e.g. from a shell command).
  fn output(&mut self, line: &str);

  /// Mark the step as concluded successfully.
  fn succeed(&mut self);

  /// Mark the step as failed with the collaborator's message.
  fn fail(&mut self, message: &str);
}

/// Receives pipeline progress.
pub trait ReportSink {
  /// Called once per step, before its idempotency check runs.
  fn begin_step(&mut self, name: &str) -> Box<dyn StepReporter>;

  /// Called once if the pipeline halts early, with the terminal failure
  /// message (step name plus the collaborator's error text).
  fn fail(&mut self, message: &str);

  /// Advisory warning outside the step flow. Optional channel.
  fn warn(&mut self, _message: &str) {}
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReportSink for NullSink {
  fn begin_step(&mut self, _name: &str) -> Box<dyn StepReporter> {
    Box::new(NullReporter)
  }

  fn fail(&mut self, _message: &str) {}
}

/// Reporter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl StepReporter for NullReporter {
  fn output(&mut self, _line: &str) {}

  fn succeed(&mut self) {}

  fn fail(&mut self, _message: &str) {}
}
