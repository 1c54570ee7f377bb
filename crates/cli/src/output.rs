//! CLI output formatting.
//!
//! Consistent terminal formatting: colored status lines, Unicode symbols,
//! human-readable byte/duration rendering, and the console implementation of
//! the pipeline's report sink.

use std::time::Duration;

use owo_colors::{OwoColorize, Stream};

use packhorse_lib::report::{ReportSink, StepReporter};

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
}

pub fn format_bytes(bytes: u64) -> String {
  const KB: u64 = 1024;
  const MB: u64 = KB * 1024;
  const GB: u64 = MB * 1024;

  if bytes >= GB {
    format!("{:.1} GB", bytes as f64 / GB as f64)
  } else if bytes >= MB {
    format!("{:.1} MB", bytes as f64 / MB as f64)
  } else if bytes >= KB {
    format!("{:.1} KB", bytes as f64 / KB as f64)
  } else {
    format!("{} B", bytes)
  }
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.cyan()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {} {}",
    format!("{label}:").if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

/// Console implementation of the pipeline report sink.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
  fn begin_step(&mut self, name: &str) -> Box<dyn StepReporter> {
    println!(
      "{} {}",
      symbols::ARROW.if_supports_color(Stream::Stdout, |s| s.cyan()),
      name
    );
    Box::new(ConsoleReporter)
  }

  fn fail(&mut self, message: &str) {
    print_error(message);
  }

  fn warn(&mut self, message: &str) {
    print_warning(message);
  }
}

struct ConsoleReporter;

impl StepReporter for ConsoleReporter {
  fn output(&mut self, line: &str) {
    println!("  {}", line.if_supports_color(Stream::Stdout, |s| s.dimmed()));
  }

  fn succeed(&mut self) {}

  fn fail(&mut self, message: &str) {
    eprintln!(
      "  {} {}",
      symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
      message.if_supports_color(Stream::Stderr, |s| s.red())
    );
  }
}
