//! packhorse: staged, cache-aware provisioning for build workspaces.

mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "packhorse")]
#[command(version, about = "Staged, cache-aware provisioning for build workspaces")]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Provision a build workspace
  Compile {
    /// Path to the build workspace
    build_dir: PathBuf,

    /// Persistent cache root (default: $PACKHORSE_CACHE_DIR or the user cache dir)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Pipeline config (default: packhorse.toml inside the build dir)
    #[arg(long)]
    config: Option<PathBuf>,
  },

  /// Print the steps a compile would run, without executing them
  Plan {
    /// Path to the build workspace
    build_dir: PathBuf,

    /// Persistent cache root (default: $PACKHORSE_CACHE_DIR or the user cache dir)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Pipeline config (default: packhorse.toml inside the build dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
  },
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  let cli = Cli::parse();
  match run(cli) {
    Ok(code) => code,
    Err(e) => {
      output::print_error(&format!("{e:#}"));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<ExitCode> {
  match cli.command {
    Commands::Compile {
      build_dir,
      cache_dir,
      config,
    } => cmd::cmd_compile(&build_dir, cache_dir.as_deref(), config.as_deref()),
    Commands::Plan {
      build_dir,
      cache_dir,
      config,
      json,
    } => cmd::cmd_plan(&build_dir, cache_dir.as_deref(), config.as_deref(), json),
  }
}
