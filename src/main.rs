//! Command line entry point invoked by the build rule.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use npm_packager::{Packager, PackagerConfig};

#[derive(Parser)]
#[command(name = "npm_packager")]
#[command(about = "Assemble an npm package directory from build outputs")]
struct Cli {
  /// Newline-delimited parameter file written by the build rule.
  params_file: PathBuf,

  /// JSON file overriding the stamping and launcher settings.
  #[arg(long)]
  config: Option<PathBuf>,

  /// Launcher template replacing the embedded one.
  #[arg(long)]
  template: Option<PathBuf>,

  /// Log every copied file.
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("npm_packager: {err:#}");
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let mut config = match &cli.config {
    Some(path) => PackagerConfig::from_path(path)?,
    None => PackagerConfig::discover(&std::env::current_dir()?)?,
  };
  if let Some(template) = cli.template {
    config = config.with_template_path(template);
  }

  let packager = Packager::from_parameter_file(&cli.params_file, config)?;
  let report = packager.run()?;
  tracing::info!(
    out_dir = %packager.params().out_dir.display(),
    files = report.sources + report.dependencies + report.package_files,
    "package assembled"
  );
  Ok(())
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}
