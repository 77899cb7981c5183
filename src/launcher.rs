//! Generate the `pack` and `publish` launcher scripts for an assembled package.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::PackagerConfig;

/// Template shipped with the crate, used when no override is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/run_npm.sh.template");

/// npm action a launcher script performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherAction {
  /// `npm pack <out_dir>`
  Pack,
  /// `npm publish <out_dir>`
  Publish,
}

impl LauncherAction {
  fn verb(self) -> &'static str {
    match self {
      Self::Pack => "pack",
      Self::Publish => "publish",
    }
  }
}

/// Paths of the scripts written by [`write_launchers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherScripts {
  /// Script running `npm pack`.
  pub pack: PathBuf,
  /// Script running `npm publish`.
  pub publish: PathBuf,
}

/// Load the launcher template from the configured path, or fall back to the embedded one.
pub fn load_template(config: &PackagerConfig) -> Result<String> {
  match &config.template_path {
    Some(path) => fs::read_to_string(path)
      .with_context(|| format!("failed to read launcher template {}", path.display())),
    None => Ok(DEFAULT_TEMPLATE.to_string()),
  }
}

/// Substitute the first marker occurrence with `<action> <out_dir>`.
pub fn render_launcher(template: &str, marker: &str, action: LauncherAction, out_dir: &Path) -> String {
  let args = format!("{} {}", action.verb(), out_dir.display());
  template.replacen(marker, &args, 1)
}

/// Write both launcher scripts verbatim, without running them through the replacement pipeline.
pub fn write_launchers(
  template: &str,
  marker: &str,
  out_dir: &Path,
  pack_path: &Path,
  publish_path: &Path,
) -> Result<LauncherScripts> {
  for (action, path) in [
    (LauncherAction::Pack, pack_path),
    (LauncherAction::Publish, publish_path),
  ] {
    let script = render_launcher(template, marker, action, out_dir);
    fs::write(path, script).with_context(|| format!("failed to write {}", path.display()))?;
  }

  Ok(LauncherScripts {
    pack: pack_path.to_path_buf(),
    publish: publish_path.to_path_buf(),
  })
}
