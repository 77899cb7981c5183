//! Tunable constants for stamping and launcher generation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PackagerError, PackagerResult};

const DEFAULT_CONFIG_FILE: &str = "npm_packager.json";

/// Settings that the build rule does not pass through the parameter file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PackagerConfig {
  /// Stamp file key whose value is the resolved source control version.
  pub version_key: String,
  /// Token in copied files replaced with the stamped version.
  pub version_placeholder: String,
  /// Marker in the launcher template replaced with the npm arguments.
  pub template_marker: String,
  /// Launcher template to use instead of the embedded one.
  pub template_path: Option<PathBuf>,
}

impl Default for PackagerConfig {
  fn default() -> Self {
    Self {
      version_key: "BUILD_SCM_VERSION".into(),
      version_placeholder: "0.0.0-PLACEHOLDER".into(),
      template_marker: "TMPL_args".into(),
      template_path: None,
    }
  }
}

impl PackagerConfig {
  /// Look for a configuration file in the provided directory.
  ///
  /// A missing file yields the defaults; a file that exists but cannot be read or parsed is an
  /// error.
  pub fn discover(dir: &Path) -> PackagerResult<Self> {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    match Self::from_path(&candidate) {
      Err(PackagerError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
        Ok(Self::default())
      }
      result => result,
    }
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> PackagerResult<Self> {
    let content = fs::read_to_string(path).map_err(|err| PackagerError::io(path, err))?;
    serde_json::from_str(&content)
      .map_err(|err| PackagerError::parameter(path.display().to_string(), err.to_string()))
  }

  /// Override the launcher template location.
  pub fn with_template_path(mut self, path: impl Into<PathBuf>) -> Self {
    self.template_path = Some(path.into());
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn discover_falls_back_to_defaults() {
    let temp = tempdir().expect("failed to create temp dir");
    assert_eq!(
      PackagerConfig::discover(temp.path()).unwrap(),
      PackagerConfig::default()
    );
  }

  #[test]
  fn partial_files_keep_remaining_defaults() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join(DEFAULT_CONFIG_FILE);
    fs::write(&path, r#"{"version_key": "STABLE_VERSION"}"#).unwrap();

    let config = PackagerConfig::discover(temp.path()).unwrap();
    assert_eq!(config.version_key, "STABLE_VERSION");
    assert_eq!(config.version_placeholder, "0.0.0-PLACEHOLDER");
    assert_eq!(config.template_marker, "TMPL_args");
  }

  #[test]
  fn discover_reports_malformed_json() {
    let temp = tempdir().expect("failed to create temp dir");
    fs::write(temp.path().join(DEFAULT_CONFIG_FILE), r#"{"version_key": 7}"#).unwrap();

    let err = PackagerConfig::discover(temp.path()).unwrap_err();
    assert!(matches!(err, PackagerError::ParameterFormat { .. }));
    assert!(err.to_string().contains(DEFAULT_CONFIG_FILE));
  }

  #[test]
  fn from_path_reports_malformed_json() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("broken.json");
    fs::write(&path, "{").unwrap();

    let err = PackagerConfig::from_path(&path).unwrap_err();
    assert!(matches!(err, PackagerError::ParameterFormat { .. }));
  }
}
