//! Decoding of the newline-delimited parameter file written by the build rule.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PackagerError, PackagerResult};

/// Names of the positional fields, in file order.
const FIELD_NAMES: [&str; 11] = [
  "out_dir",
  "base_dir",
  "srcs",
  "bin_dir",
  "gen_dir",
  "deps",
  "packages",
  "replacements",
  "pack_path",
  "publish_path",
  "stamp_file",
];

/// Number of fields that must always be present; the stamp file may be omitted.
const REQUIRED_FIELDS: usize = FIELD_NAMES.len() - 1;

/// Every input the packager needs for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
  /// Directory the package is assembled into.
  pub out_dir: PathBuf,
  /// Package directory relative to the workspace root.
  pub base_dir: PathBuf,
  /// Plain source files, already located under `base_dir`.
  pub srcs: Vec<PathBuf>,
  /// Root of the compiled binaries tree.
  pub bin_dir: PathBuf,
  /// Root of the generated files tree.
  pub gen_dir: PathBuf,
  /// Single files living under either the binaries or the generated root.
  pub deps: Vec<PathBuf>,
  /// Directories whose whole contents are copied into the package.
  pub packages: Vec<PathBuf>,
  /// Raw JSON object mapping regex patterns to replacement strings.
  pub replacements_json: String,
  /// Destination of the `pack` launcher script.
  pub pack_path: PathBuf,
  /// Destination of the `publish` launcher script.
  pub publish_path: PathBuf,
  /// Build metadata file used for version stamping, when stamping is enabled.
  pub stamp_file: Option<PathBuf>,
}

impl ParameterSet {
  /// Read and decode a parameter file from disk.
  pub fn load(path: &Path) -> PackagerResult<Self> {
    let content = fs::read_to_string(path).map_err(|err| PackagerError::io(path, err))?;
    Self::parse(&content)
  }

  /// Decode the parameter file contents.
  ///
  /// Each line holds one field; a single layer of enclosing single quotes is removed. A final
  /// newline after the last field is tolerated.
  pub fn parse(content: &str) -> PackagerResult<Self> {
    let mut fields: Vec<&str> = content.split('\n').map(unquote).collect();
    if fields.len() > REQUIRED_FIELDS && fields.last().is_some_and(|last| last.is_empty()) {
      fields.pop();
    }

    if fields.len() < REQUIRED_FIELDS || fields.len() > FIELD_NAMES.len() {
      return Err(PackagerError::parameter(
        "parameter file",
        format!(
          "expected {} or {} lines, found {}",
          REQUIRED_FIELDS,
          FIELD_NAMES.len(),
          fields.len()
        ),
      ));
    }

    let stamp_file = fields
      .get(REQUIRED_FIELDS)
      .filter(|value| !value.is_empty())
      .map(PathBuf::from);

    let params = Self {
      out_dir: required_path(&fields, 0)?,
      base_dir: PathBuf::from(fields[1]),
      srcs: split_list(fields[2]),
      bin_dir: required_path(&fields, 3)?,
      gen_dir: required_path(&fields, 4)?,
      deps: split_list(fields[5]),
      packages: split_list(fields[6]),
      replacements_json: fields[7].to_string(),
      pack_path: required_path(&fields, 8)?,
      publish_path: required_path(&fields, 9)?,
      stamp_file,
    };
    Ok(params)
  }
}

/// Strip one layer of enclosing single quotes, if present on both ends.
pub fn unquote(value: &str) -> &str {
  let value = value.strip_suffix('\r').unwrap_or(value);
  value
    .strip_prefix('\'')
    .and_then(|inner| inner.strip_suffix('\''))
    .unwrap_or(value)
}

fn required_path(fields: &[&str], index: usize) -> PackagerResult<PathBuf> {
  let value = fields[index];
  if value.is_empty() {
    return Err(PackagerError::parameter(
      FIELD_NAMES[index],
      "value must not be empty",
    ));
  }
  Ok(PathBuf::from(value))
}

fn split_list(value: &str) -> Vec<PathBuf> {
  value
    .split(',')
    .filter(|entry| !entry.is_empty())
    .map(PathBuf::from)
    .collect()
}
