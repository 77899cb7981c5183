//! Reading the version out of build stamp files.
//!
//! A stamp file looks like:
//!
//! ```text
//! BUILD_SCM_HASH 83c699db39cfd74526cdf9bebb75aa6f122908bb
//! BUILD_SCM_LOCAL_CHANGES true
//! BUILD_SCM_VERSION 6.0.0-beta.6+12.sha-83c699d.with-local-changes
//! BUILD_TIMESTAMP 1520021990506
//! ```

use std::fs;
use std::path::Path;

use crate::error::{PackagerError, PackagerResult};

/// Read the stamp file and return the value stored under `key`.
///
/// A file without that key, or with an empty value for it, yields `Ok(None)`.
pub fn read_stamp_value(path: &Path, key: &str) -> PackagerResult<Option<String>> {
  let content = fs::read_to_string(path).map_err(|err| PackagerError::io(path, err))?;
  Ok(find_stamp_value(&content, key))
}

/// Locate `key` in stamp file contents and return its value.
pub fn find_stamp_value(content: &str, key: &str) -> Option<String> {
  content.lines().find_map(|line| {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some(key) {
      return None;
    }
    tokens.next().map(str::to_string)
  })
}
