//! Lexical path helpers; nothing here touches the filesystem beyond the working directory.

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{PackagerError, PackagerResult};

/// Fold `.` and `..` segments without consulting the filesystem.
///
/// Leading `..` segments of a relative path are kept; `..` directly under the root is dropped.
/// An empty result is returned as `.`.
pub fn normalize(path: &Path) -> PathBuf {
  let mut parts: Vec<Component<'_>> = Vec::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match parts.last() {
        Some(Component::Normal(_)) => {
          parts.pop();
        }
        Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
        _ => parts.push(component),
      },
      other => parts.push(other),
    }
  }

  if parts.is_empty() {
    return PathBuf::from(".");
  }
  parts.iter().collect()
}

/// Anchor a path at the current working directory and normalise it.
pub fn absolutize(path: &Path) -> PackagerResult<PathBuf> {
  let absolute = if path.as_os_str().is_empty() {
    env::current_dir()
  } else {
    std::path::absolute(path)
  }
  .map_err(|err| PackagerError::io(path, err))?;
  Ok(normalize(&absolute))
}

/// Compute the path leading from `from` to `to`.
///
/// Both inputs are made absolute first, so relative inputs are interpreted against the current
/// working directory. Identical paths yield an empty path.
pub fn relative_path(from: &Path, to: &Path) -> PackagerResult<PathBuf> {
  let from = absolutize(from)?;
  let to = absolutize(to)?;
  Ok(diff_absolute(&from, &to))
}

/// Whether `file` sits at or below `root`.
pub fn is_ancestor(root: &Path, file: &Path) -> PackagerResult<bool> {
  let relative = relative_path(root, file)?;
  Ok(matches!(
    relative.components().next(),
    None | Some(Component::Normal(_))
  ))
}

fn diff_absolute(from: &Path, to: &Path) -> PathBuf {
  let from_parts: Vec<Component<'_>> = from.components().collect();
  let to_parts: Vec<Component<'_>> = to.components().collect();

  let common = from_parts
    .iter()
    .zip(&to_parts)
    .take_while(|(left, right)| left == right)
    .count();

  // Different prefixes (e.g. drive letters) have no relative form.
  if common == 0 {
    return to.to_path_buf();
  }

  let mut relative = PathBuf::new();
  for _ in common..from_parts.len() {
    relative.push("..");
  }
  for part in &to_parts[common..] {
    relative.push(part);
  }
  relative
}
