//! Copying files and directory trees through the replacement pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PackagerError, PackagerResult};
use crate::transform::ReplacementPipeline;

/// Read `src` as UTF-8, transform it and write it to `dst`, creating parent directories.
///
/// Existing destination files are overwritten.
pub fn copy_file(src: &Path, dst: &Path, pipeline: &ReplacementPipeline) -> PackagerResult<()> {
  let content = fs::read_to_string(src).map_err(|err| PackagerError::io(src, err))?;
  let transformed = pipeline.apply(&content);
  write_file_with_dirs(dst, transformed)?;
  tracing::debug!(src = %src.display(), dst = %dst.display(), "copied file");
  Ok(())
}

/// Write `content` to `path`, creating missing parent directories first.
pub fn write_file_with_dirs(path: &Path, content: impl AsRef<[u8]>) -> PackagerResult<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent).map_err(|err| PackagerError::io(parent, err))?;
  }
  fs::write(path, content).map_err(|err| PackagerError::io(path, err))
}

/// Copy every regular file below `package_root` into `output_root`, keeping relative paths.
///
/// Directories are visited through a worklist rather than recursion, with entries sorted so the
/// copy order is reproducible. Symlinks to files are copied by content; symlinks to directories
/// are skipped. Returns the number of files written.
pub fn copy_tree(
  package_root: &Path,
  output_root: &Path,
  pipeline: &ReplacementPipeline,
) -> PackagerResult<usize> {
  let mut pending: Vec<PathBuf> = vec![PathBuf::new()];
  let mut copied = 0;

  while let Some(relative) = pending.pop() {
    let current = package_root.join(&relative);
    let mut entries = fs::read_dir(&current)
      .map_err(|err| PackagerError::io(&current, err))?
      .map(|entry| entry.map_err(|err| PackagerError::io(&current, err)))
      .collect::<PackagerResult<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut subdirs = Vec::new();
    for entry in entries {
      let entry_path = entry.path();
      let child_relative = relative.join(entry.file_name());
      let file_type = entry
        .file_type()
        .map_err(|err| PackagerError::io(&entry_path, err))?;

      if file_type.is_dir() {
        subdirs.push(child_relative);
      } else if file_type.is_symlink() && entry_path.is_dir() {
        tracing::warn!(path = %entry_path.display(), "skipping symlinked directory");
      } else {
        copy_file(&entry_path, &output_root.join(&child_relative), pipeline)?;
        copied += 1;
      }
    }

    // Reverse so the stack pops subdirectories in name order.
    pending.extend(subdirs.into_iter().rev());
  }

  Ok(copied)
}
