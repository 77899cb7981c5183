//! Root disambiguation and output path rules for sources, dependencies and packages.

use std::path::{Path, PathBuf};

use crate::error::{PackagerError, PackagerResult};
use crate::paths::relative::{absolutize, is_ancestor, normalize, relative_path};

/// The two build output trees a dependency may come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootMapping {
  /// Compiled binaries root, checked first.
  pub bin_dir: PathBuf,
  /// Generated files root.
  pub gen_dir: PathBuf,
}

impl RootMapping {
  /// Pair the binaries and generated roots.
  pub fn new(bin_dir: impl Into<PathBuf>, gen_dir: impl Into<PathBuf>) -> Self {
    Self {
      bin_dir: bin_dir.into(),
      gen_dir: gen_dir.into(),
    }
  }

  /// Return the root containing `file`, preferring the binaries root.
  pub fn matching_root(&self, file: &Path) -> PackagerResult<&Path> {
    if is_ancestor(&self.bin_dir, file)? {
      Ok(self.bin_dir.as_path())
    } else if is_ancestor(&self.gen_dir, file)? {
      Ok(self.gen_dir.as_path())
    } else {
      Err(PackagerError::PathResolution {
        path: file.to_path_buf(),
      })
    }
  }
}

/// Maps input locations onto the flattened output directory.
#[derive(Debug, Clone)]
pub struct PathMapper {
  roots: RootMapping,
  base_dir: PathBuf,
  out_dir: PathBuf,
}

impl PathMapper {
  /// Create a mapper for the given roots, package base directory and output directory.
  pub fn new(roots: RootMapping, base_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
    Self {
      roots,
      base_dir: base_dir.into(),
      out_dir: out_dir.into(),
    }
  }

  /// Directory every output is grafted onto.
  pub fn out_dir(&self) -> &Path {
    &self.out_dir
  }

  /// A source like `base_dir/my/path` maps to `out_dir/my/path`.
  pub fn source_output(&self, src: &Path) -> PackagerResult<PathBuf> {
    let relative = relative_path(&self.base_dir, src)?;
    Ok(self.graft(&relative))
  }

  /// A dependency like `bin_dir/base_dir/my/path` maps to `out_dir/my/path`.
  ///
  /// Fails with [`PackagerError::PathResolution`] when the file is under neither root.
  pub fn dependency_output(&self, file: &Path) -> PackagerResult<PathBuf> {
    let root = self.roots.matching_root(file)?;
    let relative = relative_path(&root.join(&self.base_dir), file)?;
    Ok(self.graft(&relative))
  }

  /// Output directory receiving the contents of a package directory.
  ///
  /// The package's parent is resolved like a dependency and the package directory keeps its own
  /// name underneath it, so `bin_dir/base_dir/my/dir` lands at `out_dir/my/dir`.
  pub fn package_output(&self, package_dir: &Path) -> PackagerResult<PathBuf> {
    let absolute = absolutize(package_dir)?;
    let (Some(parent), Some(name)) = (absolute.parent(), absolute.file_name()) else {
      return Err(PackagerError::PathResolution {
        path: package_dir.to_path_buf(),
      });
    };

    match self.dependency_output(parent) {
      Ok(dir) => Ok(dir.join(name)),
      Err(PackagerError::PathResolution { .. }) => Err(PackagerError::PathResolution {
        path: package_dir.to_path_buf(),
      }),
      Err(err) => Err(err),
    }
  }

  fn graft(&self, relative: &Path) -> PathBuf {
    normalize(&self.out_dir.join(relative))
  }
}
