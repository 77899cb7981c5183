//! Error type shared by the packaging pipeline.

use std::path::PathBuf;

/// Convenience alias used by every packaging stage.
pub type PackagerResult<T> = Result<T, PackagerError>;

/// Fatal conditions raised while assembling a package directory.
///
/// Every variant names the field or path that triggered it. The parameter file is produced by a
/// build rule, so these errors point at a misconfigured caller rather than a transient failure.
#[derive(Debug)]
pub enum PackagerError {
  /// The parameter file or one of its fields could not be decoded.
  ParameterFormat {
    /// Field (or file) that was malformed.
    field: String,
    /// Description of the problem.
    message: String,
  },
  /// A replacement pattern supplied by the caller is not a valid regular expression.
  InvalidPattern {
    /// Pattern text as supplied.
    pattern: String,
    /// Source compilation error.
    source: regex::Error,
  },
  /// A dependency or package lives under neither the binaries root nor the generated root.
  PathResolution {
    /// Offending path.
    path: PathBuf,
  },
  /// Reading or writing a file failed.
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
}

impl PackagerError {
  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }

  pub(crate) fn parameter(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self::ParameterFormat {
      field: field.into(),
      message: message.into(),
    }
  }
}

impl std::fmt::Display for PackagerError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::ParameterFormat { field, message } => {
        write!(f, "malformed parameter `{}`: {}", field, message)
      }
      Self::InvalidPattern { pattern, source } => {
        write!(f, "invalid replacement pattern `{}`: {}", pattern, source)
      }
      Self::PathResolution { path } => write!(
        f,
        "{} is not under the binaries or generated root",
        path.display()
      ),
      Self::Io { path, source } => write!(f, "failed to access {}: {}", path.display(), source),
    }
  }
}

impl std::error::Error for PackagerError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::InvalidPattern { source, .. } => Some(source),
      Self::Io { source, .. } => Some(source),
      Self::ParameterFormat { .. } | Self::PathResolution { .. } => None,
    }
  }
}
