pub mod arch;
pub mod os;

pub use arch::Arch;
pub use os::Os;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a platform or architecture name cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlatformError {
  #[error("unknown platform: {0}")]
  UnknownOs(String),

  #[error("unknown architecture: {0}")]
  UnknownArch(String),
}

/// Target platform of a build, combining OS and architecture (e.g., "x86_64-windows")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
  pub os: Os,
  pub arch: Arch,
}

impl Platform {
  /// Create a new platform identifier
  pub fn new(os: Os, arch: Arch) -> Self {
    Self { os, arch }
  }

  /// Parse a platform from the string identifiers a build system reports.
  pub fn parse(os: &str, arch: &str) -> Result<Self, PlatformError> {
    Ok(Self {
      os: os.parse()?,
      arch: arch.parse()?,
    })
  }

  /// Detect the current platform at runtime
  ///
  /// Returns `None` if the OS or architecture is not supported
  pub fn current() -> Option<Self> {
    Some(Self {
      os: Os::current()?,
      arch: Arch::current()?,
    })
  }

  /// Returns the platform triple string (e.g., "x86_64-windows")
  pub fn triple(&self) -> String {
    format!("{}-{}", self.arch, self.os)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.triple())
  }
}
