use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::PlatformError;

/// CPU architectures a plugin binary can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
  X86,
  X86_64,
  Aarch64,
}

impl Arch {
  /// Detect the current CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86" => Some(Self::X86),
      "x86_64" => Some(Self::X86_64),
      "aarch64" => Some(Self::Aarch64),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86 => "x86",
      Self::X86_64 => "x86_64",
      Self::Aarch64 => "aarch64",
    }
  }
}

impl FromStr for Arch {
  type Err = PlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "x86" | "i386" | "i686" => Ok(Self::X86),
      "x86_64" | "x64" | "amd64" => Ok(Self::X86_64),
      "aarch64" | "arm64" => Ok(Self::Aarch64),
      _ => Err(PlatformError::UnknownArch(s.to_string())),
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_common_aliases() {
    assert_eq!("x64".parse::<Arch>().unwrap(), Arch::X86_64);
    assert_eq!("AMD64".parse::<Arch>().unwrap(), Arch::X86_64);
    assert_eq!("arm64".parse::<Arch>().unwrap(), Arch::Aarch64);
    assert_eq!("i686".parse::<Arch>().unwrap(), Arch::X86);
  }

  #[test]
  fn rejects_unknown_arch() {
    assert!(matches!(
      "riscv64".parse::<Arch>(),
      Err(PlatformError::UnknownArch(ref s)) if s == "riscv64"
    ));
  }
}
