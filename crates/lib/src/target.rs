//! Build targets handed over by the build graph.
//!
//! A [`BuildTarget`] pairs a compiled binary with the platform it was built
//! for. Targets are read-only inputs to the assembler.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// Reference to a compiled artifact.
///
/// The path may be relative to the build-output root or absolute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BinaryHandle(PathBuf);

impl BinaryHandle {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self(path.into())
  }

  /// The path as handed over by the build graph.
  pub fn path(&self) -> &Path {
    &self.0
  }

  /// Absolute, lexically normalized path of the binary.
  ///
  /// Relative paths are joined onto `build_root`. The filesystem is not
  /// consulted, so the binary does not need to exist yet.
  pub fn resolved_path(&self, build_root: &Path) -> PathBuf {
    normalize(&build_root.join(&self.0))
  }
}

impl From<&str> for BinaryHandle {
  fn from(path: &str) -> Self {
    Self::new(path)
  }
}

/// One compilation output to be packaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
  pub binary: BinaryHandle,
  pub platform: Platform,
}

impl BuildTarget {
  pub fn new(binary: impl Into<BinaryHandle>, platform: Platform) -> Self {
    Self {
      binary: binary.into(),
      platform,
    }
  }
}

/// Drop `.` segments and fold `..` into its parent without touching the filesystem.
pub(crate) fn normalize(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        if !out.pop() {
          out.push(component);
        }
      }
      other => out.push(other),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn relative_binary_is_joined_onto_build_root() {
    let handle = BinaryHandle::new("cs2surf/windows-x86_64/cs2surf.dll");
    let root = Path::new("/work/build");
    assert_eq!(
      handle.resolved_path(root),
      PathBuf::from("/work/build/cs2surf/windows-x86_64/cs2surf.dll")
    );
  }

  #[test]
  fn absolute_binary_ignores_build_root() {
    let handle = BinaryHandle::new("/opt/out/plugin/linux-x86_64/plugin.so");
    assert_eq!(
      handle.resolved_path(Path::new("/work/build")),
      PathBuf::from("/opt/out/plugin/linux-x86_64/plugin.so")
    );
  }

  #[test]
  fn dot_segments_are_folded() {
    let handle = BinaryHandle::new("./a/../plugin/x/./plugin.so");
    assert_eq!(
      handle.resolved_path(Path::new("/build")),
      PathBuf::from("/build/plugin/x/plugin.so")
    );
  }
}
