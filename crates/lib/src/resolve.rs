//! Name and alias derivation for compiled binaries.
//!
//! The alias a plugin registers under is taken from the packaging directory
//! convention: the binary sits two directories below its alias root, e.g.
//! `cs2surf/windows-x86_64/cs2surf.dll` registers as `cs2surf`. This is a
//! purely lexical rule. A binary placed elsewhere gets whatever directory
//! happens to sit two levels up, so paths that are too shallow to have one
//! are rejected instead of truncated.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::target::BinaryHandle;

/// Minimum number of normal path segments: alias folder, containing folder, file.
pub const MIN_BINARY_SEGMENTS: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
  /// The path has too few segments to derive an alias from.
  #[error("binary path {} has {segments} segment(s), need at least 3 to derive an alias", .path.display())]
  PathShape { path: PathBuf, segments: usize },

  /// A segment needed for naming is not valid UTF-8.
  #[error("binary path {} is not valid UTF-8", .0.display())]
  NonUtf8(PathBuf),
}

/// Identifying strings derived from a binary's resolved path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedNames {
  /// Absolute, normalized path of the compiled binary.
  pub binary_path: PathBuf,
  /// File name with extension (`cs2surf.dll`).
  pub binary_name: String,
  /// File name without extension (`cs2surf`).
  pub binary_stem: String,
  /// Name of the directory two levels above the file.
  pub binary_alias: String,
}

/// Derive the binary name, stem and alias for a handle.
///
/// # Errors
///
/// Returns [`ResolveError::PathShape`] when the resolved path has fewer than
/// [`MIN_BINARY_SEGMENTS`] normal segments.
pub fn resolve(binary: &BinaryHandle, build_root: &Path) -> Result<ResolvedNames, ResolveError> {
  let binary_path = binary.resolved_path(build_root);

  let segments: Vec<&std::ffi::OsStr> = binary_path
    .components()
    .filter_map(|c| match c {
      Component::Normal(s) => Some(s),
      _ => None,
    })
    .collect();

  let count = segments.len();
  if count < MIN_BINARY_SEGMENTS {
    return Err(ResolveError::PathShape {
      path: binary_path.clone(),
      segments: count,
    });
  }

  let to_str = |s: &std::ffi::OsStr| {
    s.to_str()
      .map(str::to_string)
      .ok_or_else(|| ResolveError::NonUtf8(binary_path.clone()))
  };

  let binary_name = to_str(segments[count - 1])?;
  let binary_alias = to_str(segments[count - MIN_BINARY_SEGMENTS])?;
  let binary_stem = match Path::new(&binary_name).file_stem() {
    Some(stem) => to_str(stem)?,
    None => binary_name.clone(),
  };

  Ok(ResolvedNames {
    binary_path,
    binary_name,
    binary_stem,
    binary_alias,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn root() -> PathBuf {
    PathBuf::from("/work/build")
  }

  #[test]
  fn alias_is_two_levels_above_file() {
    let names = resolve(&BinaryHandle::new("cs2surf/windows-x86_64/cs2surf.dll"), &root()).unwrap();
    assert_eq!(names.binary_name, "cs2surf.dll");
    assert_eq!(names.binary_stem, "cs2surf");
    assert_eq!(names.binary_alias, "cs2surf");
    assert_eq!(names.binary_path, PathBuf::from("/work/build/cs2surf/windows-x86_64/cs2surf.dll"));
  }

  #[test]
  fn alias_follows_directory_not_file_name() {
    let names = resolve(&BinaryHandle::new("surf/linux-x86_64/cs2surf.so"), &root()).unwrap();
    assert_eq!(names.binary_alias, "surf");
    assert_eq!(names.binary_stem, "cs2surf");
  }

  #[test]
  fn stem_drops_only_last_extension() {
    let names = resolve(&BinaryHandle::new("p/x/plugin.x64.so"), &root()).unwrap();
    assert_eq!(names.binary_stem, "plugin.x64");
  }

  #[test]
  fn resolution_is_stable() {
    let handle = BinaryHandle::new("cs2surf/windows-x86_64/cs2surf.dll");
    let first = resolve(&handle, &root()).unwrap();
    let second = resolve(&handle, &root()).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn shallow_path_is_rejected() {
    let err = resolve(&BinaryHandle::new("/x/plugin.dll"), Path::new("/")).unwrap_err();
    assert_eq!(
      err,
      ResolveError::PathShape {
        path: PathBuf::from("/x/plugin.dll"),
        segments: 2,
      }
    );
  }

  #[test]
  fn parent_segments_count_after_normalizing() {
    let err = resolve(&BinaryHandle::new("../../../a/b.so"), Path::new("/one/two")).unwrap_err();
    assert!(matches!(err, ResolveError::PathShape { segments: 2, .. }));
  }
}
