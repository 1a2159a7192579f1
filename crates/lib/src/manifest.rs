//! Target manifest handed over by the build graph.
//!
//! The build graph lists every compiled binary together with the platform it
//! was compiled for:
//!
//! ```json
//! {
//!   "targets": [
//!     { "binary": "cs2surf/windows-x86_64/cs2surf.dll", "platform": "windows", "arch": "x86_64" },
//!     { "binary": "cs2kz/linux-x86_64/cs2kz.so", "platform": "linux", "arch": "x86_64" }
//!   ]
//! }
//! ```
//!
//! Every descriptor lands in `addons/metamod/<stem>.vdf`, so one manifest can
//! hold only one binary per stem. Windows and linux builds of the same plugin
//! are packaged by separate runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::{Platform, PlatformError};
use crate::target::{BinaryHandle, BuildTarget};

#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to read target manifest {}: {source}", .path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse target manifest: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("target {index} ({}): {source}", .binary.display())]
  Platform {
    index: usize,
    binary: PathBuf,
    #[source]
    source: PlatformError,
  },
}

/// One entry of the manifest, with platform names still as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetEntry {
  pub binary: BinaryHandle,
  pub platform: String,
  pub arch: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetManifest {
  #[serde(default)]
  pub targets: Vec<TargetEntry>,
}

impl TargetManifest {
  /// Read and parse a manifest file.
  pub fn load(path: &Path) -> Result<Self, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json(&content)
  }

  pub fn from_json(content: &str) -> Result<Self, ManifestError> {
    Ok(serde_json::from_str(content)?)
  }

  /// Convert entries into typed build targets, in order.
  pub fn build_targets(&self) -> Result<Vec<BuildTarget>, ManifestError> {
    self
      .targets
      .iter()
      .enumerate()
      .map(|(index, entry)| {
        let platform = Platform::parse(&entry.platform, &entry.arch).map_err(|source| ManifestError::Platform {
          index,
          binary: entry.binary.path().to_path_buf(),
          source,
        })?;
        Ok(BuildTarget::new(entry.binary.clone(), platform))
      })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assemble::{AssembleError, AssembleOptions, PackageAssembler};
  use crate::platform::{Arch, Os};
  use tempfile::TempDir;

  const MANIFEST: &str = r#"
{
  "targets": [
    { "binary": "cs2surf/windows-x86_64/cs2surf.dll", "platform": "windows", "arch": "x86_64" },
    { "binary": "cs2kz/linux-x86_64/cs2kz.so", "platform": "linux", "arch": "x86_64" }
  ]
}
"#;

  #[test]
  fn parses_targets_in_order() {
    let manifest = TargetManifest::from_json(MANIFEST).unwrap();
    let targets = manifest.build_targets().unwrap();

    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].platform, Platform::new(Os::Windows, Arch::X86_64));
    assert_eq!(targets[1].platform, Platform::new(Os::Linux, Arch::X86_64));
    assert_eq!(targets[1].binary.path(), Path::new("cs2kz/linux-x86_64/cs2kz.so"));
  }

  #[test]
  fn documented_manifest_assembles() {
    let temp = TempDir::new().unwrap();
    let targets = TargetManifest::from_json(MANIFEST).unwrap().build_targets().unwrap();

    let plan = PackageAssembler::new(AssembleOptions::new(temp.path()))
      .assemble(&targets)
      .unwrap();

    assert_eq!(plan.packages.len(), 2);
    assert!(temp.path().join("cs2surf.vdf").exists());
    assert!(temp.path().join("cs2kz.vdf").exists());
  }

  #[test]
  fn same_stem_on_two_platforms_needs_separate_runs() {
    let temp = TempDir::new().unwrap();
    let manifest = TargetManifest::from_json(
      r#"{ "targets": [
        { "binary": "cs2surf/windows-x86_64/cs2surf.dll", "platform": "windows", "arch": "x86_64" },
        { "binary": "cs2surf/linux-x86_64/cs2surf.so", "platform": "linux", "arch": "x86_64" }
      ] }"#,
    )
    .unwrap();

    let err = PackageAssembler::new(AssembleOptions::new(temp.path()))
      .assemble(&manifest.build_targets().unwrap())
      .unwrap_err();
    assert!(matches!(err, AssembleError::DuplicateDescriptor { ref file, .. } if file == "cs2surf.vdf"));
  }

  #[test]
  fn missing_targets_key_is_empty() {
    let manifest = TargetManifest::from_json("{}").unwrap();
    assert!(manifest.build_targets().unwrap().is_empty());
  }

  #[test]
  fn unknown_platform_names_the_target() {
    let manifest = TargetManifest::from_json(
      r#"{ "targets": [ { "binary": "a/b/c.so", "platform": "haiku", "arch": "x86_64" } ] }"#,
    )
    .unwrap();

    let err = manifest.build_targets().unwrap_err();
    assert!(matches!(
      err,
      ManifestError::Platform { index: 0, source: PlatformError::UnknownOs(ref os), .. } if os == "haiku"
    ));
    assert!(err.to_string().contains("a/b/c.so"));
  }

  #[test]
  fn load_reports_missing_file() {
    let temp = TempDir::new().unwrap();
    let err = TargetManifest::load(&temp.path().join("targets.json")).unwrap_err();
    assert!(matches!(err, ManifestError::Read { .. }));
  }

  #[test]
  fn load_reads_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("targets.json");
    fs::write(&path, MANIFEST).unwrap();

    assert_eq!(TargetManifest::load(&path).unwrap().targets.len(), 2);
  }

  #[test]
  fn invalid_json_is_a_parse_error() {
    assert!(matches!(
      TargetManifest::from_json("{ targets: }"),
      Err(ManifestError::Parse(_))
    ));
  }
}
