//! Package layout planning.
//!
//! Given the names resolved for a binary and the platform it targets, compute
//! the folders of the package tree and where the binary ends up. All paths are
//! relative to the package root:
//!
//! ```text
//! addons/
//!   metamod/            descriptor destination
//!   <alias>/            full mode
//!     bin/win64/        binary root on windows/x86_64
//!     configs/ logs/ data/
//! ```

mod rules;

pub use rules::{InvalidSubdir, LayoutRules};

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{ADDONS_DIR, CONFIGS_DIR, DATA_DIR, LOGS_DIR, METAMOD_DIR};
use crate::platform::Platform;
use crate::resolve::ResolvedNames;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown layout mode: {0} (expected `full` or `minimal`)")]
pub struct UnknownLayoutMode(pub String);

/// Packaging policy controlling whether auxiliary folders are created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
  /// Binary under `addons/<alias>/`, plus `configs/`, `logs/` and `data/`.
  #[default]
  Full,
  /// Binary directly under `addons/` unless the platform needs nesting.
  Minimal,
}

impl LayoutMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Full => "full",
      Self::Minimal => "minimal",
    }
  }
}

impl FromStr for LayoutMode {
  type Err = UnknownLayoutMode;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "full" => Ok(Self::Full),
      "minimal" => Ok(Self::Minimal),
      _ => Err(UnknownLayoutMode(s.to_string())),
    }
  }
}

impl fmt::Display for LayoutMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Auxiliary folders created under the alias root in full mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuxFolders {
  pub configs: PathBuf,
  pub logs: PathBuf,
  pub data: PathBuf,
}

/// The planned package tree for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageLayout {
  /// `addons/`
  pub addons_root: PathBuf,
  /// `addons/<alias>/`
  pub alias_root: PathBuf,
  /// `addons/metamod/`
  pub metamod_folder: PathBuf,
  /// Folder the binary is copied into.
  pub binary_root: PathBuf,
  /// `binary_root` joined with the binary's file name.
  pub binary_path: PathBuf,
  /// Present in full mode only.
  pub aux: Option<AuxFolders>,
  /// Folders to create, de-duplicated, binary root first.
  pub folders: Vec<PathBuf>,
}

/// Plan the package tree for a resolved binary.
///
/// Platforms without an entry in `rules` silently get the flat layout.
pub fn plan(names: &ResolvedNames, platform: Platform, mode: LayoutMode, rules: &LayoutRules) -> PackageLayout {
  let addons_root = PathBuf::from(ADDONS_DIR);
  let alias_root = addons_root.join(&names.binary_alias);
  let metamod_folder = addons_root.join(METAMOD_DIR);

  let binary_root = match (rules.binary_subdir(platform), mode) {
    (Some(subdir), _) => alias_root.join(subdir),
    (None, LayoutMode::Full) => alias_root.clone(),
    (None, LayoutMode::Minimal) => addons_root.clone(),
  };
  let binary_path = binary_root.join(&names.binary_name);

  let aux = match mode {
    LayoutMode::Full => Some(AuxFolders {
      configs: alias_root.join(CONFIGS_DIR),
      logs: alias_root.join(LOGS_DIR),
      data: alias_root.join(DATA_DIR),
    }),
    LayoutMode::Minimal => None,
  };

  let mut folders = vec![binary_root.clone(), metamod_folder.clone()];
  if let Some(aux) = &aux {
    folders.extend([aux.configs.clone(), aux.logs.clone(), aux.data.clone()]);
  }
  let mut seen = HashSet::new();
  folders.retain(|folder| seen.insert(folder.clone()));

  PackageLayout {
    addons_root,
    alias_root,
    metamod_folder,
    binary_root,
    binary_path,
    aux,
    folders,
  }
}
