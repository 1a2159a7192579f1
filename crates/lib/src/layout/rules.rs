use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::platform::{Arch, Os, Platform};

/// A rule subdirectory that would place the binary outside its alias folder.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("binary subdirectory must be relative and stay inside the alias folder: {}", .0.display())]
pub struct InvalidSubdir(pub PathBuf);

/// Lookup table mapping a target platform to the subdirectory, under the
/// alias root, that the host loader searches for the binary.
///
/// Platforms without an entry use the flat layout. The default table only
/// knows about 64-bit Windows, where the loader expects `bin/win64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRules {
  nested: BTreeMap<(Os, Arch), PathBuf>,
}

impl Default for LayoutRules {
  fn default() -> Self {
    let mut nested = BTreeMap::new();
    nested.insert((Os::Windows, Arch::X86_64), PathBuf::from("bin").join("win64"));
    Self { nested }
  }
}

impl LayoutRules {
  /// A table without any entries; every platform gets the flat layout.
  pub fn empty() -> Self {
    Self { nested: BTreeMap::new() }
  }

  /// Add or replace the nested binary directory for `platform`.
  ///
  /// The subdirectory is joined onto the alias root, so it must be made of
  /// plain names only: no root, prefix, `.` or `..`, and not empty.
  pub fn with_rule<I, S>(mut self, platform: Platform, subdir: I) -> Result<Self, InvalidSubdir>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
  {
    let path: PathBuf = subdir.into_iter().map(|s| s.as_ref().to_path_buf()).collect();
    let plain = path.components().all(|c| matches!(c, Component::Normal(_)));
    if !plain || path.as_os_str().is_empty() {
      return Err(InvalidSubdir(path));
    }
    self.nested.insert((platform.os, platform.arch), path);
    Ok(self)
  }

  /// Nested binary directory for `platform`, or `None` for the flat layout.
  pub fn binary_subdir(&self, platform: Platform) -> Option<&Path> {
    self.nested.get(&(platform.os, platform.arch)).map(PathBuf::as_path)
  }

  /// Iterate over the table entries in a stable order.
  pub fn iter(&self) -> impl Iterator<Item = (Platform, &Path)> {
    self
      .nested
      .iter()
      .map(|(&(os, arch), path)| (Platform::new(os, arch), path.as_path()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_table_only_nests_windows_x86_64() {
    let rules = LayoutRules::default();
    assert_eq!(
      rules.binary_subdir(Platform::new(Os::Windows, Arch::X86_64)),
      Some(Path::new("bin/win64"))
    );
    assert_eq!(rules.binary_subdir(Platform::new(Os::Windows, Arch::X86)), None);
    assert_eq!(rules.binary_subdir(Platform::new(Os::Linux, Arch::X86_64)), None);
    assert_eq!(rules.binary_subdir(Platform::new(Os::MacOs, Arch::Aarch64)), None);
    assert_eq!(rules.iter().count(), 1);
  }

  #[test]
  fn rules_can_be_extended() {
    let linux = Platform::new(Os::Linux, Arch::X86_64);
    let rules = LayoutRules::default().with_rule(linux, ["bin", "linuxsteamrt64"]).unwrap();
    assert_eq!(rules.binary_subdir(linux), Some(Path::new("bin/linuxsteamrt64")));
    assert_eq!(rules.iter().count(), 2);
  }

  #[test]
  fn rules_reject_subdirs_escaping_the_alias_folder() {
    let linux = Platform::new(Os::Linux, Arch::X86_64);
    let cases: [&[&str]; 5] = [&["/abs"], &["..", "bin"], &["bin", "..", ".."], &["./bin"], &[]];
    for subdir in cases {
      let err = LayoutRules::default().with_rule(linux, subdir).unwrap_err();
      assert_eq!(err.0, subdir.iter().collect::<PathBuf>());
    }
  }

  #[test]
  fn rejected_rule_leaves_table_untouched() {
    let linux = Platform::new(Os::Linux, Arch::X86_64);
    let rules = LayoutRules::default();
    assert!(rules.clone().with_rule(linux, ["/srv"]).is_err());
    assert_eq!(rules.binary_subdir(linux), None);
    assert_eq!(rules, LayoutRules::default());
  }
}
