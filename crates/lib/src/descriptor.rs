//! Metamod plugin descriptors.
//!
//! The host loader reads one `.vdf` file per plugin from `addons/metamod/`.
//! The format is a fixed key-value block and must match byte for byte:
//!
//! ```text
//! "Metamod Plugin"
//! {
//! 	"alias"	"cs2surf"
//! 	"file"	"/srv/package/addons/cs2surf/bin/win64/cs2surf.dll"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::consts::DESCRIPTOR_EXT;

const HEADER: &str = "\"Metamod Plugin\"";

#[derive(Debug, Error)]
pub enum DescriptorError {
  #[error("failed to write descriptor {}: {source}", .path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed descriptor: {0}")]
  Malformed(String),

  /// A field value that cannot be written between quotes on one line.
  #[error("descriptor {field} cannot contain quotes or line breaks: {value}")]
  InvalidValue { field: &'static str, value: String },

  #[error("descriptor file path is not valid UTF-8: {}", .0.display())]
  NonUtf8(PathBuf),
}

/// Association between a plugin alias and the path of its packaged binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Descriptor {
  pub alias: String,
  pub file: String,
}

impl Descriptor {
  pub fn new(alias: impl Into<String>, file: impl Into<String>) -> Self {
    Self {
      alias: alias.into(),
      file: file.into(),
    }
  }

  /// Descriptor for a packaged binary, rejecting values the format cannot hold.
  pub fn for_binary(alias: &str, file: &Path) -> Result<Self, DescriptorError> {
    let file = file.to_str().ok_or_else(|| DescriptorError::NonUtf8(file.to_path_buf()))?;
    let descriptor = Self::new(alias, file);
    descriptor.validate()?;
    Ok(descriptor)
  }

  /// Check that both values survive rendering and parsing unchanged.
  pub fn validate(&self) -> Result<(), DescriptorError> {
    for (field, value) in [("alias", &self.alias), ("file", &self.file)] {
      if value.contains(['"', '\n', '\r']) {
        return Err(DescriptorError::InvalidValue {
          field,
          value: value.clone(),
        });
      }
    }
    Ok(())
  }

  /// Render the descriptor text.
  pub fn render(&self) -> String {
    format!(
      "{HEADER}\n{{\n\t\"alias\"\t\"{}\"\n\t\"file\"\t\"{}\"\n}}\n",
      self.alias, self.file
    )
  }

  /// File name the descriptor is stored under for a binary stem.
  pub fn file_name(stem: &str) -> String {
    format!("{}.{}", stem, DESCRIPTOR_EXT)
  }

  /// Write the descriptor to `<dir>/<stem>.vdf`, returning the written path.
  pub fn write(&self, dir: &Path, stem: &str) -> Result<PathBuf, DescriptorError> {
    self.validate()?;
    let path = dir.join(Self::file_name(stem));
    fs::write(&path, self.render()).map_err(|source| DescriptorError::Write {
      path: path.clone(),
      source,
    })?;
    debug!(path = %path.display(), alias = %self.alias, "wrote descriptor");
    Ok(path)
  }

  /// Parse descriptor text back into its fields.
  ///
  /// Accepts any whitespace between keys and values, but requires the
  /// header, a brace block, and both keys.
  pub fn parse(text: &str) -> Result<Self, DescriptorError> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    if lines.next() != Some(HEADER) {
      return Err(DescriptorError::Malformed("missing \"Metamod Plugin\" header".to_string()));
    }
    if lines.next() != Some("{") {
      return Err(DescriptorError::Malformed("expected `{` after header".to_string()));
    }

    let mut alias = None;
    let mut file = None;
    let mut closed = false;

    for line in lines.by_ref() {
      if line == "}" {
        closed = true;
        break;
      }
      let (key, value) = parse_pair(line)?;
      match key {
        "alias" => alias = Some(value.to_string()),
        "file" => file = Some(value.to_string()),
        other => return Err(DescriptorError::Malformed(format!("unexpected key `{}`", other))),
      }
    }

    if !closed {
      return Err(DescriptorError::Malformed("unterminated block".to_string()));
    }
    if let Some(extra) = lines.next() {
      return Err(DescriptorError::Malformed(format!("trailing content `{}`", extra)));
    }

    match (alias, file) {
      (Some(alias), Some(file)) => Ok(Self { alias, file }),
      (None, _) => Err(DescriptorError::Malformed("missing `alias`".to_string())),
      (_, None) => Err(DescriptorError::Malformed("missing `file`".to_string())),
    }
  }
}

/// Split `"key"<ws>"value"` into its two quoted strings.
fn parse_pair(line: &str) -> Result<(&str, &str), DescriptorError> {
  let malformed = || DescriptorError::Malformed(format!("expected quoted key and value, got `{}`", line));

  let rest = line.strip_prefix('"').ok_or_else(malformed)?;
  let (key, rest) = rest.split_once('"').ok_or_else(malformed)?;
  let rest = rest.trim_start().strip_prefix('"').ok_or_else(malformed)?;
  let value = rest.strip_suffix('"').ok_or_else(malformed)?;
  if value.contains('"') {
    return Err(malformed());
  }
  Ok((key, value))
}
