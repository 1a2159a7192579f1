use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use mmpack_lib::descriptor::Descriptor;

use crate::output::{OutputFormat, print_json, print_stat, print_success};

pub fn cmd_inspect(file: &Path, format: OutputFormat) -> Result<()> {
  let text = fs::read_to_string(file).with_context(|| format!("Failed to read descriptor: {}", file.display()))?;
  let descriptor = Descriptor::parse(&text).with_context(|| format!("Invalid descriptor: {}", file.display()))?;

  if format.is_json() {
    return print_json(&descriptor);
  }

  print_success(&format!("Metamod plugin descriptor {}", file.display()));
  print_stat("Alias", &descriptor.alias);
  print_stat("File", &descriptor.file);
  Ok(())
}
