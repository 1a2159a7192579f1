//! CLI output formatting utilities.
//!
//! Provides consistent formatting for terminal output including colored status
//! messages, operation listings, and Unicode symbols.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use mmpack_lib::operation::Operation;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
  pub const PLUS: &str = "+";
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

/// One line per operation: `+ addons/metamod` or `→ /build/p.so addons/p`.
pub fn format_operation(op: &Operation) -> String {
  match op {
    Operation::CreateFolder { path } => format!("{} {}", symbols::PLUS, path.display()),
    Operation::Copy { source, destination } => {
      format!("{} {} {}", symbols::ARROW, source.display(), destination.display())
    }
  }
}

pub fn print_operation(op: &Operation) {
  let line = format_operation(op);
  match op {
    Operation::CreateFolder { .. } => println!("    {}", line.if_supports_color(Stream::Stdout, |s| s.green())),
    Operation::Copy { .. } => println!("    {}", line.if_supports_color(Stream::Stdout, |s| s.cyan())),
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_operation() {
    assert_eq!(
      format_operation(&Operation::create_folder("addons/metamod")),
      "+ addons/metamod"
    );
    assert_eq!(
      format_operation(&Operation::copy("/build/p.vdf", "addons/metamod")),
      "→ /build/p.vdf addons/metamod"
    );
  }

  #[test]
  fn test_output_format_is_json() {
    assert!(OutputFormat::Json.is_json());
    assert!(!OutputFormat::Text.is_json());
  }
}
