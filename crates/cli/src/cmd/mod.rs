mod descriptor;
mod info;
mod inspect;
mod plan;

pub use descriptor::cmd_descriptor;
pub use info::cmd_info;
pub use inspect::cmd_inspect;
pub use plan::cmd_plan;

use std::path::Path;

use anyhow::{Context, Result};

use mmpack_lib::assemble::AssembleOptions;
use mmpack_lib::layout::LayoutMode;

/// Assembler options for a build root given on the command line.
///
/// Both `plan` and `descriptor` go through here so they agree on every path.
fn assemble_options(build_root: &Path, package_root: Option<&Path>, mode: LayoutMode) -> Result<AssembleOptions> {
  let canonical =
    dunce::canonicalize(build_root).with_context(|| format!("Build root not found: {}", build_root.display()))?;
  let mut options = AssembleOptions::new(canonical).with_mode(mode);
  if let Some(package_root) = package_root {
    options = options.with_package_root(package_root);
  }
  Ok(options)
}
