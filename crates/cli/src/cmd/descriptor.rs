//! Implementation of the `mmpack descriptor` command.
//!
//! Prints the descriptor text a single binary would be packaged with, without
//! writing anything.

use anyhow::{Context, Result, anyhow};

use mmpack_lib::assemble::PackageAssembler;
use mmpack_lib::descriptor::Descriptor;
use mmpack_lib::platform::{Arch, Os, Platform};
use mmpack_lib::target::{BinaryHandle, BuildTarget};

use super::assemble_options;
use crate::DescriptorArgs;
use crate::output::{OutputFormat, print_json};

pub fn cmd_descriptor(args: &DescriptorArgs, format: OutputFormat) -> Result<()> {
  let platform = target_platform(args.platform.as_deref(), args.arch.as_deref())?;
  let options = assemble_options(&args.build_root, args.package_root.as_deref(), args.mode)?;

  let target = BuildTarget::new(BinaryHandle::new(&args.binary), platform);
  let described = PackageAssembler::new(options)
    .describe(&target)
    .context("Cannot describe plugin")?;

  if format.is_json() {
    return print_json(&serde_json::json!({
      "file_name": Descriptor::file_name(&described.names.binary_stem),
      "platform": platform.triple(),
      "descriptor": described.descriptor,
    }));
  }

  print!("{}", described.descriptor.render());
  Ok(())
}

/// Platform from the command line, filling missing parts from the host.
fn target_platform(os: Option<&str>, arch: Option<&str>) -> Result<Platform> {
  let os = match os {
    Some(name) => name.parse::<Os>()?,
    None => Os::current().ok_or_else(|| anyhow!("Unsupported host OS; pass --platform"))?,
  };
  let arch = match arch {
    Some(name) => name.parse::<Arch>()?,
    None => Arch::current().ok_or_else(|| anyhow!("Unsupported host architecture; pass --arch"))?,
  };
  Ok(Platform::new(os, arch))
}
